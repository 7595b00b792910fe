//! Plain-text summary: the party tally first, then district winners.

use std::fmt::Write as _;

use crate::structure::ReportModel;

const HEADERS: [&str; 6] = ["Party", "Total", "Individual", "List", "List votes", "Individual votes"];

pub fn render_text(m: &ReportModel) -> String {
    let mut out = String::new();
    let c = &m.cover;
    let _ = writeln!(
        out,
        "{}: {} seats ({} by list apportionment), {} districts, {} national voters",
        c.title, c.total_seats, c.seat_pool, c.districts, c.national_voters
    );
    out.push('\n');

    let rows: Vec<[String; 6]> = m
        .tally
        .iter()
        .map(|t| {
            let mut party = t.party.clone();
            if !t.eligible {
                party.push('*');
            }
            [
                party,
                t.total.to_string(),
                t.individual.to_string(),
                t.list.to_string(),
                t.list_votes.to_string(),
                t.individual_votes.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    push_row(&mut out, &HEADERS.map(String::from), &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    if m.tally.iter().any(|t| !t.eligible) {
        out.push_str("* below threshold or non-competing; fixed seats only\n");
    }

    out.push('\n');
    out.push_str("Districts\n");
    let id_w = m.districts.iter().map(|d| d.id.chars().count()).max().unwrap_or(0);
    for d in &m.districts {
        let _ = writeln!(
            out,
            "  {:<id_w$}  {}  +{} ({}%)",
            d.id, d.winner, d.margin_votes, d.margin_pct_2dp
        );
    }

    if !m.skipped_rules.is_empty() {
        out.push('\n');
        out.push_str("Skipped tactical rules\n");
        for r in &m.skipped_rules {
            let _ = writeln!(out, "  district {}: {} -> {}", r.district, r.source, r.target);
        }
    }

    out.push('\n');
    let i = &m.integrity;
    let _ = writeln!(out, "{} {} {}", i.engine_name, i.engine_version, i.run_id);
    out
}

/// First column left-aligned, numbers right-aligned.
fn push_row(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let mut line = String::new();
    for (k, (cell, &w)) in cells.iter().zip(widths).enumerate() {
        let pad = w.saturating_sub(cell.chars().count());
        if k == 0 {
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
        } else {
            line.push_str("  ");
            line.push_str(&" ".repeat(pad));
            line.push_str(cell);
        }
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
