//! Report JSON renderer (cover → tally → districts → skipped_rules → integrity).
//!
//! Key order is the insertion order of `serde_json::Map`, which requires the
//! `preserve_order` feature of `serde_json`.

use serde_json::{Map as JsonMap, Value};

use crate::structure::{CoverBlock, DistrictRow, IntegrityBlock, ReportModel, SkippedRule, TallyRow};
use crate::ReportError;

pub fn render_json(m: &ReportModel) -> Result<String, ReportError> {
    serde_json::to_string_pretty(&report_value(m)).map_err(|e| ReportError::Serialize(e.to_string()))
}

fn report_value(m: &ReportModel) -> Value {
    let mut root = obj();
    root.insert("cover".into(), cover_json(&m.cover));
    root.insert("tally".into(), Value::Array(m.tally.iter().map(tally_json).collect()));
    root.insert("districts".into(), Value::Array(m.districts.iter().map(district_json).collect()));
    root.insert(
        "skipped_rules".into(),
        Value::Array(m.skipped_rules.iter().map(skipped_json).collect()),
    );
    root.insert("integrity".into(), integrity_json(&m.integrity));
    Value::Object(root)
}

fn cover_json(c: &CoverBlock) -> Value {
    let mut o = obj();
    o.insert("title".into(), Value::String(c.title.clone()));
    o.insert("total_seats".into(), c.total_seats.into());
    o.insert("seat_pool".into(), c.seat_pool.into());
    o.insert("districts".into(), c.districts.into());
    o.insert("national_voters".into(), c.national_voters.into());
    Value::Object(o)
}

fn tally_json(t: &TallyRow) -> Value {
    let mut o = obj();
    o.insert("party".into(), Value::String(t.party.clone()));
    o.insert("total".into(), t.total.into());
    o.insert("individual".into(), t.individual.into());
    o.insert("list".into(), t.list.into());
    o.insert("fixed".into(), t.fixed.into());
    o.insert("list_votes".into(), t.list_votes.into());
    o.insert("individual_votes".into(), t.individual_votes.into());
    o.insert("eligible".into(), Value::Bool(t.eligible));
    Value::Object(o)
}

fn district_json(d: &DistrictRow) -> Value {
    let mut o = obj();
    o.insert("id".into(), Value::String(d.id.clone()));
    o.insert("winner".into(), Value::String(d.winner.clone()));
    o.insert("margin_votes".into(), d.margin_votes.into());
    // pre-formatted upstream; kept as text to avoid float re-rendering
    o.insert("margin_pct".into(), Value::String(d.margin_pct_2dp.clone()));
    Value::Object(o)
}

fn skipped_json(r: &SkippedRule) -> Value {
    let mut o = obj();
    o.insert("district".into(), Value::String(r.district.clone()));
    o.insert("source".into(), Value::String(r.source.clone()));
    o.insert("target".into(), Value::String(r.target.clone()));
    Value::Object(o)
}

fn integrity_json(i: &IntegrityBlock) -> Value {
    let mut engine = obj();
    engine.insert("name".into(), Value::String(i.engine_name.clone()));
    engine.insert("version".into(), Value::String(i.engine_version.clone()));

    let mut o = obj();
    o.insert("run_id".into(), Value::String(i.run_id.clone()));
    o.insert("engine".into(), Value::Object(engine));
    o.insert("table_sha256".into(), Value::String(i.table_sha256.clone()));
    o.insert("scenario_sha256".into(), Value::String(i.scenario_sha256.clone()));
    o.insert("district_table_sha256".into(), Value::String(i.district_table_sha256.clone()));
    o.insert("result_sha256".into(), Value::String(i.result_sha256.clone()));
    o.insert("tie_policy".into(), Value::String(i.tie_policy.clone()));
    o.insert("rounding".into(), Value::String(i.rounding.clone()));
    Value::Object(o)
}

#[inline]
fn obj() -> JsonMap<String, Value> {
    JsonMap::new()
}
