//! Baseline table ingestion.
//!
//! One row per district: identifier, population, one percentage column per
//! party. The optional index column is dropped. Every cell is read as text
//! and parsed here so identifiers keep their exact spelling and numbers
//! accept either a decimal point or a decimal comma.

use std::io::Cursor;

use polars::frame::DataFrame;
use polars::io::SerReader;
use polars::prelude::{CsvReadOptions, CsvReader, DataType};
use tracing::debug;

use sp_core::{BaselineTable, District, PartyName, PartyRoster};

use crate::config::TableLayout;
use crate::{IoError, IoResult};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse baseline table bytes (UTF-8, optional BOM).
pub fn parse_baseline_table(bytes: &[u8], layout: &TableLayout) -> IoResult<BaselineTable> {
    let df = read_frame(bytes, layout.separator_byte()?)?;
    let columns: Vec<String> = df.get_column_names().iter().map(|c| c.to_string()).collect();

    for required in [&layout.district_column, &layout.population_column] {
        if !columns.iter().any(|c| c == required) {
            return Err(IoError::Schema(format!("missing required column {required:?}")));
        }
    }

    let party_columns: Vec<&String> = columns.iter().filter(|c| !layout.is_reserved(c)).collect();
    if party_columns.is_empty() {
        return Err(IoError::Schema("no party columns".into()));
    }
    let names = party_columns
        .iter()
        .map(|c| {
            PartyName::new(c).map_err(|e| IoError::Schema(format!("party column {c:?}: {e}")))
        })
        .collect::<IoResult<Vec<_>>>()?;
    let roster = PartyRoster::new(names).map_err(|e| IoError::Schema(e.to_string()))?;

    let ids = text_column(&df, &layout.district_column)?;
    let populations = text_column(&df, &layout.population_column)?;
    let mut shares_by_party = Vec::with_capacity(party_columns.len());
    for c in &party_columns {
        shares_by_party.push(text_column(&df, c)?);
    }

    let mut districts = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let id = cell(&ids, row, &layout.district_column)?.to_string();
        let raw_pop = cell(&populations, row, &layout.population_column)?;
        let population = parse_population(raw_pop).ok_or_else(|| {
            IoError::Schema(format!(
                "row {}: population {raw_pop:?} is not a non-negative integer",
                row + 1
            ))
        })?;
        let mut shares = Vec::with_capacity(party_columns.len());
        for (p, col) in party_columns.iter().enumerate() {
            let raw = cell(&shares_by_party[p], row, col)?;
            let v = parse_number(raw).ok_or_else(|| {
                IoError::Schema(format!("row {}: {col:?} value {raw:?} is not a number", row + 1))
            })?;
            shares.push(v);
        }
        districts.push(District { id, population, shares });
    }

    let table = BaselineTable::new(roster, districts).map_err(|e| IoError::Schema(e.to_string()))?;
    debug!(
        districts = table.districts().len(),
        parties = table.roster().len(),
        population = table.total_population(),
        "baseline table loaded"
    );
    Ok(table)
}

fn read_frame(bytes: &[u8], separator: u8) -> IoResult<DataFrame> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|po| po.with_separator(separator));
    Ok(CsvReader::new(Cursor::new(body)).with_options(options).finish()?)
}

/// A whole column as optional trimmed strings.
fn text_column(df: &DataFrame, name: &str) -> IoResult<Vec<Option<String>>> {
    let col = df.column(name)?.cast(&DataType::String)?;
    Ok(col
        .str()?
        .into_iter()
        .map(|v| v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string))
        .collect())
}

fn cell<'a>(col: &'a [Option<String>], row: usize, name: &str) -> IoResult<&'a str> {
    col[row]
        .as_deref()
        .ok_or_else(|| IoError::Schema(format!("row {}: missing value in column {name:?}", row + 1)))
}

/// Decimal point or decimal comma; must be finite.
fn parse_number(raw: &str) -> Option<f64> {
    let v: f64 = raw.trim().replace(',', ".").parse().ok()?;
    v.is_finite().then_some(v)
}

fn parse_population(raw: &str) -> Option<u64> {
    let v = parse_number(raw)?;
    (v >= 0.0 && v.fract() == 0.0 && v <= u64::MAX as f64).then_some(v as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> IoResult<BaselineTable> {
        parse_baseline_table(s.as_bytes(), &TableLayout::default())
    }

    #[test]
    fn reads_bom_index_and_suffixed_headers() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice(
            "Index;Körzet;Népesség;X (%);Y (%)\n0;A;1000;60;40\n1;B;2000;40,5;59.5\n".as_bytes(),
        );
        let t = parse_baseline_table(&bytes, &TableLayout::default()).unwrap();
        let names: Vec<&str> = t.roster().names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
        assert_eq!(t.districts()[1].id, "B");
        assert_eq!(t.districts()[1].population, 2000);
        assert_eq!(t.districts()[1].shares, vec![40.5, 59.5]);
        assert_eq!(t.total_population(), 3000);
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let err = parse("Körzet;X;Y\nA;60;40\n").unwrap_err();
        assert!(matches!(err, IoError::Schema(m) if m.contains("Népesség")));
    }

    #[test]
    fn numeric_ids_keep_their_spelling() {
        let t = parse("Körzet;Népesség;X\n007;10;100\n").unwrap();
        assert_eq!(t.districts()[0].id, "007");
    }

    #[test]
    fn bad_cells_rejected() {
        assert!(matches!(parse("Körzet;Népesség;X\nA;-5;100\n"), Err(IoError::Schema(_))));
        assert!(matches!(parse("Körzet;Népesség;X\nA;10.5;100\n"), Err(IoError::Schema(_))));
        assert!(matches!(parse("Körzet;Népesség;X\nA;10;abc\n"), Err(IoError::Schema(_))));
        assert!(matches!(parse("Körzet;Népesség;X\nA;10;\n"), Err(IoError::Schema(_))));
    }

    #[test]
    fn duplicate_districts_and_parties_rejected() {
        assert!(matches!(
            parse("Körzet;Népesség;X\nA;10;1\nA;20;2\n"),
            Err(IoError::Schema(m)) if m.contains("duplicate district")
        ));
        assert!(matches!(
            parse("Körzet;Népesség;X;X (%)\nA;10;1;2\n"),
            Err(IoError::Schema(m)) if m.contains("duplicate party")
        ));
    }

    #[test]
    fn no_party_columns_rejected() {
        assert!(matches!(parse("Körzet;Népesség\nA;10\n"), Err(IoError::Schema(_))));
    }
}
