//! Report data model and its mapping from pipeline artifacts.
//! Reads only; never recomputes a figure the engine already produced.

use serde_json::Value;

use crate::{j_bool, j_f64, j_str, j_u64, ReportError, ResultArtifact, RunRecordArtifact};

#[derive(Clone, Debug, PartialEq)]
pub struct ReportModel {
    pub cover: CoverBlock,
    pub tally: Vec<TallyRow>,
    pub districts: Vec<DistrictRow>,
    pub skipped_rules: Vec<SkippedRule>,
    pub integrity: IntegrityBlock,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CoverBlock {
    pub title: String,
    pub total_seats: u64,
    pub seat_pool: u64,
    pub national_voters: u64,
    pub districts: u64,
}

/// One party, roster order.
#[derive(Clone, Debug, PartialEq)]
pub struct TallyRow {
    pub party: String,
    pub total: u64,
    pub individual: u64,
    pub list: u64,
    pub fixed: u64,
    pub list_votes: u64,
    pub individual_votes: u64,
    pub eligible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DistrictRow {
    pub id: String,
    pub winner: String,
    pub margin_votes: u64,
    /// Two decimals, no `%` sign.
    pub margin_pct_2dp: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRule {
    pub district: String,
    pub source: String,
    pub target: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegrityBlock {
    pub run_id: String,
    pub engine_name: String,
    pub engine_version: String,
    pub table_sha256: String,
    pub scenario_sha256: String,
    pub district_table_sha256: String,
    pub result_sha256: String,
    pub tie_policy: String,
    pub rounding: String,
}

/// Build the report model from the result and run record documents.
pub fn build_model(result: &ResultArtifact, run: &RunRecordArtifact) -> Result<ReportModel, ReportError> {
    let districts_json = array(result, "/districts")?;

    let cover = CoverBlock {
        title: "Seat projection".to_string(),
        total_seats: j_u64(result, "/total_seats")?,
        seat_pool: j_u64(result, "/seat_pool")?,
        national_voters: j_u64(result, "/national_voters")?,
        districts: districts_json.len() as u64,
    };

    let tally = array(result, "/tally")?
        .iter()
        .map(|t| {
            let row = TallyRow {
                party: j_str(t, "/party")?,
                total: j_u64(t, "/total_mandates")?,
                individual: j_u64(t, "/individual_mandates")?,
                list: j_u64(t, "/list_mandates")?,
                fixed: j_u64(t, "/fixed_seats")?,
                list_votes: j_u64(t, "/list_votes")?,
                individual_votes: j_u64(t, "/individual_votes")?,
                eligible: j_bool(t, "/eligible")?,
            };
            if row.individual + row.list != row.total {
                return Err(ReportError::Inconsistent("tally: individual + list != total"));
            }
            Ok(row)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let seated: u64 = tally.iter().map(|t| t.list).sum();
    if seated != cover.total_seats {
        return Err(ReportError::Inconsistent("tally: list mandates do not sum to total_seats"));
    }

    let districts = districts_json
        .iter()
        .map(|d| {
            Ok(DistrictRow {
                id: j_str(d, "/id")?,
                winner: j_str(d, "/winner")?,
                margin_votes: j_u64(d, "/margin_votes")?,
                margin_pct_2dp: format!("{:.2}", j_f64(d, "/margin_pct")?),
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    let skipped_rules = array(result, "/diagnostics")?
        .iter()
        .map(|d| {
            Ok(SkippedRule {
                district: j_str(d, "/district")?,
                source: j_str(d, "/source")?,
                target: j_str(d, "/target")?,
            })
        })
        .collect::<Result<Vec<_>, ReportError>>()?;

    let integrity = IntegrityBlock {
        run_id: j_str(run, "/id")?,
        engine_name: j_str(run, "/engine/name").unwrap_or_else(|_| "seat_projection".into()),
        engine_version: j_str(run, "/engine/version").unwrap_or_else(|_| "0.0.0".into()),
        table_sha256: j_str(run, "/inputs/table_sha256")?,
        scenario_sha256: j_str(run, "/inputs/scenario_sha256")?,
        district_table_sha256: j_str(run, "/outputs/district_table_sha256")?,
        result_sha256: j_str(run, "/outputs/result_sha256")?,
        tie_policy: j_str(run, "/determinism/tie_policy")?,
        rounding: j_str(run, "/determinism/rounding")?,
    };

    Ok(ReportModel { cover, tally, districts, skipped_rules, integrity })
}

fn array<'a>(root: &'a Value, ptr: &'static str) -> Result<&'a Vec<Value>, ReportError> {
    root.pointer(ptr)
        .and_then(|v| v.as_array())
        .ok_or(ReportError::MissingField(ptr))
}
