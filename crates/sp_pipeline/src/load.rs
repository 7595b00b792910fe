//! LOAD stage: parse the baseline table, resolve the scenario against its
//! roster, and fingerprint both inputs.

use serde::Serialize;
use tracing::debug;

use sp_core::{BaselineTable, NationalAssumptions, Params};
use sp_io::config::{ScenarioConfig, TableLayout};
use sp_io::hasher::{sha256_canonical, sha256_hex};
use sp_io::table::parse_baseline_table;

use crate::PipelineError;

/// Typed, validated inputs of one run.
#[derive(Debug, Clone)]
pub struct LoadedScenario {
    pub table: BaselineTable,
    pub params: Params,
    pub assumptions: NationalAssumptions,
    pub layout: TableLayout,
    /// SHA-256 of the raw table bytes.
    pub table_sha256: String,
    /// SHA-256 of the canonical resolved scenario.
    pub scenario_sha256: String,
}

/// Resolved scenario as hashed into the run record. Rule order survives
/// canonicalization because rules are arrays here, not objects.
#[derive(Serialize)]
struct CanonicalScenario<'a> {
    roster: Vec<&'a str>,
    params: &'a Params,
    assumptions: &'a NationalAssumptions,
    layout: &'a TableLayout,
}

pub fn load(table_bytes: &[u8], config: &ScenarioConfig) -> Result<LoadedScenario, PipelineError> {
    let layout = config.layout.clone();
    let table = parse_baseline_table(table_bytes, &layout)?;
    let params = config.params()?;
    let assumptions = config.assumptions(table.roster())?;

    for district in assumptions.tactical.by_district.keys() {
        if !table.districts().iter().any(|d| &d.id == district) {
            debug!(%district, "tactical override names a district absent from the table; ignored");
        }
    }

    let canonical = CanonicalScenario {
        roster: table.roster().names().iter().map(|n| n.as_str()).collect(),
        params: &params,
        assumptions: &assumptions,
        layout: &layout,
    };
    let scenario_sha256 = sha256_canonical(&canonical)?;
    let table_sha256 = sha256_hex(table_bytes);

    debug!(
        districts = table.districts().len(),
        parties = table.roster().len(),
        total_seats = params.total_seats,
        fixed_seats = assumptions.fixed_total(),
        "scenario loaded"
    );

    Ok(LoadedScenario { table, params, assumptions, layout, table_sha256, scenario_sha256 })
}
