//! BUILD_RUN_RECORD: provenance for one run.
//!
//! - Inputs are identified by the SHA-256 of the raw table bytes and of the
//!   canonical resolved scenario.
//! - Outputs are identified by the SHA-256 of the district CSV bytes and of
//!   the canonical result document.
//! - Run ID = `RUN:` + SHA-256 of the canonical record body (everything but
//!   the id itself). No timestamps, so identical inputs give identical records.

use serde::Serialize;

use sp_core::TiePolicy;
use sp_io::hasher::{sha256_canonical, sha256_hex};

use crate::build_result::ProjectionResult;
use crate::load::LoadedScenario;
use crate::{EngineMeta, PipelineError};

pub const ROUNDING_RULE: &str = "half_away_from_zero";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunInputs {
    pub table_sha256: String,
    pub scenario_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunOutputs {
    pub district_table_sha256: String,
    pub result_sha256: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunDeterminism {
    pub tie_policy: TiePolicy,
    pub rounding: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunRecord {
    pub id: String,
    pub engine: EngineMeta,
    pub inputs: RunInputs,
    pub outputs: RunOutputs,
    pub determinism: RunDeterminism,
    pub total_seats: u32,
    pub districts: usize,
    pub skipped_rules: usize,
}

#[derive(Serialize)]
struct RecordBody<'a> {
    engine: &'a EngineMeta,
    inputs: &'a RunInputs,
    outputs: &'a RunOutputs,
    determinism: &'a RunDeterminism,
    total_seats: u32,
    districts: usize,
    skipped_rules: usize,
}

pub fn build_run_record(
    loaded: &LoadedScenario,
    result: &ProjectionResult,
    district_csv: &[u8],
    engine: EngineMeta,
) -> Result<RunRecord, PipelineError> {
    let inputs = RunInputs {
        table_sha256: loaded.table_sha256.clone(),
        scenario_sha256: loaded.scenario_sha256.clone(),
    };
    let outputs = RunOutputs {
        district_table_sha256: sha256_hex(district_csv),
        result_sha256: sha256_canonical(result)?,
    };
    let determinism = RunDeterminism {
        tie_policy: loaded.params.tie_policy,
        rounding: ROUNDING_RULE.to_string(),
    };

    let body = RecordBody {
        engine: &engine,
        inputs: &inputs,
        outputs: &outputs,
        determinism: &determinism,
        total_seats: result.total_seats,
        districts: result.districts.len(),
        skipped_rules: result.diagnostics.len(),
    };
    let id = format!("RUN:{}", sha256_canonical(&body)?);

    Ok(RunRecord {
        id,
        engine,
        inputs,
        outputs,
        determinism,
        total_seats: result.total_seats,
        districts: result.districts.len(),
        skipped_rules: result.diagnostics.len(),
    })
}
