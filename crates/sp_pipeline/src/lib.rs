//! sp_pipeline: deterministic pipeline surface
//! (load → tabulate → resolve → aggregate → allocate → build result → build run record).
//!
//! This crate performs no writes. It delegates parsing, canonical JSON and
//! hashing to `sp_io` and all math to `sp_algo`; callers decide where the
//! returned bytes and documents go. Every artifact is complete before the
//! caller sees it, so a failed run never leaves partial output behind.

use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use sp_algo::AlgoError;
use sp_core::TieOrder;
use sp_io::config::ScenarioConfig;
use sp_io::IoError;

pub mod aggregate;
pub mod allocate;
pub mod build_result;
pub mod build_run_record;
pub mod load;
pub mod resolve;
pub mod tabulate;

pub use build_result::{DiagnosticEntry, DistrictResult, PartyTally, ProjectionResult};
pub use build_run_record::RunRecord;
pub use load::LoadedScenario;

/// Single error surface for the pipeline orchestration.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Io(#[from] IoError),
    #[error("projection failed: {0}")]
    Project(AlgoError),
    #[error("apportionment failed: {0}")]
    Allocate(AlgoError),
    #[error("result assembly failed: {0}")]
    Build(String),
}

/// Engine identifiers echoed into the run record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineMeta {
    pub name: String,
    pub version: String,
}

pub fn engine_identifiers() -> EngineMeta {
    EngineMeta {
        name: "seat_projection".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutputs {
    pub result: ProjectionResult,
    /// District table CSV bytes (BOM + header + one row per district).
    pub district_csv: Vec<u8>,
    pub run_record: RunRecord,
}

/// Run from in-memory table bytes and a parsed scenario.
pub fn run(table_bytes: &[u8], config: &ScenarioConfig) -> Result<PipelineOutputs, PipelineError> {
    let loaded = load::load(table_bytes, config)?;
    run_loaded(&loaded)
}

/// Convenience entry: read the table from disk, then [`run`].
pub fn run_from_path(table_path: &Path, config: &ScenarioConfig) -> Result<PipelineOutputs, PipelineError> {
    let bytes = fs::read(table_path)
        .map_err(|e| IoError::Path(format!("{}: {e}", table_path.display())))?;
    run(&bytes, config)
}

/// Run all computation stages over an already loaded scenario.
pub fn run_loaded(loaded: &LoadedScenario) -> Result<PipelineOutputs, PipelineError> {
    let tie = TieOrder::new(loaded.params.tie_policy, loaded.table.roster());

    let tab = tabulate::tabulate(loaded)?;
    let res = resolve::resolve(loaded, &tab, &tie)?;
    let agg = aggregate::aggregate(loaded, &tab, &res)?;
    let alloc = allocate::allocate(loaded, &agg, &tie)?;
    let result = build_result::build_result(loaded, &tab, &res, &agg, &alloc)?;

    let district_csv = result.district_table().to_csv_bytes(&loaded.layout)?;
    debug!(bytes = district_csv.len(), "district table rendered");

    let run_record =
        build_run_record::build_run_record(loaded, &result, &district_csv, engine_identifiers())?;

    for t in &result.tally {
        info!(
            party = %t.party,
            total = t.total_mandates,
            individual = t.individual_mandates,
            list = t.list_mandates,
            "mandates"
        );
    }

    Ok(PipelineOutputs { result, district_csv, run_record })
}
