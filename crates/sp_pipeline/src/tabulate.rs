//! TABULATE stage: project shares, convert to votes, apply tactical transfers.
//!
//! Districts are processed in table order. Skipped tactical rules are logged
//! at `warn` and returned so the caller can surface them.

use tracing::{debug, warn};

use sp_algo::{apply_transfers, convert_votes, project_districts, DistrictVotes, Projection, TransferDiagnostic};

use crate::load::LoadedScenario;
use crate::PipelineError;

#[derive(Debug, Clone)]
pub struct Tabulation {
    pub projection: Projection,
    /// Post-transfer votes per district, table order.
    pub votes: Vec<DistrictVotes>,
    pub diagnostics: Vec<TransferDiagnostic>,
}

pub fn tabulate(loaded: &LoadedScenario) -> Result<Tabulation, PipelineError> {
    let table = &loaded.table;
    let roster = table.roster();

    let projection =
        project_districts(table, &loaded.assumptions.targets).map_err(PipelineError::Project)?;
    debug!(baseline = ?projection.baseline, "national baseline shares");

    let mut votes = Vec::with_capacity(table.districts().len());
    let mut diagnostics = Vec::new();
    for (district, shares) in table.districts().iter().zip(&projection.shares) {
        let mut dv = convert_votes(district, shares, loaded.params.turnout_pct);
        let rules = loaded.assumptions.tactical.rules_for(&district.id);
        for diag in apply_transfers(&district.id, &mut dv.votes, rules, roster) {
            warn!(
                district = %diag.district,
                source = %diag.source,
                target = %diag.target,
                "tactical rule names an unknown party; skipped"
            );
            diagnostics.push(diag);
        }
        votes.push(dv);
    }

    Ok(Tabulation { projection, votes, diagnostics })
}
