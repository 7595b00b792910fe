//! RESOLVE stage: district winners and margins, folded into the national pools.

use sp_algo::{resolve_district, DistrictOutcome, NationalPools};
use sp_core::TieOrder;

use crate::load::LoadedScenario;
use crate::tabulate::Tabulation;
use crate::PipelineError;

#[derive(Debug, Clone)]
pub struct Resolution {
    pub outcomes: Vec<DistrictOutcome>,
    pub pools: NationalPools,
}

pub fn resolve(
    loaded: &LoadedScenario,
    tab: &Tabulation,
    tie: &TieOrder,
) -> Result<Resolution, PipelineError> {
    let mut pools = NationalPools::new(loaded.table.roster().len());
    let mut outcomes = Vec::with_capacity(tab.votes.len());
    for dv in &tab.votes {
        let outcome = resolve_district(&dv.votes, tie).map_err(PipelineError::Project)?;
        pools.record(&dv.votes, &outcome).map_err(PipelineError::Project)?;
        outcomes.push(outcome);
    }
    Ok(Resolution { outcomes, pools })
}
