//! ALLOCATE stage: threshold eligibility, fixed-seat carve-out, D'Hondt.

use tracing::debug;

use sp_algo::{apportion_list, ListApportionment};
use sp_core::TieOrder;

use crate::aggregate::ListAggregate;
use crate::load::LoadedScenario;
use crate::PipelineError;

pub fn allocate(
    loaded: &LoadedScenario,
    agg: &ListAggregate,
    tie: &TieOrder,
) -> Result<ListApportionment, PipelineError> {
    let out = apportion_list(
        &loaded.params,
        loaded.table.roster(),
        &loaded.assumptions.targets,
        &agg.list_weights,
        &loaded.assumptions.fixed_seats,
        tie,
    )
    .map_err(PipelineError::Allocate)?;
    debug!(seat_pool = out.seat_pool, dhondt = ?out.dhondt_seats, "list seats apportioned");
    Ok(out)
}
