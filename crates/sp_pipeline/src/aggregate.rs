//! AGGREGATE stage: adjusted district shares and national list weights.

use tracing::debug;

use sp_algo::{adjusted_shares, list_bases, list_weights, national_voters};

use crate::load::LoadedScenario;
use crate::resolve::Resolution;
use crate::tabulate::Tabulation;
use crate::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub struct ListAggregate {
    /// `adjusted[d][p]`, post-transfer percent rounded to 2 decimals.
    pub adjusted: Vec<Vec<f64>>,
    pub national_voters: u64,
    /// List-vote base per party, external votes included.
    pub list_votes: Vec<u64>,
    /// `list_votes + leftover + compensation`.
    pub list_weights: Vec<u64>,
}

pub fn aggregate(
    loaded: &LoadedScenario,
    tab: &Tabulation,
    res: &Resolution,
) -> Result<ListAggregate, PipelineError> {
    let adjusted: Vec<Vec<f64>> = tab.votes.iter().map(|dv| adjusted_shares(&dv.votes)).collect();
    let national_voters =
        national_voters(loaded.table.total_population(), loaded.params.turnout_pct);
    let roster = loaded.table.roster();
    let list_votes =
        list_bases(roster, &adjusted, national_voters, &loaded.assumptions.external_votes)
            .map_err(PipelineError::Project)?;
    let list_weights =
        list_weights(roster, &list_votes, &res.pools).map_err(PipelineError::Project)?;

    debug!(national_voters, ?list_votes, ?list_weights, "list weights");
    Ok(ListAggregate { adjusted, national_voters, list_votes, list_weights })
}
