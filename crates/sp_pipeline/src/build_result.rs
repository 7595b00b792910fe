//! BUILD_RESULT: assemble the projection result (per-district rows and the
//! per-party tally) and cross-check the seat totals before anything leaves
//! the pipeline.

use serde::Serialize;

use sp_algo::ListApportionment;
use sp_io::writer::DistrictTable;

use crate::aggregate::ListAggregate;
use crate::load::LoadedScenario;
use crate::resolve::Resolution;
use crate::tabulate::Tabulation;
use crate::PipelineError;

/// One district after projection, conversion, transfers and resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictResult {
    pub id: String,
    pub population: u64,
    pub voters: u64,
    /// Projected percent per party, before vote conversion.
    pub projected_pct: Vec<f64>,
    /// Post-transfer votes per party.
    pub votes: Vec<u64>,
    /// Post-transfer percent per party, 2 decimals.
    pub adjusted_pct: Vec<f64>,
    pub winner: String,
    pub margin_votes: u64,
    pub margin_pct: f64,
}

/// National totals for one party.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartyTally {
    pub party: String,
    pub target_pct: f64,
    pub baseline_pct: f64,
    pub individual_mandates: u32,
    pub list_mandates: u32,
    pub total_mandates: u32,
    pub fixed_seats: u32,
    pub list_votes: u64,
    pub individual_votes: u64,
    pub leftover_votes: u64,
    pub compensation_votes: u64,
    pub list_weight: u64,
    pub eligible: bool,
}

/// A skipped tactical rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticEntry {
    pub district: String,
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionResult {
    pub parties: Vec<String>,
    pub districts: Vec<DistrictResult>,
    pub tally: Vec<PartyTally>,
    pub national_voters: u64,
    pub total_seats: u32,
    pub seat_pool: u32,
    pub diagnostics: Vec<DiagnosticEntry>,
}

impl ProjectionResult {
    /// Rows for the district CSV.
    pub fn district_table(&self) -> DistrictTable {
        DistrictTable {
            parties: self.parties.clone(),
            districts: self.districts.iter().map(|d| d.id.clone()).collect(),
            adjusted: self.districts.iter().map(|d| d.adjusted_pct.clone()).collect(),
            winners: self.districts.iter().map(|d| d.winner.clone()).collect(),
            margin_pct: self.districts.iter().map(|d| d.margin_pct).collect(),
        }
    }

    pub fn tally_for(&self, party: &str) -> Option<&PartyTally> {
        self.tally.iter().find(|t| t.party == party)
    }
}

pub fn build_result(
    loaded: &LoadedScenario,
    tab: &Tabulation,
    res: &Resolution,
    agg: &ListAggregate,
    alloc: &ListApportionment,
) -> Result<ProjectionResult, PipelineError> {
    let roster = loaded.table.roster();
    let parties: Vec<String> = roster.names().iter().map(|n| n.to_string()).collect();

    let mut districts = Vec::with_capacity(loaded.table.districts().len());
    for (d, district) in loaded.table.districts().iter().enumerate() {
        let (Some(projected), Some(dv), Some(outcome), Some(adjusted)) = (
            tab.projection.shares.get(d),
            tab.votes.get(d),
            res.outcomes.get(d),
            agg.adjusted.get(d),
        ) else {
            return Err(PipelineError::Build(format!("missing stage output for district {}", district.id)));
        };
        districts.push(DistrictResult {
            id: district.id.clone(),
            population: district.population,
            voters: dv.voters,
            projected_pct: projected.clone(),
            votes: dv.votes.clone(),
            adjusted_pct: adjusted.clone(),
            winner: roster.name(outcome.winner).to_string(),
            margin_votes: outcome.margin,
            margin_pct: outcome.margin_pct,
        });
    }

    let pools = &res.pools;
    let tally: Vec<PartyTally> = roster
        .iter()
        .map(|(i, name)| {
            let individual = pools.individual_mandates[i];
            let list = alloc.list_mandates[i];
            PartyTally {
                party: name.to_string(),
                target_pct: loaded.assumptions.targets[i],
                baseline_pct: tab.projection.baseline[i],
                individual_mandates: individual,
                list_mandates: list,
                total_mandates: individual + list,
                fixed_seats: loaded.assumptions.fixed_seats[i],
                list_votes: agg.list_votes[i],
                individual_votes: pools.individual_votes[i],
                leftover_votes: pools.leftover[i],
                compensation_votes: pools.compensation[i],
                list_weight: agg.list_weights[i],
                eligible: alloc.eligible[i],
            }
        })
        .collect();

    let individual_sum: u64 = tally.iter().map(|t| u64::from(t.individual_mandates)).sum();
    if individual_sum != districts.len() as u64 {
        return Err(PipelineError::Build(format!(
            "{individual_sum} individual mandates for {} districts",
            districts.len()
        )));
    }
    let list_sum: u64 = tally.iter().map(|t| u64::from(t.list_mandates)).sum();
    if list_sum != u64::from(loaded.params.total_seats) {
        return Err(PipelineError::Build(format!(
            "{list_sum} list mandates for {} seats",
            loaded.params.total_seats
        )));
    }

    let diagnostics = tab
        .diagnostics
        .iter()
        .map(|d| DiagnosticEntry {
            district: d.district.clone(),
            source: d.source.to_string(),
            target: d.target.to_string(),
        })
        .collect();

    Ok(ProjectionResult {
        parties,
        districts,
        tally,
        national_voters: agg.national_voters,
        total_seats: loaded.params.total_seats,
        seat_pool: alloc.seat_pool,
        diagnostics,
    })
}
