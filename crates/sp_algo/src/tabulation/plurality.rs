// crates/sp_algo/src/tabulation/plurality.rs
//
// District outcome resolution (single-member plurality).
//
// Contract:
// - winner = party with the maximum post-transfer vote count; exact ties go to
//   the party preferred by the run's `TieOrder`.
// - runner-up votes = maximum over all other parties (0 with a one-party roster).
// - margin = winner − runner-up; margin_pct = round2(margin / total · 100), 0
//   for an empty district.
// - Pure integer comparisons; the only float is the reported percentage.

use sp_core::rounding::{percent_of, round_2dp};
use sp_core::TieOrder;

use crate::AlgoError;

#[derive(Clone, Debug, PartialEq)]
pub struct DistrictOutcome {
    /// Roster index of the winner.
    pub winner: usize,
    pub winner_votes: u64,
    pub runner_up_votes: u64,
    pub margin: u64,
    pub margin_pct: f64,
    pub total_votes: u64,
}

/// Resolve one district from its roster-aligned vote vector.
pub fn resolve_district(votes: &[u64], tie: &TieOrder) -> Result<DistrictOutcome, AlgoError> {
    if votes.is_empty() {
        return Err(AlgoError::EmptyRoster);
    }

    let mut winner = 0usize;
    for (i, &v) in votes.iter().enumerate().skip(1) {
        let best = votes[winner];
        if v > best || (v == best && tie.prefers(i, winner)) {
            winner = i;
        }
    }

    let winner_votes = votes[winner];
    let runner_up_votes = votes
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != winner)
        .map(|(_, &v)| v)
        .max()
        .unwrap_or(0);
    let margin = winner_votes - runner_up_votes;
    let total_votes: u64 = votes.iter().sum();

    Ok(DistrictOutcome {
        winner,
        winner_votes,
        runner_up_votes,
        margin,
        margin_pct: round_2dp(percent_of(margin, total_votes)),
        total_votes,
    })
}
