//! National pools and the list aggregator.
//!
//! - Outcome accumulation: `individual[winner] += 1`,
//!   `compensation[winner] += margin + 1`, `leftover[p] += votes[p]` for every
//!   non-winner.
//! - `nationalVoters = round(turnout / 100 · totalPopulation)`
//! - `listBase[p] = round(mean_d(adjusted[d,p]) / 100 · nationalVoters) + external[p]`
//! - `listWeight[p] = listBase[p] + leftover[p] + compensation[p]`

use sp_core::rounding::{percent_of, round_2dp, round_to_count};
use sp_core::PartyRoster;

use crate::tabulation::DistrictOutcome;
use crate::{check_len, AlgoError};

/// Per-party national accumulators, roster-aligned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NationalPools {
    /// Districts won.
    pub individual_mandates: Vec<u32>,
    /// Post-transfer district votes summed over all districts.
    pub individual_votes: Vec<u64>,
    /// Votes cast for the party in districts it did not win.
    pub leftover: Vec<u64>,
    /// Σ (margin + 1) over districts won.
    pub compensation: Vec<u64>,
}

impl NationalPools {
    pub fn new(parties: usize) -> Self {
        Self {
            individual_mandates: vec![0; parties],
            individual_votes: vec![0; parties],
            leftover: vec![0; parties],
            compensation: vec![0; parties],
        }
    }

    /// Fold one resolved district into the pools.
    pub fn record(&mut self, votes: &[u64], outcome: &DistrictOutcome) -> Result<(), AlgoError> {
        check_len("district votes", self.leftover.len(), votes.len())?;
        for (p, &v) in votes.iter().enumerate() {
            self.individual_votes[p] += v;
            if p != outcome.winner {
                self.leftover[p] += v;
            }
        }
        self.individual_mandates[outcome.winner] += 1;
        self.compensation[outcome.winner] += outcome.margin + 1;
        Ok(())
    }
}

/// Post-transfer percentages, rounded to 2 decimals (all 0 when the district is empty).
pub fn adjusted_shares(votes: &[u64]) -> Vec<f64> {
    let total: u64 = votes.iter().sum();
    votes.iter().map(|&v| round_2dp(percent_of(v, total))).collect()
}

#[inline]
pub fn national_voters(total_population: u64, turnout_pct: f64) -> u64 {
    round_to_count(turnout_pct / 100.0 * total_population as f64)
}

/// List-vote base per party from the mean adjusted district share.
pub fn list_bases(
    roster: &PartyRoster,
    adjusted: &[Vec<f64>],
    national_voters: u64,
    external_votes: &[u64],
) -> Result<Vec<u64>, AlgoError> {
    let n = roster.len();
    check_len("external votes", n, external_votes.len())?;
    let mut sums = vec![0.0_f64; n];
    for row in adjusted {
        check_len("adjusted shares", n, row.len())?;
        for (acc, &s) in sums.iter_mut().zip(row) {
            *acc += s;
        }
    }
    let districts = adjusted.len();
    sums.into_iter()
        .zip(external_votes)
        .enumerate()
        .map(|(p, (sum, &ext))| {
            let mean = if districts == 0 { 0.0 } else { sum / districts as f64 };
            round_to_count(mean / 100.0 * national_voters as f64)
                .checked_add(ext)
                .ok_or_else(|| overflow(roster, p))
        })
        .collect()
}

/// `listBase + leftover + compensation` per party.
pub fn list_weights(
    roster: &PartyRoster,
    bases: &[u64],
    pools: &NationalPools,
) -> Result<Vec<u64>, AlgoError> {
    check_len("list bases", roster.len(), bases.len())?;
    check_len("national pools", roster.len(), pools.leftover.len())?;
    bases
        .iter()
        .zip(&pools.leftover)
        .zip(&pools.compensation)
        .enumerate()
        .map(|(p, ((&b, &l), &c))| {
            b.checked_add(l)
                .and_then(|s| s.checked_add(c))
                .ok_or_else(|| overflow(roster, p))
        })
        .collect()
}

fn overflow(roster: &PartyRoster, p: usize) -> AlgoError {
    AlgoError::VoteOverflow { party: roster.name(p).to_string() }
}
