//! Vote converter: projected district shares → integer vote counts.
//!
//! `voters[d] = round(population[d] · turnout / 100)`,
//! `votes[d,p] = round(projected[d,p] / 100 · voters[d])`,
//! both rounded half away from zero.

use sp_core::rounding::round_to_count;
use sp_core::District;

/// Integer votes for one district, roster-aligned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistrictVotes {
    pub voters: u64,
    pub votes: Vec<u64>,
}

impl DistrictVotes {
    pub fn total(&self) -> u64 {
        self.votes.iter().sum()
    }
}

#[inline]
pub fn district_voters(population: u64, turnout_pct: f64) -> u64 {
    round_to_count(population as f64 * turnout_pct / 100.0)
}

/// Convert one district's projected shares (percent) into vote counts.
pub fn convert_votes(district: &District, projected: &[f64], turnout_pct: f64) -> DistrictVotes {
    let voters = district_voters(district.population, turnout_pct);
    let votes = projected
        .iter()
        .map(|&share| round_to_count(share / 100.0 * voters as f64))
        .collect();
    DistrictVotes { voters, votes }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn district(pop: u64) -> District {
        District { id: "A".into(), population: pop, shares: vec![] }
    }

    #[test]
    fn voters_round_half_away() {
        assert_eq!(district_voters(1000, 50.0), 500);
        assert_eq!(district_voters(3, 50.0), 2);
        assert_eq!(district_voters(0, 70.0), 0);
    }

    #[test]
    fn halfway_vote_counts_round_up() {
        let v = convert_votes(&district(2000), &[42.857142857142854, 56.25], 50.0);
        assert_eq!(v.voters, 1000);
        assert_eq!(v.votes, vec![429, 563]);
        assert_eq!(v.total(), 992);
    }

    #[test]
    fn zero_share_gives_zero_votes() {
        let v = convert_votes(&district(1000), &[100.0, 0.0], 70.0);
        assert_eq!(v.votes, vec![700, 0]);
    }
}
