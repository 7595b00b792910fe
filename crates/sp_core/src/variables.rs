//! Run parameters and their domains.
//!
//! `Params` carries the scalar knobs of one projection run. Everything
//! party-keyed lives in [`crate::entities::NationalAssumptions`] instead.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::names::PartyName;

/// ------------ Defaults ------------

pub const DEFAULT_TURNOUT_PCT: f64 = 70.0;
pub const DEFAULT_TOTAL_SEATS: u32 = 93;
pub const DEFAULT_THRESHOLD_PCT: f64 = 5.0;
pub const DEFAULT_INDEPENDENT_PARTY: &str = "Független";

/// ------------ Enums ------------

/// How exact ties (district winners, equal D'Hondt quotients) are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TiePolicy {
    /// Lexicographically smallest normalized party name wins.
    #[default]
    Alphabetical,
    /// Earliest roster column wins.
    TableOrder,
}

/// ------------ Params ------------

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Params {
    /// National turnout, percent of population.
    pub turnout_pct: f64,
    /// Total list seats, including fixed seats.
    pub total_seats: u32,
    /// Minimum national target share (percent) for list eligibility.
    pub threshold_pct: f64,
    /// Party excluded from list apportionment regardless of share.
    pub independent_party: PartyName,
    pub tie_policy: TiePolicy,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            turnout_pct: DEFAULT_TURNOUT_PCT,
            total_seats: DEFAULT_TOTAL_SEATS,
            threshold_pct: DEFAULT_THRESHOLD_PCT,
            independent_party: PartyName::from_static(DEFAULT_INDEPENDENT_PARTY),
            tie_policy: TiePolicy::Alphabetical,
        }
    }
}

impl Params {
    /// Check every scalar against its domain.
    pub fn validate_domains(&self) -> Result<(), CoreError> {
        if !pct_in_range(self.turnout_pct) {
            return Err(CoreError::DomainOutOfRange("turnout_pct"));
        }
        if !pct_in_range(self.threshold_pct) {
            return Err(CoreError::DomainOutOfRange("threshold_pct"));
        }
        if self.total_seats == 0 {
            return Err(CoreError::DomainOutOfRange("total_seats"));
        }
        Ok(())
    }

    /// A party is list-eligible when its target reaches the threshold and it is
    /// not the independent pseudo-party.
    pub fn is_list_eligible(&self, party: &PartyName, target_pct: f64) -> bool {
        target_pct >= self.threshold_pct && *party != self.independent_party
    }
}

fn pct_in_range(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let p = Params::default();
        assert_eq!(p.turnout_pct, 70.0);
        assert_eq!(p.total_seats, 93);
        assert_eq!(p.threshold_pct, 5.0);
        assert_eq!(p.independent_party.as_str(), "Független");
        assert_eq!(p.tie_policy, TiePolicy::Alphabetical);
        assert!(p.validate_domains().is_ok());
    }

    #[test]
    fn domains_are_checked() {
        let mut p = Params { turnout_pct: 100.5, ..Params::default() };
        assert_eq!(p.validate_domains(), Err(CoreError::DomainOutOfRange("turnout_pct")));
        p.turnout_pct = 50.0;
        p.total_seats = 0;
        assert_eq!(p.validate_domains(), Err(CoreError::DomainOutOfRange("total_seats")));
        p.total_seats = 10;
        p.threshold_pct = f64::NAN;
        assert_eq!(p.validate_domains(), Err(CoreError::DomainOutOfRange("threshold_pct")));
    }

    #[test]
    fn eligibility_boundary_is_inclusive() {
        let p = Params::default();
        let x: PartyName = "X".parse().unwrap();
        assert!(p.is_list_eligible(&x, 5.0));
        assert!(!p.is_list_eligible(&x, 4.99));
        assert!(!p.is_list_eligible(&p.independent_party.clone(), 40.0));
    }
}
