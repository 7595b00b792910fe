// crates/sp_algo/src/lib.rs
#![forbid(unsafe_code)]

//! Pure seat-projection math. No I/O, no logging; every function is a
//! deterministic map from roster-aligned inputs to roster-aligned outputs.

use core::fmt;

pub use sp_core::{PartyName, PartyRoster, TieOrder};

// ----------------------------- Errors -------------------------------------------------

/// Typed failures of the projection and apportionment math.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AlgoError {
    /// The baseline table has no population at all.
    ZeroPopulation,
    /// A party's population-weighted national baseline is zero (ratio undefined).
    ZeroBaseline { party: String },
    /// The roster has no parties, so no district can have a winner.
    EmptyRoster,
    /// No party passes the threshold / independent filter.
    NoEligibleParties,
    /// Fixed seats leave a negative apportionment pool.
    FixedSeatsExceedTotal { fixed: u64, total: u32 },
    /// A list-vote total does not fit in 64 bits.
    VoteOverflow { party: String },
    /// A per-party vector does not match the roster length.
    DistrictShapeMismatch { context: &'static str, expected: usize, got: usize },
}

impl fmt::Display for AlgoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoError::ZeroPopulation => write!(f, "total population is zero"),
            AlgoError::ZeroBaseline { party } => {
                write!(f, "national baseline share of {party} is zero")
            }
            AlgoError::EmptyRoster => write!(f, "no parties in roster"),
            AlgoError::NoEligibleParties => write!(f, "no party is eligible for list seats"),
            AlgoError::FixedSeatsExceedTotal { fixed, total } => {
                write!(f, "fixed seats ({fixed}) exceed total seats ({total})")
            }
            AlgoError::VoteOverflow { party } => {
                write!(f, "list vote total of {party} overflows")
            }
            AlgoError::DistrictShapeMismatch { context, expected, got } => {
                write!(f, "{context}: expected {expected} per-party values, got {got}")
            }
        }
    }
}

impl std::error::Error for AlgoError {}

pub(crate) fn check_len(context: &'static str, expected: usize, got: usize) -> Result<(), AlgoError> {
    if expected != got {
        return Err(AlgoError::DistrictShapeMismatch { context, expected, got });
    }
    Ok(())
}

// ----------------------------- Projection pipeline (public surface) -------------------

pub mod aggregation;
pub mod projection;
pub mod tactical;
pub mod votes;

pub mod tabulation {
    pub mod plurality;

    pub use plurality::{resolve_district, DistrictOutcome};
}

pub mod allocation {
    pub mod dhondt;
    pub mod mixed;

    pub use dhondt::allocate_dhondt;
    pub use mixed::{apportion_list, ListApportionment};
}

pub use aggregation::{adjusted_shares, list_bases, list_weights, national_voters, NationalPools};
pub use allocation::{allocate_dhondt, apportion_list, ListApportionment};
pub use projection::{national_baseline, project_districts, Projection};
pub use tabulation::{resolve_district, DistrictOutcome};
pub use tactical::{apply_transfers, TransferDiagnostic};
pub use votes::{convert_votes, district_voters, DistrictVotes};
