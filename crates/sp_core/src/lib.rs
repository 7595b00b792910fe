//! sp_core: Core types, domains, ordering helpers, and rounding for the seat engine.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! workspace (`sp_io`, `sp_algo`, `sp_pipeline`, `sp_report`, `sp_cli`).
//!
//! - Party names and the name normalizer (`names`)
//! - Districts, the baseline table, tactical rules, national assumptions (`entities`)
//! - Run parameters and their domains (`variables`)
//! - Round-half-away-from-zero helpers (`rounding`)
//! - Deterministic tie order (`determinism`)
//!
//! Serialization derives are gated behind the `serde` feature.

#![forbid(unsafe_code)]

pub mod errors {
    use core::fmt;

    /// Error set for core-domain validation & parsing.
    #[derive(Clone, Debug, Eq, PartialEq)]
    pub enum CoreError {
        /// A party name is empty after normalization.
        InvalidPartyName,
        /// Two roster entries normalize to the same party.
        DuplicateParty(String),
        /// Two districts share an identifier.
        DuplicateDistrict(String),
        /// A district row does not carry one share per roster party.
        ShapeMismatch { district: String, expected: usize, got: usize },
        /// Tactical fraction must be finite and inside [0, 1].
        InvalidFraction(String),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidPartyName => write!(f, "invalid party name"),
                CoreError::DuplicateParty(p) => write!(f, "duplicate party: {p}"),
                CoreError::DuplicateDistrict(d) => write!(f, "duplicate district: {d}"),
                CoreError::ShapeMismatch { district, expected, got } => {
                    write!(f, "district {district}: expected {expected} shares, got {got}")
                }
                CoreError::InvalidFraction(v) => write!(f, "invalid transfer fraction: {v}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    impl std::error::Error for CoreError {}
}

pub mod determinism;
pub mod entities;
pub mod names;
pub mod rounding;
pub mod variables;

pub use determinism::TieOrder;
pub use entities::{BaselineTable, District, NationalAssumptions, PartyRoster, TacticalRule, TacticalRules};
pub use errors::CoreError;
pub use names::{normalize_party_name, PartyName};
pub use variables::{Params, TiePolicy};
