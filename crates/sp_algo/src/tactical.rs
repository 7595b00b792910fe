//! Tactical transfer engine.
//!
//! For one district, apply its rule set in configured order: move
//! `round(votes[source] · fraction)` votes from `source` to `target`, in place.
//! Rules naming a party outside the roster are skipped and reported as a
//! [`TransferDiagnostic`]; they never abort the run.

use sp_core::rounding::round_to_count;
use sp_core::{PartyName, PartyRoster, TacticalRule};

/// A rule skipped because its source or target is not a roster party.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransferDiagnostic {
    pub district: String,
    pub source: PartyName,
    pub target: PartyName,
}

impl core::fmt::Display for TransferDiagnostic {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "district {}: tactical rule {} -> {} names an unknown party; skipped",
            self.district, self.source, self.target
        )
    }
}

/// Apply `rules` to `votes` (roster-aligned) for district `district_id`.
pub fn apply_transfers(
    district_id: &str,
    votes: &mut [u64],
    rules: &[TacticalRule],
    roster: &PartyRoster,
) -> Vec<TransferDiagnostic> {
    let mut diagnostics = Vec::new();
    for rule in rules {
        let (Some(src), Some(dst)) = (roster.index_of(&rule.source), roster.index_of(&rule.target))
        else {
            diagnostics.push(TransferDiagnostic {
                district: district_id.to_string(),
                source: rule.source.clone(),
                target: rule.target.clone(),
            });
            continue;
        };
        if src == dst {
            continue;
        }
        let moved = round_to_count(votes[src] as f64 * rule.fraction).min(votes[src]);
        votes[src] -= moved;
        votes[dst] += moved;
    }
    diagnostics
}
