//! Domain entities: the party roster, districts, the baseline table,
//! tactical transfer rules, and roster-aligned national assumptions.
//!
//! Every per-party quantity in the engine is a `Vec` aligned to the
//! [`PartyRoster`] established once at load time (table column order). No
//! party-keyed map is grown during iteration.

use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::names::PartyName;

/* -------------------------------------------------------------------------- */
/*                                   Roster                                   */
/* -------------------------------------------------------------------------- */

/// Fixed party-index list. Index `i` of every per-party vector refers to `names[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PartyRoster {
    names: Vec<PartyName>,
}

impl PartyRoster {
    /// Build a roster; duplicate names (after normalization) are rejected.
    pub fn new(names: Vec<PartyName>) -> Result<Self, CoreError> {
        let mut seen = BTreeSet::new();
        for n in &names {
            if !seen.insert(n.as_str()) {
                return Err(CoreError::DuplicateParty(n.to_string()));
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn names(&self) -> &[PartyName] { &self.names }

    pub fn name(&self, idx: usize) -> &PartyName { &self.names[idx] }

    pub fn index_of(&self, party: &PartyName) -> Option<usize> {
        self.names.iter().position(|n| n == party)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &PartyName)> {
        self.names.iter().enumerate()
    }
}

/* -------------------------------------------------------------------------- */
/*                                  Districts                                 */
/* -------------------------------------------------------------------------- */

/// One row of the baseline table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct District {
    pub id: String,
    pub population: u64,
    /// Historical percentage per roster party.
    pub shares: Vec<f64>,
}

/// District-by-party baseline table, immutable after load.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaselineTable {
    roster: PartyRoster,
    districts: Vec<District>,
}

impl BaselineTable {
    /// Validate shape (one share per party) and district-id uniqueness.
    pub fn new(roster: PartyRoster, districts: Vec<District>) -> Result<Self, CoreError> {
        let mut ids = BTreeSet::new();
        for d in &districts {
            if !ids.insert(d.id.as_str()) {
                return Err(CoreError::DuplicateDistrict(d.id.clone()));
            }
            if d.shares.len() != roster.len() {
                return Err(CoreError::ShapeMismatch {
                    district: d.id.clone(),
                    expected: roster.len(),
                    got: d.shares.len(),
                });
            }
        }
        Ok(Self { roster, districts })
    }

    pub fn roster(&self) -> &PartyRoster { &self.roster }

    pub fn districts(&self) -> &[District] { &self.districts }

    pub fn total_population(&self) -> u64 {
        self.districts.iter().map(|d| d.population).sum()
    }
}

/* -------------------------------------------------------------------------- */
/*                               Tactical rules                               */
/* -------------------------------------------------------------------------- */

/// Move `fraction` of `source`'s district votes to `target`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TacticalRule {
    pub source: PartyName,
    pub fraction: f64,
    pub target: PartyName,
}

impl TacticalRule {
    pub fn new(source: PartyName, fraction: f64, target: PartyName) -> Result<Self, CoreError> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(CoreError::InvalidFraction(fraction.to_string()));
        }
        Ok(Self { source, fraction, target })
    }
}

/// Global rule set plus per-district overrides. Order inside each set is the
/// configured order and is the application order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TacticalRules {
    pub global: Vec<TacticalRule>,
    pub by_district: BTreeMap<String, Vec<TacticalRule>>,
}

impl TacticalRules {
    /// The rule set for one district: its override if configured, else the global set.
    /// Overrides replace the global set; they never merge with it.
    pub fn rules_for(&self, district_id: &str) -> &[TacticalRule] {
        match self.by_district.get(district_id) {
            Some(rules) => rules,
            None => &self.global,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_district.values().all(Vec::is_empty)
    }
}

/* -------------------------------------------------------------------------- */
/*                            National assumptions                            */
/* -------------------------------------------------------------------------- */

/// User inputs resolved against the roster (one entry per roster party).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NationalAssumptions {
    /// Target national share in percent (0 when absent from the target map).
    pub targets: Vec<f64>,
    /// Diaspora / external votes added to list totals.
    pub external_votes: Vec<u64>,
    /// Seats awarded outside the apportionment loop.
    pub fixed_seats: Vec<u32>,
    pub tactical: TacticalRules,
}

impl NationalAssumptions {
    /// Zero-valued assumptions for a roster of `n` parties.
    pub fn zeroed(n: usize) -> Self {
        Self {
            targets: vec![0.0; n],
            external_votes: vec![0; n],
            fixed_seats: vec![0; n],
            tactical: TacticalRules::default(),
        }
    }

    pub fn fixed_total(&self) -> u64 {
        self.fixed_seats.iter().map(|&s| u64::from(s)).sum()
    }
}

/* ---------------------------------- Tests --------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PartyName { s.parse().unwrap() }

    #[test]
    fn roster_rejects_normalized_duplicates() {
        let err = PartyRoster::new(vec![p("X (%)"), p("X")]).unwrap_err();
        assert_eq!(err, CoreError::DuplicateParty("X".into()));
    }

    #[test]
    fn roster_index_lookup() {
        let r = PartyRoster::new(vec![p("X"), p("Y")]).unwrap();
        assert_eq!(r.index_of(&p("Y (%)")), Some(1));
        assert_eq!(r.index_of(&p("Z")), None);
    }

    #[test]
    fn table_checks_shape_and_ids() {
        let roster = PartyRoster::new(vec![p("X"), p("Y")]).unwrap();
        let short = District { id: "A".into(), population: 10, shares: vec![50.0] };
        assert!(matches!(
            BaselineTable::new(roster.clone(), vec![short]),
            Err(CoreError::ShapeMismatch { expected: 2, got: 1, .. })
        ));

        let a = District { id: "A".into(), population: 10, shares: vec![50.0, 50.0] };
        let dup = BaselineTable::new(roster, vec![a.clone(), a]).unwrap_err();
        assert_eq!(dup, CoreError::DuplicateDistrict("A".into()));
    }

    #[test]
    fn district_override_replaces_global_rules() {
        let g = TacticalRule::new(p("X"), 0.5, p("Y")).unwrap();
        let o = TacticalRule::new(p("Y"), 0.1, p("X")).unwrap();
        let mut rules = TacticalRules { global: vec![g.clone()], ..Default::default() };
        rules.by_district.insert("B".into(), vec![o.clone()]);

        assert_eq!(rules.rules_for("A"), &[g][..]);
        assert_eq!(rules.rules_for("B"), &[o][..]);
    }

    #[test]
    fn fraction_domain() {
        assert!(TacticalRule::new(p("X"), 1.0, p("Y")).is_ok());
        assert!(TacticalRule::new(p("X"), 0.0, p("Y")).is_ok());
        assert!(TacticalRule::new(p("X"), 1.01, p("Y")).is_err());
        assert!(TacticalRule::new(p("X"), -0.1, p("Y")).is_err());
        assert!(TacticalRule::new(p("X"), f64::NAN, p("Y")).is_err());
    }
}
