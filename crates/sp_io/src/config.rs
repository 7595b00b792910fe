//! Scenario configuration (JSON, camelCase keys) and its resolution.
//!
//! The raw document keeps party keys as written; resolution normalizes every
//! key exactly once and aligns the values to the table's party roster.
//! Tactical rule maps are read with `preserve_order`, so rule order is the
//! order of keys in the file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use sp_core::variables::{
    DEFAULT_INDEPENDENT_PARTY, DEFAULT_THRESHOLD_PCT, DEFAULT_TOTAL_SEATS, DEFAULT_TURNOUT_PCT,
};
use sp_core::{
    NationalAssumptions, Params, PartyName, PartyRoster, TacticalRule, TacticalRules, TiePolicy,
};

use crate::{IoError, IoResult};

pub const DEFAULT_OUTPUT_PATH: &str = "mandatum_kalkulacio_eredmeny.csv";

/* ------------------------------------------------------------------------- */
/*                                 Layout                                    */
/* ------------------------------------------------------------------------- */

/// Column names and separator of the CSV boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TableLayout {
    pub district_column: String,
    pub population_column: String,
    /// Dropped on load when present.
    pub index_column: String,
    pub winner_column: String,
    pub margin_column: String,
    pub separator: char,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            district_column: "Körzet".into(),
            population_column: "Népesség".into(),
            index_column: "Index".into(),
            winner_column: "Győztes".into(),
            margin_column: "Különbség".into(),
            separator: ';',
        }
    }
}

impl TableLayout {
    /// Separator as a single byte; the CSV layer only takes ASCII separators.
    pub fn separator_byte(&self) -> IoResult<u8> {
        if self.separator.is_ascii() && !matches!(self.separator, '"' | '\n' | '\r') {
            Ok(self.separator as u8)
        } else {
            Err(IoError::Invalid(format!("unsupported separator {:?}", self.separator)))
        }
    }

    /// Columns that are never party columns.
    pub fn is_reserved(&self, column: &str) -> bool {
        column == self.district_column
            || column == self.population_column
            || column == self.index_column
    }
}

/* ------------------------------------------------------------------------- */
/*                               Raw document                                */
/* ------------------------------------------------------------------------- */

fn default_turnout() -> f64 { DEFAULT_TURNOUT_PCT }
fn default_total_seats() -> u32 { DEFAULT_TOTAL_SEATS }
fn default_threshold() -> f64 { DEFAULT_THRESHOLD_PCT }
fn default_independent() -> String { DEFAULT_INDEPENDENT_PARTY.to_string() }
fn default_output_path() -> String { DEFAULT_OUTPUT_PATH.to_string() }

/// Scenario document as written on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Target national share per party, percent.
    pub national_targets: BTreeMap<String, f64>,
    #[serde(default = "default_turnout")]
    pub turnout_percent: f64,
    #[serde(default)]
    pub external_votes: BTreeMap<String, u64>,
    #[serde(default)]
    pub fixed_seats: BTreeMap<String, u32>,
    /// `{source: [fraction, target]}`
    #[serde(default)]
    pub tactical_global: Map<String, Value>,
    /// `{districtId: {source: [fraction, target]}}`
    #[serde(default)]
    pub tactical_by_district: BTreeMap<String, Map<String, Value>>,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_total_seats")]
    pub total_seats: u32,
    #[serde(default = "default_threshold")]
    pub threshold_percent: f64,
    #[serde(default = "default_independent")]
    pub independent_party: String,
    #[serde(default)]
    pub tie_policy: TiePolicy,
    #[serde(default)]
    pub layout: TableLayout,
}

/// Read and parse a scenario file.
pub fn load_scenario(path: &Path) -> IoResult<ScenarioConfig> {
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::Path(format!("{}: {e}", path.display())))?;
    parse_scenario(&text)
}

pub fn parse_scenario(text: &str) -> IoResult<ScenarioConfig> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    Ok(serde_json::from_str(text)?)
}

/* ------------------------------------------------------------------------- */
/*                                Resolution                                 */
/* ------------------------------------------------------------------------- */

impl ScenarioConfig {
    /// Scalar run parameters.
    pub fn params(&self) -> IoResult<Params> {
        let independent_party = PartyName::new(&self.independent_party)
            .map_err(|e| IoError::Invalid(format!("independentParty: {e}")))?;
        let params = Params {
            turnout_pct: self.turnout_percent,
            total_seats: self.total_seats,
            threshold_pct: self.threshold_percent,
            independent_party,
            tie_policy: self.tie_policy,
        };
        params.validate_domains().map_err(|e| IoError::Invalid(e.to_string()))?;
        Ok(params)
    }

    /// Global and per-district tactical rule sets, in file order.
    pub fn tactical_rules(&self) -> IoResult<TacticalRules> {
        let global = parse_rule_set("/tacticalGlobal", &self.tactical_global)?;
        let mut by_district = BTreeMap::new();
        for (district, rules) in &self.tactical_by_district {
            let prefix = format!("/tacticalByDistrict/{}", pointer_token(district));
            let id = district.trim().to_string();
            if by_district.insert(id, parse_rule_set(&prefix, rules)?).is_some() {
                return Err(IoError::Invalid(format!(
                    "{prefix}: district {:?} has more than one rule set",
                    district.trim()
                )));
            }
        }
        Ok(TacticalRules { global, by_district })
    }

    /// Party-keyed inputs aligned to `roster`. Keys naming parties outside the
    /// roster are ignored (logged at debug level).
    pub fn assumptions(&self, roster: &PartyRoster) -> IoResult<NationalAssumptions> {
        let mut out = NationalAssumptions::zeroed(roster.len());

        for (party, pct) in normalized("nationalTargets", &self.national_targets)? {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(IoError::Invalid(format!("nationalTargets/{party}: {pct} not in [0, 100]")));
            }
            match roster.index_of(&party) {
                Some(i) => out.targets[i] = pct,
                None => debug!(%party, "national target for a party absent from the table; ignored"),
            }
        }
        for (party, votes) in normalized("externalVotes", &self.external_votes)? {
            match roster.index_of(&party) {
                Some(i) => out.external_votes[i] = votes,
                None => debug!(%party, "external votes for a party absent from the table; ignored"),
            }
        }
        for (party, seats) in normalized("fixedSeats", &self.fixed_seats)? {
            match roster.index_of(&party) {
                Some(i) => out.fixed_seats[i] = seats,
                None => debug!(%party, "fixed seats for a party absent from the table; ignored"),
            }
        }

        out.tactical = self.tactical_rules()?;
        Ok(out)
    }
}

/// Normalize the keys of a party map; two keys collapsing to one party is an error.
fn normalized<V: Copy>(section: &str, raw: &BTreeMap<String, V>) -> IoResult<Vec<(PartyName, V)>> {
    let mut seen: BTreeMap<PartyName, &str> = BTreeMap::new();
    let mut out = Vec::with_capacity(raw.len());
    for (key, &v) in raw {
        let name = PartyName::new(key)
            .map_err(|e| IoError::Invalid(format!("{section}/{key:?}: {e}")))?;
        if let Some(prev) = seen.insert(name.clone(), key) {
            return Err(IoError::Invalid(format!(
                "{section}: {prev:?} and {key:?} name the same party"
            )));
        }
        out.push((name, v));
    }
    Ok(out)
}

fn parse_rule_set(prefix: &str, raw: &Map<String, Value>) -> IoResult<Vec<TacticalRule>> {
    let mut rules: Vec<TacticalRule> = Vec::with_capacity(raw.len());
    for (source, value) in raw {
        let pointer = format!("{prefix}/{}", pointer_token(source));
        let (fraction, target): (f64, String) = serde_json::from_value(value.clone())
            .map_err(|e| IoError::Json { pointer: pointer.clone(), msg: e.to_string() })?;
        let source = PartyName::new(source).map_err(|e| IoError::Invalid(format!("{pointer}: {e}")))?;
        let target = PartyName::new(&target).map_err(|e| IoError::Invalid(format!("{pointer}: {e}")))?;
        if rules.iter().any(|r| r.source == source) {
            return Err(IoError::Invalid(format!("{pointer}: duplicate source party {source}")));
        }
        let rule = TacticalRule::new(source, fraction, target)
            .map_err(|e| IoError::Invalid(format!("{pointer}: {e}")))?;
        rules.push(rule);
    }
    Ok(rules)
}

/// RFC 6901 escaping of one pointer segment.
fn pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}
