//! Party identifiers.
//!
//! Every party key that enters the engine (table headers, target maps,
//! external votes, fixed seats, tactical rules) goes through
//! [`normalize_party_name`] exactly once, at the boundary. Downstream code only
//! ever compares [`PartyName`] values, never raw strings.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Decorative marker appended to percentage-typed columns in source tables.
pub const PERCENT_SUFFIX: &str = " (%)";

/// Canonicalize a raw party identifier: trim, drop a trailing ` (%)`, trim again.
pub fn normalize_party_name(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed.strip_suffix(PERCENT_SUFFIX).unwrap_or(trimmed);
    stripped.trim().to_string()
}

/// Normalized, non-empty party name.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct PartyName(String);

impl PartyName {
    /// Normalize `raw` and wrap it; empty names are rejected.
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let n = normalize_party_name(raw);
        if n.is_empty() {
            return Err(CoreError::InvalidPartyName);
        }
        Ok(Self(n))
    }

    /// Wrap a name already known to be normalized and non-empty.
    pub(crate) fn from_static(s: &'static str) -> Self {
        debug_assert_eq!(normalize_party_name(s), s);
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for PartyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartyName {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Self::new(s) }
}

impl TryFrom<String> for PartyName {
    type Error = CoreError;
    fn try_from(s: String) -> Result<Self, Self::Error> { Self::new(&s) }
}

impl From<PartyName> for String {
    fn from(p: PartyName) -> Self { p.0 }
}

impl AsRef<str> for PartyName {
    fn as_ref(&self) -> &str { &self.0 }
}
