use serde::{Serialize, Serializer};
use std::fmt;

use crate::utils::constants::STATE_ABBREVIATIONS;

/// Two-letter US postal abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateCode(&'static str);

impl StateCode {
    /// Look up the postal code for a full state name (exact match after trimming)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        STATE_ABBREVIATIONS
            .iter()
            .find(|(full, _)| *full == name)
            .map(|(_, code)| StateCode(*code))
    }

    /// Accept an already-abbreviated code if it is one of the recognised ones
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim();
        STATE_ABBREVIATIONS
            .iter()
            .find(|(_, c)| c.eq_ignore_ascii_case(code))
            .map(|(_, c)| StateCode(*c))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Grouping key for per-state aggregates.
///
/// Rows whose state name has no postal code share the `Unknown` bucket, which
/// orders after every known code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateKey {
    Known(StateCode),
    Unknown,
}

impl StateKey {
    pub const UNKNOWN_LABEL: &'static str = "UNKNOWN";

    pub fn is_known(&self) -> bool {
        matches!(self, StateKey::Known(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StateKey::Known(code) => code.as_str(),
            StateKey::Unknown => Self::UNKNOWN_LABEL,
        }
    }
}

impl From<Option<StateCode>> for StateKey {
    fn from(code: Option<StateCode>) -> Self {
        code.map_or(StateKey::Unknown, StateKey::Known)
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
