//! Tax identity of a seller or buyer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Two-digit GST state code (e.g. 27 for Maharashtra).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateCode(u8);

impl StateCode {
    /// Create a state code. Codes are 1..=99.
    pub fn new(code: u8) -> Option<Self> {
        (1..=99).contains(&code).then_some(Self(code))
    }

    /// Parse a one- or two-digit numeric code ("7", "07", "27").
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() || s.len() > 2 || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        s.parse::<u8>().ok().and_then(Self::new)
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// What the regime resolver knows about one side of the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxIdentity {
    /// Display name of the party.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Normalized GSTIN (upper-case, no spaces).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,

    /// State code from the GSTIN prefix, else from the state field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_code: Option<StateCode>,

    /// Canonical state name when the code is known, else the raw text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_name: Option<String>,
}

impl TaxIdentity {
    pub fn is_registered(&self) -> bool {
        self.gstin.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_code_parse() {
        assert_eq!(StateCode::parse("27").map(|c| c.value()), Some(27));
        assert_eq!(StateCode::parse("7").map(|c| c.to_string()), Some("07".to_string()));
        assert_eq!(StateCode::parse("00"), None);
        assert_eq!(StateCode::parse("2A"), None);
        assert_eq!(StateCode::parse("123"), None);
    }
}
