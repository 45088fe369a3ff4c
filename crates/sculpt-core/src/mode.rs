//! # Traversal Mode
//!
//! A serialize call runs in one of three modes. The mode decides which
//! fields take part: read-only fields are dropped from incoming data and
//! write-only fields are dropped from outgoing data. In `Output` mode a
//! missing required field is not an error, since outgoing data is shaped
//! rather than checked for completeness.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SculptError;

/// Direction of data flow for one serialize call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Incoming data: read-only fields are skipped.
    Input,
    /// Outgoing data: write-only fields are skipped, absence is tolerated.
    Output,
    /// No mode filtering.
    #[default]
    Both,
}

impl Mode {
    /// All recognized modes.
    pub const ALL: [Mode; 3] = [Mode::Both, Mode::Input, Mode::Output];

    /// The lowercase name used in options objects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = SculptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                SculptError::invalid_option(
                    "mode",
                    format!("expected one of both, input, output, got {s:?}"),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_both() {
        assert_eq!(Mode::default(), Mode::Both);
    }

    #[test]
    fn test_parse_known_modes() {
        assert_eq!("input".parse::<Mode>().unwrap(), Mode::Input);
        assert_eq!("output".parse::<Mode>().unwrap(), Mode::Output);
        assert_eq!("both".parse::<Mode>().unwrap(), Mode::Both);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Input".parse::<Mode>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Output).unwrap(), "\"output\"");
        let m: Mode = serde_json::from_str("\"input\"").unwrap();
        assert_eq!(m, Mode::Input);
    }

    #[test]
    fn test_display_roundtrips_through_from_str() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse::<Mode>().unwrap(), mode);
        }
    }
}
