//! Generation mode selector.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Selects which system behavior the Stream Source applies to a prompt.
///
/// The mode is opaque to the client and the decoder: it is serialized into
/// the request body and interpreted only by the Stream Source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Full-length study notes.
    #[default]
    Normal,
    /// Only the most exam-relevant topics.
    Important,
    /// Multiple choice questions.
    Mcqs,
    /// One short summary per input topic.
    Summarise,
}

impl Mode {
    /// All modes, in the order they are offered to users.
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Important, Mode::Mcqs, Mode::Summarise];

    /// The wire name of this mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::Important => "important",
            Mode::Mcqs => "mcqs",
            Mode::Summarise => "summarise",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}' (expected one of: normal, important, mcqs, summarise)")]
pub struct UnknownMode(pub String);

impl FromStr for Mode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_normal() {
        assert_eq!(Mode::default(), Mode::Normal);
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Mode::Summarise).unwrap();
        assert_eq!(json, "\"summarise\"");
        let back: Mode = serde_json::from_str("\"mcqs\"").unwrap();
        assert_eq!(back, Mode::Mcqs);
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Important".parse::<Mode>().unwrap(), Mode::Important);
        assert_eq!(" normal ".parse::<Mode>().unwrap(), Mode::Normal);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = "summarize".parse::<Mode>().unwrap_err();
        assert_eq!(err, UnknownMode("summarize".into()));
        assert!(err.to_string().contains("summarise"));
    }

    #[test]
    fn display_matches_wire_name() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
