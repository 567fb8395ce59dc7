//! Search query model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a query string is compared against descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// The whole query must appear as a contiguous substring
    Phrase,
    /// Every whitespace-separated token must appear, in any order
    #[default]
    Keywords,
    /// Like keywords, but `-term` tokens exclude descriptions containing `term`
    Advanced,
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Phrase => write!(f, "phrase"),
            MatchMode::Keywords => write!(f, "keywords"),
            MatchMode::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phrase" | "exact" => Ok(MatchMode::Phrase),
            "keywords" | "words" => Ok(MatchMode::Keywords),
            "advanced" => Ok(MatchMode::Advanced),
            other => Err(format!(
                "Unknown match mode '{}'. Use phrase, keywords or advanced",
                other
            )),
        }
    }
}

/// A query plus the mode it should be evaluated in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub text: String,
    pub mode: MatchMode,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, mode: MatchMode) -> Self {
        Self {
            text: text.into(),
            mode,
        }
    }

    /// True when no query was actually issued
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("phrase".parse::<MatchMode>().unwrap(), MatchMode::Phrase);
        assert_eq!("Keywords".parse::<MatchMode>().unwrap(), MatchMode::Keywords);
        assert_eq!("advanced".parse::<MatchMode>().unwrap(), MatchMode::Advanced);
        assert!("fuzzy".parse::<MatchMode>().is_err());
    }

    #[test]
    fn test_empty_query() {
        assert!(SearchQuery::new("   ", MatchMode::Phrase).is_empty());
        assert!(!SearchQuery::new("x", MatchMode::Phrase).is_empty());
    }
}
