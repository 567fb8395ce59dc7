//! Description matching
//!
//! Evaluates a query against descriptions in one of three modes. Both sides
//! are case-folded before comparison.

use crate::models::MatchMode;

/// A query prepared for repeated matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    mode: MatchMode,
    phrase: String,
    include: Vec<String>,
    exclude: Vec<String>,
}

impl Matcher {
    pub fn new(query: &str, mode: MatchMode) -> Self {
        let folded = query.to_lowercase();
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        match mode {
            MatchMode::Phrase => {}
            MatchMode::Keywords => {
                include.extend(folded.split_whitespace().map(str::to_string));
            }
            MatchMode::Advanced => {
                for token in folded.split_whitespace() {
                    match token.strip_prefix('-') {
                        Some(term) if !term.is_empty() => exclude.push(term.to_string()),
                        _ => include.push(token.to_string()),
                    }
                }
            }
        }

        Self {
            mode,
            phrase: folded.trim().to_string(),
            include,
            exclude,
        }
    }

    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Check whether `description` satisfies the query
    ///
    /// An empty query matches everything.
    pub fn is_match(&self, description: &str) -> bool {
        let description = description.to_lowercase();

        match self.mode {
            MatchMode::Phrase => description.contains(&self.phrase),
            MatchMode::Keywords | MatchMode::Advanced => {
                self.include.iter().all(|t| description.contains(t.as_str()))
                    && !self.exclude.iter().any(|t| description.contains(t.as_str()))
            }
        }
    }
}

/// One-shot convenience wrapper around [`Matcher`]
pub fn matches(description: &str, query: &str, mode: MatchMode) -> bool {
    Matcher::new(query, mode).is_match(description)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE: &str = "Silicone iPhone 15 Pro Max Negro";

    #[test]
    fn test_phrase_mode() {
        assert!(matches(CASE, "iPhone 15 Pro", MatchMode::Phrase));
        assert!(matches(CASE, "IPHONE 15 PRO", MatchMode::Phrase));
        assert!(!matches(CASE, "15 iPhone", MatchMode::Phrase));
        assert!(!matches("Silicone iPhone 15 Negro", "iPhone 15 Pro", MatchMode::Phrase));
    }

    #[test]
    fn test_keywords_mode_any_order() {
        assert!(matches(CASE, "15 iphone", MatchMode::Keywords));
        assert!(matches(CASE, "negro   silicone", MatchMode::Keywords));
        assert!(!matches(CASE, "15 iphone blanco", MatchMode::Keywords));
    }

    #[test]
    fn test_keywords_mode_treats_dash_literally() {
        assert!(!matches(CASE, "iphone -pro", MatchMode::Keywords));
        assert!(matches("Cable USB-C", "usb -c", MatchMode::Keywords));
    }

    #[test]
    fn test_advanced_exclusion() {
        assert!(!matches(CASE, "iphone 15 -pro", MatchMode::Advanced));
        assert!(matches("Silicone iPhone 15 Negro", "iphone 15 -pro", MatchMode::Advanced));
    }

    #[test]
    fn test_advanced_only_exclusions() {
        assert!(matches("Funda Samsung A54", "-iphone", MatchMode::Advanced));
        assert!(!matches(CASE, "-iphone -samsung", MatchMode::Advanced));
    }

    #[test]
    fn test_advanced_lone_dash_is_inclusion() {
        assert!(matches("Cable USB - C", "-", MatchMode::Advanced));
        assert!(!matches(CASE, "-", MatchMode::Advanced));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        for mode in [MatchMode::Phrase, MatchMode::Keywords, MatchMode::Advanced] {
            assert!(matches(CASE, "", mode));
            assert!(matches(CASE, "   ", mode));
        }
    }
}
