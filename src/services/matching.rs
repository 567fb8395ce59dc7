//! Fuzzy reconciliation of free-text entries
//!
//! Order lines are typed by hand and drift from the canonical inventory
//! descriptions. Exact key matches are reported as such; everything else is
//! paired with the closest inventory descriptions above a threshold.

use serde::Serialize;

use crate::error::{StockroomError, StockroomResult};
use crate::storage::Storage;

use super::similarity::{cross_match, near_duplicates, SimilarPair};

/// How an order's lines line up against a store
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchReport {
    /// Order descriptions whose key exists in the store
    pub exact: Vec<String>,
    /// Candidate pairs for the rest, best first
    pub suggestions: Vec<SimilarPair>,
    /// Order descriptions with no candidate at or above the threshold
    pub unmatched: Vec<String>,
}

fn check_threshold(threshold: f64) -> StockroomResult<()> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(())
    } else {
        Err(StockroomError::Validation(format!(
            "Similarity threshold must be between 0 and 100, got {}",
            threshold
        )))
    }
}

/// Compare free-text entries against canonical descriptions
pub fn reconcile<L, R>(entries: &[L], canonical: &[R], threshold: f64) -> MatchReport
where
    L: AsRef<str>,
    R: AsRef<str>,
{
    let mut report = MatchReport::default();
    let mut fuzzy = Vec::new();

    for entry in entries {
        let key = entry.as_ref().trim().to_lowercase();
        if canonical
            .iter()
            .any(|c| c.as_ref().trim().to_lowercase() == key)
        {
            report.exact.push(entry.as_ref().to_string());
        } else {
            fuzzy.push(entry.as_ref());
        }
    }

    report.suggestions = cross_match(&fuzzy, canonical, threshold);
    report.unmatched = fuzzy
        .into_iter()
        .filter(|entry| !report.suggestions.iter().any(|p| p.left == *entry))
        .map(str::to_string)
        .collect();

    report
}

/// Service for similarity-based lookups over stored data
pub struct MatchService<'a> {
    storage: &'a Storage,
}

impl<'a> MatchService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Match an order's lines against a store's descriptions
    pub fn match_order(
        &self,
        order: &str,
        store: &str,
        threshold: f64,
    ) -> StockroomResult<MatchReport> {
        check_threshold(threshold)?;
        let order = self.storage.open_order(order)?;
        let store = self.storage.open(store)?;

        let entries: Vec<String> = order
            .records()
            .iter()
            .map(|r| r.description().to_string())
            .collect();
        let canonical: Vec<&str> = store.records().iter().map(|r| r.description()).collect();

        Ok(reconcile(&entries, &canonical, threshold))
    }

    /// Pairs of descriptions inside one store that look like the same item
    pub fn duplicates(&self, store: &str, threshold: f64) -> StockroomResult<Vec<SimilarPair>> {
        check_threshold(threshold)?;
        let store = self.storage.open(store)?;
        let descriptions: Vec<&str> = store.records().iter().map(|r| r.description()).collect();
        Ok(near_duplicates(&descriptions, threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{paths::StockroomPaths, settings::Settings};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reconcile_splits_exact_fuzzy_and_unmatched() {
        let entries = ["tornillo plano", "Tornilo Punta", "Pegamento"];
        let canonical = ["Tornillo Plano", "Tornillo Punta", "Tuerca"];

        let report = reconcile(&entries, &canonical, 80.0);

        assert_eq!(report.exact, vec!["tornillo plano".to_string()]);
        assert_eq!(report.suggestions[0].left, "Tornilo Punta");
        assert_eq!(report.suggestions[0].right, "Tornillo Punta");
        assert_eq!(report.unmatched, vec!["Pegamento".to_string()]);
    }

    #[test]
    fn test_service_match_and_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        fs::write(
            storage.store_path("warehouse").unwrap(),
            "    Pacha 2\n    Pachas 1\n    Cable USB 4\n",
        )
        .unwrap();
        fs::write(storage.order_path("import"), "    Cable USB 1\n    Cabel USB 2 ok\n").unwrap();

        let service = MatchService::new(&storage);

        let report = service.match_order("import", "warehouse", 75.0).unwrap();
        assert_eq!(report.exact, vec!["Cable USB".to_string()]);
        assert_eq!(report.suggestions[0].right, "Cable USB");

        let pairs = service.duplicates("warehouse", 75.0).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].left, "Pacha");
        assert_eq!(pairs[0].right, "Pachas");

        assert!(service.duplicates("warehouse", 120.0).unwrap_err().is_validation());
    }
}
