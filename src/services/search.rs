//! Search across stores
//!
//! Each store is filtered independently. An empty query string means no
//! search was issued, which is reported differently from a search that found
//! nothing.

use serde::Serialize;
use tracing::debug;

use crate::error::StockroomResult;
use crate::models::{Record, SearchQuery};
use crate::storage::{Storage, Store};

use super::matcher::Matcher;

/// Matching records from one store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreHits {
    pub store: String,
    pub records: Vec<Record>,
}

/// Result of a top-level search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query was empty
    NoQuery,
    /// One entry per searched store, possibly with no records
    Results(Vec<StoreHits>),
}

impl SearchOutcome {
    /// Total matching records across all stores
    pub fn hit_count(&self) -> usize {
        match self {
            SearchOutcome::NoQuery => 0,
            SearchOutcome::Results(hits) => hits.iter().map(|h| h.records.len()).sum(),
        }
    }
}

/// Filter already-loaded stores
pub fn search(stores: &[Store], query: &SearchQuery) -> SearchOutcome {
    if query.is_empty() {
        return SearchOutcome::NoQuery;
    }

    let matcher = Matcher::new(&query.text, query.mode);
    let hits = stores
        .iter()
        .map(|store| StoreHits {
            store: store.name().to_string(),
            records: store
                .records()
                .iter()
                .filter(|r| matcher.is_match(r.description()))
                .cloned()
                .collect(),
        })
        .collect();

    SearchOutcome::Results(hits)
}

/// Service for searching stores by name
pub struct SearchService<'a> {
    storage: &'a Storage,
}

impl<'a> SearchService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Load the named stores fresh and search them
    pub fn search<S: AsRef<str>>(
        &self,
        stores: &[S],
        query: &SearchQuery,
    ) -> StockroomResult<SearchOutcome> {
        if query.is_empty() {
            return Ok(SearchOutcome::NoQuery);
        }

        let loaded = stores
            .iter()
            .map(|name| self.storage.open(name.as_ref()))
            .collect::<StockroomResult<Vec<_>>>()?;

        let outcome = search(&loaded, query);
        debug!(query = %query.text, mode = %query.mode, hits = outcome.hit_count(), "search");
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{paths::StockroomPaths, settings::Settings};
    use crate::models::MatchMode;
    use crate::storage::StoreOptions;
    use std::fs;
    use tempfile::TempDir;

    fn store(name: &str, records: &[(&str, u64)]) -> Store {
        let records = records
            .iter()
            .map(|(d, q)| Record::new(*d, *q).unwrap())
            .collect();
        Store::with_records(name, format!("{}.txt", name), StoreOptions::default(), records)
            .unwrap()
    }

    #[test]
    fn test_empty_query_is_no_query() {
        let stores = vec![store("a", &[("Funda", 1)])];
        let outcome = search(&stores, &SearchQuery::new("  ", MatchMode::Keywords));
        assert_eq!(outcome, SearchOutcome::NoQuery);
    }

    #[test]
    fn test_each_store_filtered_independently() {
        let stores = vec![
            store("warehouse", &[("Funda iPhone 15 Negra", 3), ("Cable USB", 2)]),
            store("storefront", &[("Funda iPhone 14", 1)]),
        ];

        let outcome = search(&stores, &SearchQuery::new("funda 15", MatchMode::Keywords));

        match outcome {
            SearchOutcome::Results(hits) => {
                assert_eq!(hits.len(), 2);
                assert_eq!(hits[0].records.len(), 1);
                assert_eq!(hits[0].records[0].description(), "Funda iPhone 15 Negra");
                assert!(hits[1].records.is_empty());
            }
            SearchOutcome::NoQuery => panic!("expected results"),
        }
    }

    #[test]
    fn test_service_loads_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        fs::write(
            storage.store_path("warehouse").unwrap(),
            "    Silicone iPhone 15 Pro Max Negro 4\n    Silicone iPhone 15 Negro 2\n",
        )
        .unwrap();

        let service = SearchService::new(&storage);
        let outcome = service
            .search(
                &["warehouse", "storefront"],
                &SearchQuery::new("iphone 15 -pro", MatchMode::Advanced),
            )
            .unwrap();

        assert_eq!(outcome.hit_count(), 1);
    }
}
