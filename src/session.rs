//! Per-invocation session context
//!
//! Everything an operation needs that used to be process-wide: resolved
//! paths, settings, order restrictions, storage and the last search query.
//! A session is created at start-up and dropped at exit.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::backup::BackupManager;
use crate::config::paths::StockroomPaths;
use crate::config::restrictions::RestrictionSet;
use crate::config::settings::Settings;
use crate::error::StockroomResult;
use crate::models::SearchQuery;
use crate::services::{SearchOutcome, SearchService};
use crate::storage::Storage;

pub struct Session {
    paths: StockroomPaths,
    settings: Settings,
    restrictions: RestrictionSet,
    storage: Storage,
    last_query: Option<SearchQuery>,
}

impl Session {
    /// Open a session rooted at `paths`, loading settings and restrictions
    pub fn open(paths: StockroomPaths) -> StockroomResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let restrictions = RestrictionSet::load_or_default(&paths)?;
        let storage = Storage::new(paths.clone(), &settings)?;

        if let Some(intent) = storage.pending_write()? {
            warn!(
                operation = %intent.operation,
                started = %intent.created_at,
                "an earlier update did not finish; run 'stockroom recover'"
            );
        }

        Ok(Self {
            paths,
            settings,
            restrictions,
            storage,
            last_query: None,
        })
    }

    pub fn paths(&self) -> &StockroomPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn restrictions(&self) -> &RestrictionSet {
        &self.restrictions
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The last query passed to [`Session::search`]
    pub fn last_query(&self) -> Option<&SearchQuery> {
        self.last_query.as_ref()
    }

    /// Search the named stores and remember the query
    pub fn search<S: AsRef<str>>(
        &mut self,
        stores: &[S],
        query: SearchQuery,
    ) -> StockroomResult<SearchOutcome> {
        let outcome = SearchService::new(&self.storage).search(stores, &query)?;
        self.last_query = Some(query);
        Ok(outcome)
    }

    /// Take a backup before a destructive operation, if enabled
    pub fn backup_before(&self, operation: &str) -> StockroomResult<Option<PathBuf>> {
        let retention = &self.settings.backup_retention;
        if !retention.before_destructive {
            return Ok(None);
        }

        let manager = BackupManager::new(&self.storage, retention.clone());
        let (path, _) = manager.create_backup_with_retention(Some(operation))?;
        info!(operation, path = %path.display(), "backup before destructive operation");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchMode;
    use tempfile::TempDir;

    fn open_session() -> (TempDir, Session) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());
        (temp_dir, Session::open(paths).unwrap())
    }

    #[test]
    fn test_open_uses_defaults() {
        let (_temp, session) = open_session();
        assert_eq!(session.settings().similarity_threshold, 75.0);
        assert!(!session.restrictions().keywords_for("wholesale").is_empty());
        assert!(session.last_query().is_none());
    }

    #[test]
    fn test_search_remembers_query() {
        let (_temp, mut session) = open_session();
        session
            .search(&["warehouse"], SearchQuery::new("funda", MatchMode::Phrase))
            .unwrap();
        assert_eq!(session.last_query().unwrap().text, "funda");
    }

    #[test]
    fn test_backup_before_respects_setting() {
        let (_temp, mut session) = open_session();
        assert!(session.backup_before("rename").unwrap().is_some());

        session.settings.backup_retention.before_destructive = false;
        assert!(session.backup_before("rename").unwrap().is_none());
    }
}
