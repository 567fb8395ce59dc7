//! Reconciliation service
//!
//! Loads stores fresh from disk, runs one engine operation in memory and
//! persists every touched store. Updates spanning two files go through the
//! storage journal; each successful operation is written to the audit log.

use serde_json::json;
use tracing::info;

use crate::audit::{generate_diff, AuditEntry, Operation};
use crate::error::{StockroomError, StockroomResult};
use crate::models::Record;
use crate::storage::{PendingWrite, Storage, Store};

use super::sync::{self, NormalizeReport, RenameReport, StrictSyncPlan};
use super::transfer::{self, Direction, TransferOutcome};

/// Service for operations that change one or more stores
pub struct ReconciliationService<'a> {
    storage: &'a Storage,
}

impl<'a> ReconciliationService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    fn open_pair(&self, first: &str, second: &str) -> StockroomResult<(Store, Store)> {
        let a = self.storage.open(first)?;
        let b = self.storage.open(second)?;
        if a.is_same_file(&b) {
            return Err(StockroomError::Validation(format!(
                "'{}' and '{}' are the same store",
                first, second
            )));
        }
        Ok((a, b))
    }

    /// Move stock from one store to another and save both
    pub fn transfer(
        &self,
        source: &str,
        destination: &str,
        description: &str,
        quantity: u64,
    ) -> StockroomResult<TransferOutcome> {
        let (mut from, mut to) = self.open_pair(source, destination)?;
        let outcome = transfer::transfer(&mut from, &mut to, description, quantity)?;

        let writes = vec![from.prepare()?, to.prepare()?];
        self.storage.write_all("transfer", writes)?;

        info!(
            source = %from.name(),
            destination = %to.name(),
            item = %outcome.item,
            quantity,
            "transfer"
        );
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::Transfer,
                [from.name(), to.name()],
                format!(
                    "moved {}; {} left in {}, {} in {}",
                    quantity,
                    outcome.source_remaining,
                    from.name(),
                    outcome.destination_total,
                    to.name()
                ),
            )
            .with_item(&outcome.item)
            .with_after(&outcome),
        );

        Ok(outcome)
    }

    /// Add or remove stock in one store and save it
    ///
    /// With `keep_order` the file keeps its existing line order and a new
    /// record goes at the end; otherwise the store is saved sorted.
    pub fn adjust(
        &self,
        store: &str,
        description: &str,
        quantity: u64,
        direction: Direction,
        keep_order: bool,
    ) -> StockroomResult<Record> {
        let mut target = self.storage.open(store)?;
        let before = target.quantity_of(description);
        let record = transfer::adjust(&mut target, description, quantity, direction)?;
        let write = if keep_order {
            target.prepare_in_place()?
        } else {
            target.prepare()?
        };
        self.storage.write_all("adjust", vec![write])?;

        info!(store = %target.name(), item = %record.description(), %direction, quantity, "adjust");
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::Adjust,
                [target.name()],
                format!("{} {}: {} -> {}", direction, quantity, before, record.quantity()),
            )
            .with_item(record.description())
            .with_before(&json!({ "quantity": before }))
            .with_after(&record),
        );

        Ok(record)
    }

    /// Give two stores the same key set, adding zero-quantity placeholders
    pub fn normalize(&self, first: &str, second: &str) -> StockroomResult<NormalizeReport> {
        let (mut a, mut b) = self.open_pair(first, second)?;
        let report = sync::normalize(&mut a, &mut b)?;
        if report.is_empty() {
            return Ok(report);
        }

        let mut writes: Vec<PendingWrite> = Vec::new();
        if !report.added_to_first.is_empty() {
            writes.push(a.prepare()?);
        }
        if !report.added_to_second.is_empty() {
            writes.push(b.prepare()?);
        }
        self.storage.write_all("normalize", writes)?;

        info!(
            first = %a.name(),
            second = %b.name(),
            added_to_first = report.added_to_first.len(),
            added_to_second = report.added_to_second.len(),
            "normalize"
        );
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::Normalize,
                [a.name(), b.name()],
                format!(
                    "{} added to {}, {} added to {}",
                    report.added_to_first.len(),
                    a.name(),
                    report.added_to_second.len(),
                    b.name()
                ),
            )
            .with_after(&report),
        );

        Ok(report)
    }

    /// Compute what a strict sync of `target` to `reference` would do
    pub fn plan_strict_sync(&self, reference: &str, target: &str) -> StockroomResult<StrictSyncPlan> {
        let (reference, target) = self.open_pair(reference, target)?;
        Ok(StrictSyncPlan::plan(&reference, &target))
    }

    /// Rebuild `target` so its keys exactly match `reference`
    ///
    /// Destructive: records missing from the reference are discarded. Callers
    /// must have confirmed the plan first.
    pub fn strict_sync(&self, reference: &str, target: &str) -> StockroomResult<StrictSyncPlan> {
        let (reference, mut target) = self.open_pair(reference, target)?;
        let plan = StrictSyncPlan::plan(&reference, &target);
        if plan.is_noop() {
            return Ok(plan);
        }

        let before = target.records().to_vec();
        plan.apply(&mut target)?;
        self.storage.write_all("strict sync", vec![target.prepare()?])?;

        info!(
            reference = %reference.name(),
            target = %target.name(),
            added = plan.added.len(),
            dropped = plan.dropped.len(),
            "strict sync"
        );
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::StrictSync,
                [target.name()],
                generate_diff(&before, target.records()).unwrap_or_default(),
            )
            .with_before(&before)
            .with_after(&target.records()),
        );

        Ok(plan)
    }

    /// Rename an item in every named store that has it
    pub fn rename<S: AsRef<str>>(
        &self,
        stores: &[S],
        old: &str,
        new: &str,
    ) -> StockroomResult<RenameReport> {
        let mut loaded = stores
            .iter()
            .map(|name| self.storage.open(name.as_ref()))
            .collect::<StockroomResult<Vec<_>>>()?;

        let report = {
            let mut refs: Vec<&mut Store> = loaded.iter_mut().collect();
            sync::rename(&mut refs, old, new)?
        };

        let mut writes = Vec::new();
        for store in loaded.iter_mut() {
            if report.stores.iter().any(|name| name == store.name()) {
                writes.push(store.prepare()?);
            }
        }
        self.storage.write_all("rename", writes)?;

        info!(from = %report.from, to = %report.to, stores = report.stores.len(), "rename");
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::Rename,
                report.stores.iter().map(String::as_str),
                format!("'{}' -> '{}'", report.from, report.to),
            )
            .with_item(&report.to),
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{paths::StockroomPaths, settings::Settings};
    use crate::storage::file_io::temp_path_for;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = StockroomPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths, &Settings::default()).unwrap();
        (temp_dir, storage)
    }

    fn write_store(storage: &Storage, name: &str, text: &str) {
        fs::write(storage.store_path(name).unwrap(), text).unwrap();
    }

    fn read_store(storage: &Storage, name: &str) -> String {
        fs::read_to_string(storage.store_path(name).unwrap()).unwrap_or_default()
    }

    #[test]
    fn test_transfer_end_to_end() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Tornillo 100\n");
        let service = ReconciliationService::new(&storage);

        let outcome = service
            .transfer("warehouse", "storefront", "tornillo", 30)
            .unwrap();

        assert_eq!(outcome.source_remaining, 70);
        assert_eq!(read_store(&storage, "warehouse"), "    Tornillo 70\n");
        assert_eq!(read_store(&storage, "storefront"), "    tornillo 30\n");
        assert!(storage.pending_write().unwrap().is_none());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Transfer);
    }

    #[test]
    fn test_transfer_rejects_aliased_store_path() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Tornillo 100\n");
        let alias = storage
            .paths()
            .data_dir()
            .join("..")
            .join("data")
            .join("warehouse.txt");
        let service = ReconciliationService::new(&storage);

        let err = service
            .transfer("warehouse", &alias.to_string_lossy(), "Tornillo", 30)
            .unwrap_err();

        assert!(matches!(err, StockroomError::Validation(_)));
        assert_eq!(read_store(&storage, "warehouse"), "    Tornillo 100\n");
    }

    #[test]
    fn test_writes_wait_for_recovery_after_partial_transfer() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Tornillo 100\n");
        let blocked = temp_path_for(&storage.store_path("storefront").unwrap());
        fs::create_dir(&blocked).unwrap();
        let service = ReconciliationService::new(&storage);

        let err = service
            .transfer("warehouse", "storefront", "Tornillo", 30)
            .unwrap_err();
        assert!(err.is_partial_write());
        assert_eq!(read_store(&storage, "warehouse"), "    Tornillo 70\n");

        let err = service
            .adjust("warehouse", "Tuerca", 5, Direction::Add, false)
            .unwrap_err();
        assert!(matches!(err, StockroomError::Storage(_)));
        assert_eq!(read_store(&storage, "warehouse"), "    Tornillo 70\n");

        fs::remove_dir(&blocked).unwrap();
        storage.recover().unwrap().unwrap();
        assert_eq!(read_store(&storage, "storefront"), "    Tornillo 30\n");

        service
            .adjust("warehouse", "Tuerca", 5, Direction::Add, false)
            .unwrap();
        assert_eq!(
            read_store(&storage, "warehouse"),
            "    Tornillo 70\n    Tuerca 5\n"
        );
    }

    #[test]
    fn test_insufficient_transfer_leaves_files_identical() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "Tornillo 10\n# note\n");
        write_store(&storage, "storefront", "    Tuerca 1\n");
        let service = ReconciliationService::new(&storage);

        let err = service
            .transfer("warehouse", "storefront", "Tornillo", 11)
            .unwrap_err();

        assert!(matches!(err, StockroomError::InsufficientStock { available: 10, .. }));
        assert_eq!(read_store(&storage, "warehouse"), "Tornillo 10\n# note\n");
        assert_eq!(read_store(&storage, "storefront"), "    Tuerca 1\n");
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_adjust_saves_sorted() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Zeta 1\n");
        let service = ReconciliationService::new(&storage);

        service.adjust("warehouse", "Alfa", 2, Direction::Add, false).unwrap();
        assert_eq!(read_store(&storage, "warehouse"), "    Alfa 2\n    Zeta 1\n");

        let err = service
            .adjust("warehouse", "Beta", 1, Direction::Remove, false)
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_adjust_keep_order() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Zeta 1\n  Alfa 2\n");
        let service = ReconciliationService::new(&storage);

        service.adjust("warehouse", "alfa", 3, Direction::Add, true).unwrap();
        service.adjust("warehouse", "Beta", 1, Direction::Add, true).unwrap();
        assert_eq!(
            read_store(&storage, "warehouse"),
            "    Zeta 1\n    Alfa 5\n    Beta 1\n"
        );
    }

    #[test]
    fn test_normalize_writes_both() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    A 1\n    B 2\n");
        write_store(&storage, "storefront", "    B 3\n    C 4\n");
        let service = ReconciliationService::new(&storage);

        let report = service.normalize("warehouse", "storefront").unwrap();

        assert_eq!(report.added_to_first, vec!["C".to_string()]);
        assert_eq!(read_store(&storage, "warehouse"), "    A 1\n    B 2\n    C 0\n");
        assert_eq!(read_store(&storage, "storefront"), "    A 0\n    B 3\n    C 4\n");
    }

    #[test]
    fn test_strict_sync_plan_then_apply() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    A 1\n    B 2\n");
        write_store(&storage, "storefront", "    B 5\n    X 9\n");
        let service = ReconciliationService::new(&storage);

        let plan = service.plan_strict_sync("warehouse", "storefront").unwrap();
        assert_eq!(plan.dropped.len(), 1);
        assert_eq!(read_store(&storage, "storefront"), "    B 5\n    X 9\n");

        service.strict_sync("warehouse", "storefront").unwrap();
        assert_eq!(read_store(&storage, "storefront"), "    A 0\n    B 5\n");
        assert_eq!(read_store(&storage, "warehouse"), "    A 1\n    B 2\n");
    }

    #[test]
    fn test_rename_duplicate_leaves_files() {
        let (_temp, storage) = setup();
        write_store(&storage, "warehouse", "    Funda 1\n");
        write_store(&storage, "storefront", "    Funda 2\n    Funda Roja 1\n");
        let service = ReconciliationService::new(&storage);

        let err = service
            .rename(&["warehouse", "storefront"], "Funda", "Funda Roja")
            .unwrap_err();
        assert!(matches!(err, StockroomError::DuplicateKeyOnRename { .. }));
        assert_eq!(read_store(&storage, "warehouse"), "    Funda 1\n");

        service
            .rename(&["warehouse", "storefront"], "funda", "Funda Azul")
            .unwrap();
        assert_eq!(read_store(&storage, "warehouse"), "    Funda Azul 1\n");
        assert_eq!(
            read_store(&storage, "storefront"),
            "    Funda Azul 2\n    Funda Roja 1\n"
        );
    }
}
