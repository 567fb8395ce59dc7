//! Key-set reconciliation between stores
//!
//! `normalize` only ever adds zero-quantity placeholders. `StrictSyncPlan`
//! rebuilds a target to exactly the reference's key set and is destructive,
//! so it is computed first and applied separately once confirmed. `rename`
//! rewrites one description across several stores.

use serde::Serialize;

use crate::error::{StockroomError, StockroomResult};
use crate::models::{normalize_key, Record};
use crate::storage::Store;

/// Descriptions added to each side by `normalize`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub added_to_first: Vec<String>,
    pub added_to_second: Vec<String>,
}

impl NormalizeReport {
    pub fn is_empty(&self) -> bool {
        self.added_to_first.is_empty() && self.added_to_second.is_empty()
    }
}

fn missing_from(from: &Store, other: &Store) -> Vec<Record> {
    from.records()
        .iter()
        .filter(|r| !other.contains(r.description()))
        .map(|r| {
            let mut placeholder = r.clone();
            placeholder.set_quantity(0);
            placeholder
        })
        .collect()
}

/// Give both stores the union of their key sets
///
/// Missing keys are created at quantity zero using the other store's casing.
/// Existing quantities are never touched and nothing is deleted.
pub fn normalize(first: &mut Store, second: &mut Store) -> StockroomResult<NormalizeReport> {
    let for_second = missing_from(first, second);
    let for_first = missing_from(second, first);

    let report = NormalizeReport {
        added_to_first: for_first.iter().map(|r| r.description().to_string()).collect(),
        added_to_second: for_second.iter().map(|r| r.description().to_string()).collect(),
    };

    for record in for_first {
        first.insert(record)?;
    }
    for record in for_second {
        second.insert(record)?;
    }

    Ok(report)
}

/// What a strict sync will do to the target
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StrictSyncPlan {
    /// Target records that survive with their quantities
    pub kept: Vec<Record>,
    /// Reference descriptions added to the target at zero
    pub added: Vec<String>,
    /// Target records absent from the reference, discarded
    pub dropped: Vec<Record>,
}

impl StrictSyncPlan {
    /// Compare `target` against `reference`
    pub fn plan(reference: &Store, target: &Store) -> Self {
        let mut plan = StrictSyncPlan::default();

        for record in target.records() {
            if reference.contains(record.description()) {
                plan.kept.push(record.clone());
            } else {
                plan.dropped.push(record.clone());
            }
        }
        for record in reference.records() {
            if !target.contains(record.description()) {
                plan.added.push(record.description().to_string());
            }
        }

        plan
    }

    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }

    /// Units that will be discarded with the dropped records
    pub fn discarded_quantity(&self) -> u64 {
        self.dropped.iter().map(Record::quantity).sum()
    }

    /// Rebuild `target` according to the plan
    pub fn apply(&self, target: &mut Store) -> StockroomResult<()> {
        let dropped: Vec<String> = self.dropped.iter().map(Record::key).collect();
        target.retain(|r| !dropped.contains(&r.key()));
        for description in &self.added {
            target.insert(Record::new(description.as_str(), 0)?)?;
        }
        Ok(())
    }
}

/// Stores touched by a rename
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    pub from: String,
    pub to: String,
    pub stores: Vec<String>,
}

/// Rename an item in every store that has it
///
/// Fails without changing anything if the new key already exists in any of
/// the stores, or if no store has the old key. Changing only the casing of a
/// description is allowed.
pub fn rename(stores: &mut [&mut Store], old: &str, new: &str) -> StockroomResult<RenameReport> {
    let replacement = Record::new(new, 0)?;
    let new_description = replacement.description().to_string();
    let same_key = normalize_key(old) == replacement.key();

    if !same_key {
        if let Some(store) = stores.iter().find(|s| s.contains(&new_description)) {
            return Err(StockroomError::DuplicateKeyOnRename {
                store: store.name().to_string(),
                item: new_description,
            });
        }
    }

    let holders: Vec<&str> = stores
        .iter()
        .filter(|s| s.contains(old))
        .map(|s| s.name())
        .collect();
    if holders.is_empty() {
        let names: Vec<&str> = stores.iter().map(|s| s.name()).collect();
        return Err(StockroomError::item_not_found(names.join(", "), old.trim()));
    }

    let mut report = RenameReport {
        from: old.trim().to_string(),
        to: new_description.clone(),
        stores: Vec::new(),
    };
    for store in stores.iter_mut() {
        if let Some(record) = store.get_mut(old) {
            record.set_description(&new_description)?;
            report.stores.push(store.name().to_string());
        }
    }

    Ok(report)
}
