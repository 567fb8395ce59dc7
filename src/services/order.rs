//! Pending order files
//!
//! Appending checks the order's restriction keywords first. Applying takes
//! every ready line, either moving the stock from a source store or receiving
//! it into the destination, and removes the applied lines from the order.

use serde::Serialize;
use tracing::info;

use crate::audit::{AuditEntry, Operation};
use crate::config::restrictions::RestrictionSet;
use crate::error::{StockroomError, StockroomResult};
use crate::models::Record;
use crate::storage::{OrderFile, Storage, Store};

use super::transfer;

/// Result of applying an order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    pub order: String,
    pub source: Option<String>,
    pub destination: String,
    /// Ready lines that were applied, in file order
    pub applied: Vec<Record>,
    /// Lines left in the order file
    pub remaining: usize,
}

impl ApplyReport {
    pub fn total_quantity(&self) -> u64 {
        self.applied.iter().map(Record::quantity).sum()
    }
}

/// Service for order-file operations
pub struct OrderService<'a> {
    storage: &'a Storage,
    restrictions: &'a RestrictionSet,
}

impl<'a> OrderService<'a> {
    pub fn new(storage: &'a Storage, restrictions: &'a RestrictionSet) -> Self {
        Self {
            storage,
            restrictions,
        }
    }

    /// Load an order file for display
    pub fn load(&self, order: &str) -> StockroomResult<OrderFile> {
        self.storage.open_order(order)
    }

    /// Add an item to an order, unless a restricted keyword forbids it
    pub fn append(&self, order: &str, description: &str, quantity: u64) -> StockroomResult<Record> {
        if quantity == 0 {
            return Err(StockroomError::Validation(
                "Order quantity must be greater than zero".into(),
            ));
        }
        self.restrictions.check(order, description)?;

        let mut file = self.storage.open_order(order)?;
        let record = file.add(description, quantity)?;
        self.storage.write_all("order add", vec![file.prepare()?])?;

        info!(order = %file.name(), item = %record.description(), quantity, "order append");
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::OrderAppend,
                [file.name()],
                format!("+{} (now {})", quantity, record.quantity()),
            )
            .with_item(record.description()),
        );

        Ok(record)
    }

    /// Apply every ready line of an order
    ///
    /// With a `source` each line is a transfer into `destination`, otherwise
    /// the stock is received directly. The first failing line aborts the whole
    /// apply before anything is written.
    pub fn apply(
        &self,
        order: &str,
        source: Option<&str>,
        destination: &str,
    ) -> StockroomResult<ApplyReport> {
        let mut file = self.storage.open_order(order)?;
        let mut to = self.storage.open(destination)?;
        let mut from = match source {
            Some(name) => {
                let store = self.storage.open(name)?;
                if store.is_same_file(&to) {
                    return Err(StockroomError::Validation(format!(
                        "'{}' and '{}' are the same store",
                        name, destination
                    )));
                }
                Some(store)
            }
            None => None,
        };

        let applied = file.take_ready();
        let mut report = ApplyReport {
            order: file.name().to_string(),
            source: from.as_ref().map(|s| s.name().to_string()),
            destination: to.name().to_string(),
            applied: Vec::new(),
            remaining: file.lines().len(),
        };
        if applied.is_empty() {
            return Ok(report);
        }

        for record in &applied {
            receive(from.as_mut(), &mut to, record)?;
        }

        let mut writes = vec![file.prepare()?, to.prepare()?];
        if let Some(store) = from.as_mut() {
            writes.push(store.prepare()?);
        }
        self.storage.write_all("order apply", writes)?;

        report.applied = applied;
        info!(
            order = %report.order,
            destination = %report.destination,
            lines = report.applied.len(),
            "order apply"
        );

        let mut stores = vec![report.order.clone(), report.destination.clone()];
        stores.extend(report.source.clone());
        self.storage.log_audit(
            &AuditEntry::new(
                Operation::OrderApply,
                stores,
                format!(
                    "{} line(s), {} unit(s) applied",
                    report.applied.len(),
                    report.total_quantity()
                ),
            )
            .with_after(&report.applied),
        );

        Ok(report)
    }
}

fn receive(source: Option<&mut Store>, destination: &mut Store, record: &Record) -> StockroomResult<()> {
    match source {
        Some(source) => {
            transfer::transfer(source, destination, record.description(), record.quantity())?;
        }
        None => {
            destination.add(record.description(), record.quantity())?;
        }
    }
    Ok(())
}
