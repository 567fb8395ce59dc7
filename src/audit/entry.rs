//! Audit entry data structures
//!
//! Defines the structure of audit log entries: which inventory operation ran,
//! which stores it touched, and the state before and after.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inventory operations that are audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Transfer,
    Adjust,
    Normalize,
    StrictSync,
    Rename,
    OrderAppend,
    OrderApply,
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Transfer => write!(f, "TRANSFER"),
            Operation::Adjust => write!(f, "ADJUST"),
            Operation::Normalize => write!(f, "NORMALIZE"),
            Operation::StrictSync => write!(f, "STRICT-SYNC"),
            Operation::Rename => write!(f, "RENAME"),
            Operation::OrderAppend => write!(f, "ORDER-APPEND"),
            Operation::OrderApply => write!(f, "ORDER-APPLY"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,

    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Stores or order files the operation wrote
    pub stores: Vec<String>,

    /// Item description, for single-item operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,

    /// State before the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    /// State after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable summary
    pub summary: String,
}

impl AuditEntry {
    pub fn new<I, S>(operation: Operation, stores: I, summary: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            operation,
            stores: stores.into_iter().map(Into::into).collect(),
            item: None,
            before: None,
            after: None,
            summary: summary.into(),
        }
    }

    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    pub fn with_before<T: Serialize>(mut self, before: &T) -> Self {
        self.before = serde_json::to_value(before).ok();
        self
    }

    pub fn with_after<T: Serialize>(mut self, after: &T) -> Self {
        self.after = serde_json::to_value(after).ok();
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.stores.join(", ")
        );

        if let Some(item) = &self.item {
            output.push_str(&format!(" ({})", item));
        }

        if !self.summary.is_empty() {
            output.push_str(&format!("\n  {}", self.summary));
        }

        output
    }
}
