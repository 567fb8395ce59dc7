//! Diff generation for audit logging
//!
//! Summarizes how a store's records changed, keyed by normalized description.

use std::collections::BTreeMap;

use crate::models::Record;

/// A single change between two record lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange {
    Added { description: String, quantity: u64 },
    Removed { description: String, quantity: u64 },
    Changed { description: String, from: u64, to: u64 },
    Renamed { from: String, to: String },
}

impl std::fmt::Display for RecordChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordChange::Added {
                description,
                quantity,
            } => write!(f, "+ {} {}", description, quantity),
            RecordChange::Removed {
                description,
                quantity,
            } => write!(f, "- {} {}", description, quantity),
            RecordChange::Changed {
                description,
                from,
                to,
            } => write!(f, "~ {} {} -> {}", description, from, to),
            RecordChange::Renamed { from, to } => write!(f, "~ {} -> {}", from, to),
        }
    }
}

/// Compute the changes from `before` to `after`
pub fn diff_records(before: &[Record], after: &[Record]) -> Vec<RecordChange> {
    let before_map: BTreeMap<String, &Record> = before.iter().map(|r| (r.key(), r)).collect();
    let after_map: BTreeMap<String, &Record> = after.iter().map(|r| (r.key(), r)).collect();
    let mut changes = Vec::new();

    for (key, old) in &before_map {
        match after_map.get(key) {
            Some(new) => {
                if old.quantity() != new.quantity() {
                    changes.push(RecordChange::Changed {
                        description: new.description().to_string(),
                        from: old.quantity(),
                        to: new.quantity(),
                    });
                } else if old.description() != new.description() {
                    changes.push(RecordChange::Renamed {
                        from: old.description().to_string(),
                        to: new.description().to_string(),
                    });
                }
            }
            None => changes.push(RecordChange::Removed {
                description: old.description().to_string(),
                quantity: old.quantity(),
            }),
        }
    }

    for (key, new) in &after_map {
        if !before_map.contains_key(key) {
            changes.push(RecordChange::Added {
                description: new.description().to_string(),
                quantity: new.quantity(),
            });
        }
    }

    changes
}

/// Render changes as one comma-separated line, `None` if nothing changed
pub fn generate_diff(before: &[Record], after: &[Record]) -> Option<String> {
    let changes = diff_records(before, after);
    if changes.is_empty() {
        None
    } else {
        Some(
            changes
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
