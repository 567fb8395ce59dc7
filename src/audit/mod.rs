//! Audit logging for inventory changes
//!
//! Every operation that writes a store or order file appends one entry to an
//! append-only JSONL log, with before/after state where it is small enough to
//! be useful.
//!
//! - `AuditEntry`: one operation with timestamp, touched stores and summary.
//! - `AuditLogger`: appends entries to the log file and reads them back.
//! - `generate_diff`: describes how a store's records changed.

mod diff;
mod entry;
mod logger;

pub use diff::{diff_records, generate_diff, RecordChange};
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
