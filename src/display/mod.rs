//! Display formatting for terminal output
//!
//! Plain-text tables and reports for stores, searches and reconciliation
//! results.

pub mod reconcile;
pub mod store;

pub use reconcile::{
    format_apply_report, format_match_report, format_normalize_report, format_order,
    format_pairs, format_rename, format_sync_plan, format_transfer,
};
pub use store::{format_diagnostics, format_record_table, format_search, format_store};
