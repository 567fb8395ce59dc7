//! Core data models for Stockroom
//!
//! Inventory records and search queries. Everything else is built on these.

pub mod query;
pub mod record;

pub use query::{MatchMode, SearchQuery};
pub use record::{normalize_key, Record};
