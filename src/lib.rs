//! Stockroom - flat-file inventory stores and reconciliation
//!
//! Named inventory stores are plain text files with one
//! `    description quantity` line per item. This library loads them, moves
//! stock between them and keeps them consistent.
//!
//! # Architecture
//!
//! - `config`: paths, settings and per-order restrictions
//! - `error`: custom error types
//! - `models`: records and search queries
//! - `storage`: line codec, consolidation, store and order files, journal
//! - `services`: matching, similarity, transfers, sync and order handling
//! - `audit`: append-only log of every change
//! - `backup`: snapshots of all stores and orders
//! - `export`: CSV, JSON and YAML export
//! - `display`: plain-text formatting
//! - `session`: per-invocation context
//!
//! # Example
//!
//! ```rust,ignore
//! use stockroom::config::paths::StockroomPaths;
//! use stockroom::services::ReconciliationService;
//! use stockroom::session::Session;
//!
//! let session = Session::open(StockroomPaths::new()?)?;
//! ReconciliationService::new(session.storage())
//!     .transfer("warehouse", "storefront", "Tornillo", 30)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{StockroomError, StockroomResult};
