//! Configuration module for Stockroom
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings persistence
//! - Per-order keyword restrictions

pub mod paths;
pub mod restrictions;
pub mod settings;

pub use paths::StockroomPaths;
pub use restrictions::RestrictionSet;
pub use settings::Settings;
