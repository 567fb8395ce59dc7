//! Order restrictions
//!
//! Some suppliers must never receive orders for certain items. A restriction
//! set maps an order-file name to forbidden keywords; a description containing
//! any of them (case-insensitive) cannot be appended to that order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::paths::StockroomPaths;
use crate::error::{StockroomError, StockroomResult};
use crate::storage::file_io::{read_json, write_json_atomic};

/// Per-order forbidden keywords
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RestrictionSet {
    orders: BTreeMap<String, Vec<String>>,
}

/// Normalize an order-file identifier: `Wholesale.txt` -> `wholesale`
pub fn order_id(name: &str) -> String {
    let name = name.trim().to_lowercase();
    match name.strip_suffix(".txt") {
        Some(stem) => stem.to_string(),
        None => name,
    }
}

impl RestrictionSet {
    /// Built-in restrictions for the well-known order files
    pub fn defaults() -> Self {
        let mut set = Self::default();
        set.set("wholesale", ["original", "oem", "sellado"]);
        set.set("import", ["generico", "generic", "replica"]);
        set
    }

    /// Load from disk, falling back to the defaults when no file exists
    pub fn load_or_default(paths: &StockroomPaths) -> StockroomResult<Self> {
        let path = paths.restrictions_file();
        if !path.exists() {
            return Ok(Self::defaults());
        }

        let raw: BTreeMap<String, Vec<String>> = read_json(&path).map_err(|e| {
            StockroomError::Config(format!("Failed to parse restrictions file: {}", e))
        })?;

        let mut set = Self::default();
        for (order, keywords) in raw {
            set.set(&order, keywords);
        }
        Ok(set)
    }

    /// Save to disk
    pub fn save(&self, paths: &StockroomPaths) -> StockroomResult<()> {
        write_json_atomic(paths.restrictions_file(), self)
    }

    /// Replace the keywords for one order file
    pub fn set<I, S>(&mut self, order: &str, keywords: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        keywords.sort();
        keywords.dedup();
        self.orders.insert(order_id(order), keywords);
    }

    /// Keywords forbidden for an order file
    pub fn keywords_for(&self, order: &str) -> &[String] {
        self.orders
            .get(&order_id(order))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First forbidden keyword contained in `description`, if any
    pub fn violation<'a>(&'a self, order: &str, description: &str) -> Option<&'a str> {
        let folded = description.to_lowercase();
        self.keywords_for(order)
            .iter()
            .find(|keyword| folded.contains(keyword.as_str()))
            .map(String::as_str)
    }

    /// Fail with `RestrictedKeyword` if `description` may not go on `order`
    pub fn check(&self, order: &str, description: &str) -> StockroomResult<()> {
        match self.violation(order, description) {
            Some(keyword) => Err(StockroomError::RestrictedKeyword {
                order: order_id(order),
                keyword: keyword.to_string(),
                item: description.trim().to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Iterate over all restricted orders
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.orders.iter()
    }
}
