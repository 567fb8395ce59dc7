//! Record consolidation
//!
//! Collapses records sharing a key into one, summing quantities. The first
//! occurrence decides the description that is kept.

use std::collections::HashMap;

use crate::error::StockroomResult;
use crate::models::Record;

/// Merge duplicate keys, keeping first-seen order and casing
pub fn consolidate(records: &[Record]) -> StockroomResult<Vec<Record>> {
    let mut merged: Vec<Record> = Vec::with_capacity(records.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for record in records {
        match positions.get(&record.key()) {
            Some(&index) => merged[index].add(record.quantity())?,
            None => {
                positions.insert(record.key(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    Ok(merged)
}

/// True if no two records share a key
pub fn is_consolidated(records: &[Record]) -> bool {
    let mut seen = std::collections::HashSet::new();
    records.iter().all(|r| seen.insert(r.key()))
}
