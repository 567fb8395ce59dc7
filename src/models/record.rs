//! Inventory record model
//!
//! A record is a `(description, quantity)` pair. Descriptions keep the casing
//! and inner spacing they were first written with; identity is the normalized
//! key (trimmed, lower-cased).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StockroomError, StockroomResult};

/// Normalize a description into its record key
pub fn normalize_key(description: &str) -> String {
    description.trim().to_lowercase()
}

/// A single inventory line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RecordData")]
pub struct Record {
    description: String,
    quantity: u64,
}

/// Unvalidated wire form used when deserializing
#[derive(Deserialize)]
struct RecordData {
    description: String,
    quantity: u64,
}

impl TryFrom<RecordData> for Record {
    type Error = StockroomError;

    fn try_from(data: RecordData) -> Result<Self, Self::Error> {
        Record::new(data.description, data.quantity)
    }
}

impl Record {
    /// Create a record, validating the description
    ///
    /// The description is trimmed; it must be non-empty and free of control
    /// characters so that it round-trips through a single text line.
    pub fn new(description: impl Into<String>, quantity: u64) -> StockroomResult<Self> {
        let description = description.into();
        let trimmed = description.trim();

        if trimmed.is_empty() {
            return Err(StockroomError::Validation(
                "Record description cannot be empty".into(),
            ));
        }

        if trimmed.chars().any(char::is_control) {
            return Err(StockroomError::Validation(format!(
                "Record description contains control characters: {:?}",
                trimmed
            )));
        }

        Ok(Self {
            description: trimmed.to_string(),
            quantity,
        })
    }

    /// The description as originally written
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Current quantity
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Normalized identity of this record
    pub fn key(&self) -> String {
        normalize_key(&self.description)
    }

    /// Check whether this record has the given description (case-insensitive)
    pub fn matches_key(&self, description: &str) -> bool {
        self.key() == normalize_key(description)
    }

    /// Replace the description, keeping the quantity
    pub fn set_description(&mut self, description: &str) -> StockroomResult<()> {
        let renamed = Record::new(description, self.quantity)?;
        self.description = renamed.description;
        Ok(())
    }

    /// Overwrite the quantity
    pub fn set_quantity(&mut self, quantity: u64) {
        self.quantity = quantity;
    }

    /// Add stock
    pub fn add(&mut self, amount: u64) -> StockroomResult<()> {
        self.quantity = self.quantity.checked_add(amount).ok_or_else(|| {
            StockroomError::Validation(format!(
                "Quantity overflow for '{}': {} + {}",
                self.description, self.quantity, amount
            ))
        })?;
        Ok(())
    }

    /// Remove stock; fails without mutating when not enough is available
    pub fn remove(&mut self, amount: u64, store: &str) -> StockroomResult<()> {
        if amount > self.quantity {
            return Err(StockroomError::InsufficientStock {
                store: store.to_string(),
                item: self.description.clone(),
                needed: amount,
                available: self.quantity,
            });
        }
        self.quantity -= amount;
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.description, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_description() {
        let record = Record::new("  Tornillo Cabeza Plana 1/4  ", 100).unwrap();
        assert_eq!(record.description(), "Tornillo Cabeza Plana 1/4");
        assert_eq!(record.quantity(), 100);
        assert_eq!(record.key(), "tornillo cabeza plana 1/4");
    }

    #[test]
    fn test_rejects_empty_description() {
        assert!(Record::new("   ", 1).unwrap_err().is_validation());
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(Record::new("Tornillo\tPlano", 1).is_err());
        assert!(Record::new("Tornillo\nPlano", 1).is_err());
    }

    #[test]
    fn test_matches_key_case_insensitive() {
        let record = Record::new("Widget", 2).unwrap();
        assert!(record.matches_key("  widget "));
        assert!(!record.matches_key("gadget"));
    }

    #[test]
    fn test_remove_insufficient_leaves_quantity() {
        let mut record = Record::new("Widget", 2).unwrap();
        let err = record.remove(5, "warehouse").unwrap_err();
        assert!(matches!(
            err,
            StockroomError::InsufficientStock {
                needed: 5,
                available: 2,
                ..
            }
        ));
        assert_eq!(record.quantity(), 2);

        record.remove(2, "warehouse").unwrap();
        assert_eq!(record.quantity(), 0);
    }

    #[test]
    fn test_add_overflow() {
        let mut record = Record::new("Widget", u64::MAX).unwrap();
        assert!(record.add(1).is_err());
        assert_eq!(record.quantity(), u64::MAX);
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Record = serde_json::from_str(r#"{"description":"Widget","quantity":3}"#).unwrap();
        assert_eq!(ok.quantity(), 3);

        let bad = serde_json::from_str::<Record>(r#"{"description":"  ","quantity":3}"#);
        assert!(bad.is_err());
    }
}
