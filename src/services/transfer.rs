//! Moving and adjusting stock
//!
//! In-memory operations on loaded stores. Every check runs before the first
//! mutation, so a failed call leaves both stores exactly as they were.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{StockroomError, StockroomResult};
use crate::models::Record;
use crate::storage::Store;

/// Direction of a quantity adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Add,
    Remove,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Add => write!(f, "add"),
            Direction::Remove => write!(f, "remove"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "add" | "in" | "+" => Ok(Direction::Add),
            "remove" | "out" | "-" => Ok(Direction::Remove),
            other => Err(format!("Unknown direction '{}': expected add or remove", other)),
        }
    }
}

/// Result of a transfer between two stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    /// Description as stored in the source
    pub item: String,
    pub quantity: u64,
    pub source_remaining: u64,
    pub destination_total: u64,
    /// Whether the destination had to create the record
    pub created: bool,
}

/// Move `quantity` of an item from `source` to `destination`
///
/// The lookup is case-insensitive. A record created in the destination takes
/// the description as given by the caller, trimmed.
pub fn transfer(
    source: &mut Store,
    destination: &mut Store,
    description: &str,
    quantity: u64,
) -> StockroomResult<TransferOutcome> {
    if quantity == 0 {
        return Err(StockroomError::Validation(
            "Transfer quantity must be greater than zero".into(),
        ));
    }
    if source.is_same_file(destination) {
        return Err(StockroomError::Validation(
            "Cannot transfer to the same store".into(),
        ));
    }

    let record = source
        .get(description)
        .ok_or_else(|| StockroomError::item_not_found(source.name(), description.trim()))?;
    if record.quantity() < quantity {
        return Err(StockroomError::InsufficientStock {
            store: source.name().to_string(),
            item: record.description().to_string(),
            needed: quantity,
            available: record.quantity(),
        });
    }
    let item = record.description().to_string();

    let created = !destination.contains(description);
    if destination.quantity_of(description).checked_add(quantity).is_none() {
        return Err(StockroomError::Validation(format!(
            "Quantity overflow for '{}' in {}",
            item,
            destination.name()
        )));
    }
    // Validates the new destination description before anything changes.
    if created {
        Record::new(description, 0)?;
    }

    let source_remaining = source.remove(description, quantity)?.quantity();
    let destination_total = destination.add(description, quantity)?.quantity();

    Ok(TransferOutcome {
        item,
        quantity,
        source_remaining,
        destination_total,
        created,
    })
}

/// Add or remove stock in a single store
///
/// Adding creates the record if needed; removing requires it to exist.
pub fn adjust(
    store: &mut Store,
    description: &str,
    quantity: u64,
    direction: Direction,
) -> StockroomResult<Record> {
    if quantity == 0 {
        return Err(StockroomError::Validation(
            "Adjustment quantity must be greater than zero".into(),
        ));
    }

    let record = match direction {
        Direction::Add => store.add(description, quantity)?,
        Direction::Remove => store.remove(description, quantity)?,
    };
    Ok(record.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreOptions;

    fn store(name: &str, records: &[(&str, u64)]) -> Store {
        let records = records
            .iter()
            .map(|(d, q)| Record::new(*d, *q).unwrap())
            .collect();
        Store::with_records(name, format!("{}.txt", name), StoreOptions::default(), records)
            .unwrap()
    }

    fn pairs(store: &Store) -> Vec<(String, u64)> {
        store
            .records()
            .iter()
            .map(|r| (r.description().to_string(), r.quantity()))
            .collect()
    }

    #[test]
    fn test_transfer_creates_destination_with_given_description() {
        let mut a = store("a", &[("Tornillo", 100)]);
        let mut b = store("b", &[]);

        let outcome = transfer(&mut a, &mut b, "tornillo", 30).unwrap();

        assert_eq!(pairs(&a), vec![("Tornillo".to_string(), 70)]);
        assert_eq!(pairs(&b), vec![("tornillo".to_string(), 30)]);
        assert!(outcome.created);
        assert_eq!(outcome.item, "Tornillo");
        assert_eq!(outcome.source_remaining, 70);
        assert_eq!(outcome.destination_total, 30);
    }

    #[test]
    fn test_transfer_conserves_quantity() {
        let mut a = store("a", &[("Tuerca", 12)]);
        let mut b = store("b", &[("TUERCA", 5)]);
        let before = a.quantity_of("tuerca") + b.quantity_of("tuerca");

        let outcome = transfer(&mut a, &mut b, "Tuerca", 12).unwrap();

        assert!(!outcome.created);
        assert_eq!(a.quantity_of("tuerca") + b.quantity_of("tuerca"), before);
        assert_eq!(pairs(&b), vec![("TUERCA".to_string(), 17)]);
        assert_eq!(a.quantity_of("tuerca"), 0);
    }

    #[test]
    fn test_transfer_insufficient_stock_leaves_stores_untouched() {
        let mut a = store("a", &[("Tornillo", 10)]);
        let mut b = store("b", &[("Tuerca", 1)]);

        let err = transfer(&mut a, &mut b, "tornillo", 11).unwrap_err();

        match err {
            StockroomError::InsufficientStock {
                needed, available, ..
            } => {
                assert_eq!(needed, 11);
                assert_eq!(available, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(pairs(&a), vec![("Tornillo".to_string(), 10)]);
        assert_eq!(pairs(&b), vec![("Tuerca".to_string(), 1)]);
    }

    #[test]
    fn test_transfer_missing_item() {
        let mut a = store("a", &[]);
        let mut b = store("b", &[]);
        assert!(transfer(&mut a, &mut b, "Nada", 1).unwrap_err().is_not_found());
    }

    #[test]
    fn test_transfer_rejects_zero_and_same_store() {
        let mut a = store("a", &[("Tornillo", 10)]);
        let mut b = store("b", &[]);
        assert!(transfer(&mut a, &mut b, "Tornillo", 0)
            .unwrap_err()
            .is_validation());

        let mut same = store("a", &[]);
        assert!(transfer(&mut a, &mut same, "Tornillo", 1)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_adjust_add_creates() {
        let mut s = store("s", &[]);
        let record = adjust(&mut s, "Cable USB", 4, Direction::Add).unwrap();
        assert_eq!(record.quantity(), 4);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_adjust_remove_requires_existing_and_enough() {
        let mut s = store("s", &[("Cable USB", 4)]);

        assert!(adjust(&mut s, "Cargador", 1, Direction::Remove)
            .unwrap_err()
            .is_not_found());
        assert!(matches!(
            adjust(&mut s, "cable usb", 5, Direction::Remove),
            Err(StockroomError::InsufficientStock { .. })
        ));
        assert_eq!(s.quantity_of("cable usb"), 4);

        let record = adjust(&mut s, "cable usb", 4, Direction::Remove).unwrap();
        assert_eq!(record.quantity(), 0);
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!("ADD".parse::<Direction>().unwrap(), Direction::Add);
        assert_eq!("remove".parse::<Direction>().unwrap(), Direction::Remove);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
