//! Store display formatting
//!
//! Formats stores, search hits and codec diagnostics as plain-text tables.

use crate::models::Record;
use crate::services::{SearchOutcome, StoreHits};
use crate::storage::{Diagnostic, Store};

fn width(text: &str) -> usize {
    text.chars().count()
}

/// Format records as a two-column table with a total row
pub fn format_record_table(records: &[Record]) -> String {
    if records.is_empty() {
        return "No items.\n".to_string();
    }

    let desc_width = records
        .iter()
        .map(|r| width(r.description()))
        .max()
        .unwrap_or(11)
        .max(11);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<desc_width$}  {:>10}\n",
        "Description",
        "Quantity",
        desc_width = desc_width,
    ));
    output.push_str(&format!(
        "{:-<desc_width$}  {:->10}\n",
        "",
        "",
        desc_width = desc_width,
    ));

    for record in records {
        output.push_str(&format!(
            "{:<desc_width$}  {:>10}\n",
            record.description(),
            record.quantity(),
            desc_width = desc_width,
        ));
    }

    let total: u64 = records.iter().map(Record::quantity).sum();
    output.push_str(&format!(
        "{:-<desc_width$}  {:->10}\n",
        "",
        "",
        desc_width = desc_width,
    ));
    output.push_str(&format!(
        "{:<desc_width$}  {:>10}\n",
        format!("TOTAL ({} items)", records.len()),
        total,
        desc_width = desc_width,
    ));

    output
}

/// Format a whole store with a heading
pub fn format_store(store: &Store) -> String {
    let mut records = store.records().to_vec();
    records.sort_by(|a, b| a.description().cmp(b.description()));

    let mut output = format!("Store: {} ({})\n\n", store.name(), store.path().display());
    output.push_str(&format_record_table(&records));

    let problems = store.problems().count();
    if problems > 0 {
        output.push_str(&format!(
            "\n{} line(s) could not be read; run 'stockroom check {}' for details.\n",
            problems,
            store.name()
        ));
    }
    output
}

/// Format codec diagnostics, one per line
pub fn format_diagnostics<'a, I>(diagnostics: I) -> String
where
    I: IntoIterator<Item = &'a Diagnostic>,
{
    let mut output = String::new();
    for diagnostic in diagnostics {
        output.push_str(&format!("  {}\n", diagnostic));
    }
    if output.is_empty() {
        output.push_str("No problems found.\n");
    }
    output
}

fn format_hits(hits: &StoreHits) -> String {
    let mut output = format!("{}: {} match(es)\n", hits.store, hits.records.len());
    for record in &hits.records {
        output.push_str(&format!("  {:<40} {:>8}\n", record.description(), record.quantity()));
    }
    output
}

/// Format a search outcome
pub fn format_search(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::NoQuery => "No search term given.\n".to_string(),
        SearchOutcome::Results(hits) => {
            let mut output = String::new();
            for store_hits in hits {
                output.push_str(&format_hits(store_hits));
            }
            if outcome.hit_count() == 0 {
                output.push_str("Nothing matched.\n");
            }
            output
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{codec, Dialect, StoreOptions};

    #[test]
    fn test_record_table() {
        let records = vec![
            Record::new("Tornillo", 100).unwrap(),
            Record::new("Tuerca", 5).unwrap(),
        ];
        let output = format_record_table(&records);

        assert!(output.starts_with("Description"));
        assert!(output.contains("Tornillo"));
        assert!(output.contains("TOTAL (2 items)"));
        assert!(output.contains("105"));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(format_record_table(&[]), "No items.\n");
    }

    #[test]
    fn test_format_store_mentions_problems() {
        let parsed = codec::parse("    A 1\nbroken\n", Dialect::Lenient);
        let store =
            Store::with_records("warehouse", "w.txt", StoreOptions::default(), parsed.records)
                .unwrap();
        let output = format_store(&store);
        assert!(output.contains("Store: warehouse"));
        assert!(!output.contains("could not be read"));
    }

    #[test]
    fn test_format_search() {
        assert_eq!(format_search(&SearchOutcome::NoQuery), "No search term given.\n");

        let outcome = SearchOutcome::Results(vec![StoreHits {
            store: "warehouse".into(),
            records: vec![],
        }]);
        let output = format_search(&outcome);
        assert!(output.contains("warehouse: 0 match(es)"));
        assert!(output.contains("Nothing matched."));
    }

    #[test]
    fn test_format_diagnostics() {
        let parsed = codec::parse("broken\n", Dialect::Lenient);
        let output = format_diagnostics(parsed.problems());
        assert!(output.contains("broken"));
        assert_eq!(format_diagnostics(std::iter::empty()), "No problems found.\n");
    }
}
