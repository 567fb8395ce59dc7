//! Reconciliation display formatting
//!
//! Previews and reports for sync, rename, order and matching operations.

use crate::services::{
    ApplyReport, MatchReport, NormalizeReport, RenameReport, SimilarPair, StrictSyncPlan,
    TransferOutcome,
};
use crate::storage::{OrderEntry, OrderFile};

/// Format a transfer result
pub fn format_transfer(outcome: &TransferOutcome, source: &str, destination: &str) -> String {
    format!(
        "Moved {} x {} from {} to {}{}\n  {}: {} left\n  {}: {} on hand\n",
        outcome.quantity,
        outcome.item,
        source,
        destination,
        if outcome.created { " (new item)" } else { "" },
        source,
        outcome.source_remaining,
        destination,
        outcome.destination_total
    )
}

/// Format the placeholders added by normalize
pub fn format_normalize_report(report: &NormalizeReport, first: &str, second: &str) -> String {
    if report.is_empty() {
        return format!("{} and {} already share the same items.\n", first, second);
    }

    let mut output = String::new();
    for (store, added) in [
        (first, &report.added_to_first),
        (second, &report.added_to_second),
    ] {
        output.push_str(&format!("Added to {} at 0: {}\n", store, added.len()));
        for description in added {
            output.push_str(&format!("  + {}\n", description));
        }
    }
    output
}

/// Format a strict-sync plan as a preview
pub fn format_sync_plan(plan: &StrictSyncPlan, reference: &str, target: &str) -> String {
    if plan.is_noop() {
        return format!("{} already matches {}.\n", target, reference);
    }

    let mut output = format!("Strict sync of {} to match {}:\n", target, reference);
    output.push_str(&format!("  keep:   {} item(s)\n", plan.kept.len()));
    output.push_str(&format!("  add:    {} item(s) at 0\n", plan.added.len()));
    for description in &plan.added {
        output.push_str(&format!("    + {}\n", description));
    }
    output.push_str(&format!(
        "  drop:   {} item(s), {} unit(s) discarded\n",
        plan.dropped.len(),
        plan.discarded_quantity()
    ));
    for record in &plan.dropped {
        output.push_str(&format!("    - {} ({})\n", record.description(), record.quantity()));
    }
    output
}

/// Format a rename result
pub fn format_rename(report: &RenameReport) -> String {
    format!(
        "Renamed '{}' to '{}' in {}\n",
        report.from,
        report.to,
        report.stores.join(", ")
    )
}

/// Format an order file, marking ready lines
pub fn format_order(order: &OrderFile) -> String {
    let mut output = format!("Order: {}\n", order.name());
    let mut count = 0;

    for line in order.lines() {
        match &line.entry {
            OrderEntry::Ready(record) => {
                output.push_str(&format!("  [ok] {}\n", record));
                count += 1;
            }
            OrderEntry::Pending(record) => {
                output.push_str(&format!("  [  ] {}\n", record));
                count += 1;
            }
            OrderEntry::Other => {}
        }
    }

    if count == 0 {
        output.push_str("  (empty)\n");
    }
    output
}

/// Format the result of applying an order
pub fn format_apply_report(report: &ApplyReport) -> String {
    if report.applied.is_empty() {
        return format!("Order {} has no lines marked ok.\n", report.order);
    }

    let mut output = match &report.source {
        Some(source) => format!(
            "Applied {} line(s) from {}: {} -> {}\n",
            report.applied.len(),
            report.order,
            source,
            report.destination
        ),
        None => format!(
            "Received {} line(s) from {} into {}\n",
            report.applied.len(),
            report.order,
            report.destination
        ),
    };
    for record in &report.applied {
        output.push_str(&format!("  {}\n", record));
    }
    output.push_str(&format!("{} line(s) left in the order\n", report.remaining));
    output
}

/// Format similarity pairs as a table
pub fn format_pairs(pairs: &[SimilarPair]) -> String {
    if pairs.is_empty() {
        return "No similar descriptions found.\n".to_string();
    }

    let left_width = pairs
        .iter()
        .map(|p| p.left.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    for pair in pairs {
        output.push_str(&format!(
            "{:>5.1}%  {:<left_width$}  ~  {}\n",
            pair.score,
            pair.left,
            pair.right,
            left_width = left_width,
        ));
    }
    output
}

/// Format an order-vs-store match report
pub fn format_match_report(report: &MatchReport) -> String {
    let mut output = format!("Exact matches: {}\n", report.exact.len());

    output.push_str("\nSuggestions:\n");
    output.push_str(&format_pairs(&report.suggestions));

    if !report.unmatched.is_empty() {
        output.push_str("\nNo match:\n");
        for description in &report.unmatched {
            output.push_str(&format!("  {}\n", description));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Record;

    #[test]
    fn test_sync_plan_preview() {
        let plan = StrictSyncPlan {
            kept: vec![Record::new("B", 5).unwrap()],
            added: vec!["A".to_string()],
            dropped: vec![Record::new("X", 9).unwrap()],
        };

        let output = format_sync_plan(&plan, "warehouse", "storefront");
        assert!(output.contains("+ A"));
        assert!(output.contains("- X (9)"));
        assert!(output.contains("9 unit(s) discarded"));

        let noop = StrictSyncPlan::default();
        assert!(format_sync_plan(&noop, "w", "s").contains("already matches"));
    }

    #[test]
    fn test_format_pairs() {
        let pairs = vec![SimilarPair {
            left: "Pacha".into(),
            right: "Pachas".into(),
            score: 83.333,
        }];
        let output = format_pairs(&pairs);
        assert!(output.contains(" 83.3%"));
        assert!(output.contains("Pacha  ~  Pachas"));
        assert_eq!(format_pairs(&[]), "No similar descriptions found.\n");
    }

    #[test]
    fn test_normalize_report() {
        let report = NormalizeReport {
            added_to_first: vec!["C".into()],
            added_to_second: vec![],
        };
        let output = format_normalize_report(&report, "warehouse", "storefront");
        assert!(output.contains("Added to warehouse at 0: 1"));
        assert!(output.contains("  + C"));
    }
}
