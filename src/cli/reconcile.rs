//! CLI handlers for fuzzy matching
//!
//! `match` lines an order up against a store; `duplicates` looks for items
//! inside one store that are probably the same thing typed twice.

use crate::display::{format_match_report, format_pairs};
use crate::error::StockroomResult;
use crate::services::MatchService;
use crate::session::Session;

fn threshold_or_default(session: &Session, threshold: Option<f64>) -> f64 {
    threshold.unwrap_or(session.settings().similarity_threshold)
}

/// Match an order's lines against a store
pub fn handle_match_command(
    session: &Session,
    order: &str,
    store: &str,
    threshold: Option<f64>,
) -> StockroomResult<()> {
    let threshold = threshold_or_default(session, threshold);
    let report = MatchService::new(session.storage()).match_order(order, store, threshold)?;

    println!("Matching order {} against {} (>= {:.0}%)", order, store, threshold);
    print!("{}", format_match_report(&report));
    Ok(())
}

/// List near-duplicate descriptions inside a store
pub fn handle_duplicates_command(
    session: &Session,
    store: &str,
    threshold: Option<f64>,
) -> StockroomResult<()> {
    let threshold = threshold_or_default(session, threshold);
    let pairs = MatchService::new(session.storage()).duplicates(store, threshold)?;
    print!("{}", format_pairs(&pairs));
    Ok(())
}
