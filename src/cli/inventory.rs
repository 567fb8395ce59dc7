//! CLI handlers for reading and adjusting stores
//!
//! `show`, `check`, `search`, `transfer` and `adjust`.

use crate::display::{format_diagnostics, format_search, format_store, format_transfer};
use crate::error::StockroomResult;
use crate::models::{MatchMode, SearchQuery};
use crate::services::{Direction, ReconciliationService};
use crate::session::Session;
use crate::storage::{Dialect, Store, StoreOptions};

/// Every configured store name, for commands that default to all of them
pub(crate) fn all_stores(session: &Session) -> Vec<String> {
    session.storage().store_names().cloned().collect()
}

/// Print a store as a table
pub fn handle_show_command(session: &Session, store: &str) -> StockroomResult<()> {
    let store = session.storage().open(store)?;
    print!("{}", format_store(&store));
    Ok(())
}

/// Report lines that could not be read, without changing the file
pub fn handle_check_command(
    session: &Session,
    store: &str,
    dialect: Option<Dialect>,
    all: bool,
) -> StockroomResult<()> {
    let storage = session.storage();
    let options = StoreOptions {
        dialect: dialect.unwrap_or(storage.options().dialect),
        ..storage.options()
    };
    let loaded = Store::load(store, storage.store_path(store)?, options)?;

    println!(
        "{}: {} record(s), {} unit(s)",
        loaded.name(),
        loaded.len(),
        loaded.total_quantity()
    );
    if all {
        print!("{}", format_diagnostics(loaded.diagnostics()));
    } else {
        print!("{}", format_diagnostics(loaded.problems()));
    }
    Ok(())
}

/// Search stores; with no `--store`, every configured store is searched
pub fn handle_search_command(
    session: &mut Session,
    query: &[String],
    mode: Option<MatchMode>,
    stores: &[String],
) -> StockroomResult<()> {
    let mode = mode.unwrap_or(session.settings().default_match_mode);
    let stores = if stores.is_empty() {
        all_stores(session)
    } else {
        stores.to_vec()
    };

    let outcome = session.search(&stores, SearchQuery::new(query.join(" "), mode))?;
    print!("{}", format_search(&outcome));
    Ok(())
}

/// Move stock between two stores
pub fn handle_transfer_command(
    session: &Session,
    description: &str,
    quantity: u64,
    from: &str,
    to: &str,
) -> StockroomResult<()> {
    let service = ReconciliationService::new(session.storage());
    let outcome = service.transfer(from, to, description, quantity)?;
    print!("{}", format_transfer(&outcome, from, to));
    Ok(())
}

/// Add or remove stock in one store
pub fn handle_adjust_command(
    session: &Session,
    store: &str,
    direction: Direction,
    description: &str,
    quantity: u64,
    keep_order: bool,
) -> StockroomResult<()> {
    let service = ReconciliationService::new(session.storage());
    let record = service.adjust(store, description, quantity, direction, keep_order)?;
    println!("{}: {} now {}", store, record.description(), record.quantity());
    Ok(())
}
