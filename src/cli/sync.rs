//! CLI handlers for key-set reconciliation
//!
//! `normalize` is additive and runs immediately. `strict-sync` and `rename`
//! print a preview and only write with `--force`, after a backup.

use crate::display::{format_normalize_report, format_rename, format_sync_plan};
use crate::error::{StockroomError, StockroomResult};
use crate::services::ReconciliationService;
use crate::session::Session;

use super::inventory::all_stores;

/// Add zero-quantity placeholders so both stores share their items
pub fn handle_normalize_command(session: &Session, first: &str, second: &str) -> StockroomResult<()> {
    let service = ReconciliationService::new(session.storage());
    let report = service.normalize(first, second)?;
    print!("{}", format_normalize_report(&report, first, second));
    Ok(())
}

/// Rebuild `target` to exactly the items of `reference`
pub fn handle_strict_sync_command(
    session: &Session,
    reference: &str,
    target: &str,
    force: bool,
) -> StockroomResult<()> {
    let service = ReconciliationService::new(session.storage());
    let plan = service.plan_strict_sync(reference, target)?;
    print!("{}", format_sync_plan(&plan, reference, target));

    if plan.is_noop() {
        return Ok(());
    }
    if !force {
        println!();
        println!("WARNING: dropped items lose their quantities.");
        println!("To proceed, run again with --force flag:");
        println!("  stockroom strict-sync {} {} --force", reference, target);
        return Ok(());
    }

    if let Some(backup) = session.backup_before("strict-sync")? {
        println!("Backup saved: {}", backup.display());
    }
    service.strict_sync(reference, target)?;
    println!("{} now matches {}.", target, reference);
    Ok(())
}

/// Rename an item in every store that has it
pub fn handle_rename_command(
    session: &Session,
    old: &str,
    new: &str,
    stores: &[String],
    force: bool,
) -> StockroomResult<()> {
    let stores = if stores.is_empty() {
        all_stores(session)
    } else {
        stores.to_vec()
    };

    let mut holders = Vec::new();
    let mut conflicts = Vec::new();
    for name in &stores {
        let store = session.storage().open(name)?;
        if store.contains(old) {
            holders.push(name.as_str());
        }
        if store.contains(new) && !store.get(new).is_some_and(|r| r.matches_key(old)) {
            conflicts.push(name.as_str());
        }
    }

    println!("Rename '{}' -> '{}'", old.trim(), new.trim());
    println!("  found in: {}", if holders.is_empty() { "-".to_string() } else { holders.join(", ") });
    if !conflicts.is_empty() {
        println!("  '{}' already exists in: {}", new.trim(), conflicts.join(", "));
    }

    if !force {
        println!();
        println!("To proceed, run again with --force flag:");
        println!("  stockroom rename '{}' '{}' --force", old.trim(), new.trim());
        return Ok(());
    }

    if holders.is_empty() {
        return Err(StockroomError::item_not_found(stores.join(", "), old.trim()));
    }
    if let Some(store) = conflicts.first() {
        return Err(StockroomError::DuplicateKeyOnRename {
            store: store.to_string(),
            item: new.trim().to_string(),
        });
    }

    if let Some(backup) = session.backup_before("rename")? {
        println!("Backup saved: {}", backup.display());
    }
    let report = ReconciliationService::new(session.storage()).rename(&stores, old, new)?;
    print!("{}", format_rename(&report));
    Ok(())
}
