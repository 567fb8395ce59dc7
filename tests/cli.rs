use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn stockroom(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_stockroom"));
    cmd.env("STOCKROOM_DATA_DIR", home.as_os_str())
        .env_remove("RUST_LOG");
    cmd
}

fn store_file(home: &Path, name: &str) -> PathBuf {
    home.join("data").join(format!("{}.txt", name))
}

fn seed(home: &Path, name: &str, contents: &str) {
    let path = store_file(home, name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn test_init_writes_settings_and_restrictions() {
    let temp = TempDir::new().unwrap();

    stockroom(temp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete"))
        .stdout(predicate::str::contains("warehouse"));

    assert!(temp.path().join("config.json").exists());
    let restrictions = fs::read_to_string(temp.path().join("restrictions.json")).unwrap();
    assert!(restrictions.contains("wholesale"));
    assert!(restrictions.contains("replica"));
}

#[test]
fn test_adjust_then_show() {
    let temp = TempDir::new().unwrap();

    stockroom(temp.path())
        .args(["adjust", "warehouse", "add", "Tornillo 3mm", "40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tornillo 3mm now 40"));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "warehouse")).unwrap(),
        "    Tornillo 3mm 40\n"
    );

    stockroom(temp.path())
        .args(["show", "warehouse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tornillo 3mm"))
        .stdout(predicate::str::contains("40"));
}

#[test]
fn test_transfer_moves_stock_between_stores() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tornillo 50\n    Tuerca 10\n");
    seed(temp.path(), "storefront", "    Tornillo 5\n");

    stockroom(temp.path())
        .args(["transfer", "tornillo", "30", "--from", "warehouse", "--to", "storefront"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warehouse: 20 left"))
        .stdout(predicate::str::contains("storefront: 35 on hand"));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "warehouse")).unwrap(),
        "    Tornillo 20\n    Tuerca 10\n"
    );
    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "storefront")).unwrap(),
        "    Tornillo 35\n"
    );
}

#[test]
fn test_transfer_insufficient_stock_leaves_files_alone() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tornillo 5\n");
    seed(temp.path(), "storefront", "    Tornillo 1\n");

    stockroom(temp.path())
        .args(["transfer", "Tornillo", "6", "--from", "warehouse", "--to", "storefront"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insufficient stock"));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "warehouse")).unwrap(),
        "    Tornillo 5\n"
    );
    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "storefront")).unwrap(),
        "    Tornillo 1\n"
    );
}

#[test]
fn test_search_without_terms() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Cable USB C 4\n");

    stockroom(temp.path())
        .arg("search")
        .assert()
        .success()
        .stdout(predicate::str::contains("No search term given"));
}

#[test]
fn test_search_advanced_excludes_terms() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Cable USB C 4\n    Cable HDMI 2\n");

    stockroom(temp.path())
        .args(["search", "--mode", "advanced", "cable", "-usb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cable HDMI"))
        .stdout(predicate::str::contains("Cable USB C").not());
}

#[test]
fn test_strict_sync_previews_without_force() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tornillo 5\n");
    seed(temp.path(), "storefront", "    Tuerca 3\n");

    stockroom(temp.path())
        .args(["strict-sync", "warehouse", "storefront"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Tuerca (3)"))
        .stdout(predicate::str::contains("--force"));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "storefront")).unwrap(),
        "    Tuerca 3\n"
    );

    stockroom(temp.path())
        .args(["strict-sync", "warehouse", "storefront", "--force"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "storefront")).unwrap(),
        "    Tornillo 0\n"
    );
    let backups = fs::read_dir(temp.path().join("backups")).unwrap().count();
    assert_eq!(backups, 1);
}

#[test]
fn test_rename_preview_quotes_descriptions() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tornillo 5\n");

    stockroom(temp.path())
        .args(["rename", "Tornillo", "Tornillo 3mm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("found in: warehouse"))
        .stdout(predicate::str::contains(
            "stockroom rename 'Tornillo' 'Tornillo 3mm' --force",
        ));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "warehouse")).unwrap(),
        "    Tornillo 5\n"
    );
}

#[test]
fn test_order_add_rejects_restricted_keyword() {
    let temp = TempDir::new().unwrap();

    stockroom(temp.path())
        .args(["order", "add", "wholesale", "Cargador Original Samsung", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("restricted keyword 'original'"));

    assert!(!temp.path().join("data").join("orders").join("wholesale.txt").exists());

    stockroom(temp.path())
        .args(["order", "add", "wholesale", "Cargador Generico", "2"])
        .assert()
        .success();
}

#[test]
fn test_order_apply_moves_ready_lines() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tornillo 10\n");
    let orders = temp.path().join("data").join("orders");
    fs::create_dir_all(&orders).unwrap();
    fs::write(orders.join("import.txt"), "    Tornillo 4 ok\n    Tuerca 2\n").unwrap();

    stockroom(temp.path())
        .args(["order", "apply", "import", "--to", "warehouse"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 line(s) left"));

    assert_eq!(
        fs::read_to_string(store_file(temp.path(), "warehouse")).unwrap(),
        "    Tornillo 14\n"
    );
    assert_eq!(
        fs::read_to_string(orders.join("import.txt")).unwrap(),
        "    Tuerca 2\n"
    );
}

#[test]
fn test_export_csv_to_stdout() {
    let temp = TempDir::new().unwrap();
    seed(temp.path(), "warehouse", "    Tuerca 3\n    Tornillo 5\n");

    stockroom(temp.path())
        .args(["export", "warehouse", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Description,Quantity\n"))
        .stdout(predicate::str::contains("Tornillo,5"));
}

#[test]
fn test_audit_records_changes() {
    let temp = TempDir::new().unwrap();

    stockroom(temp.path())
        .args(["adjust", "storefront", "add", "Tuerca", "3"])
        .assert()
        .success();

    stockroom(temp.path())
        .arg("audit")
        .assert()
        .success()
        .stdout(predicate::str::contains("ADJUST"));
}

#[test]
fn test_recover_with_nothing_pending() {
    let temp = TempDir::new().unwrap();

    stockroom(temp.path())
        .arg("recover")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to recover"));
}
