//! Integration tests for the CLI commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GRID_JSON: &str = r#"[[
  ["ご利用日", "開始時刻", "終了時刻", "シッター名", "お子さま名", "お支払い額"],
  ["2025/07/05", "10:00", "12:00", "山田 花子", "杉並 すけ 様", "6,000"],
  ["合計", null, null, null, null, "6,000"]
]]"#;

const CANONICAL_CSV: &str = "\
ご利用日,開始時刻,終了時刻,シッター名,お子さま,お支払い額
2025/07/05,10:00,12:00,山田 花子,杉並 すけ 様,6000
2025/08/02,09:00,13:00,山田 花子,杉並 すけ 様,7000
";

const RECEIPT: &str = "\
領収書兼利用明細書
シッター名：山田 花子
ご利用日時 2025年7月5日 10:00〜12:00
保育料（非課税） ¥5,000
お支払い金額 ¥5,000
株式会社キッズライン
";

/// CLI command isolated from any user config file.
fn cli(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_subsidy"));
    cmd.env("XDG_CONFIG_HOME", home).env("HOME", home);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cli(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("receipt"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_extract_grid_to_csv() {
    let dir = TempDir::new().unwrap();
    let grid = dir.path().join("page.json");
    fs::write(&grid, GRID_JSON).unwrap();

    cli(dir.path())
        .arg("extract")
        .arg(&grid)
        .assert()
        .success()
        .stdout(predicate::str::contains("2025/07/05,10:00,12:00,山田 花子"))
        .stdout(predicate::str::contains("合計").not());
}

#[test]
fn test_extract_without_marker_fails() {
    let dir = TempDir::new().unwrap();
    let grid = dir.path().join("page.json");
    fs::write(&grid, r#"[[["請求書"]]]"#).unwrap();

    cli(dir.path())
        .arg("extract")
        .arg(&grid)
        .assert()
        .failure()
        .stderr(predicate::str::contains("page.json"));
}

#[test]
fn test_report_from_csv() {
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("usage.csv");
    fs::write(&csv, CANONICAL_CSV).unwrap();

    cli(dir.path())
        .arg("report")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""month": "7""#))
        .stdout(predicate::str::contains(r#""childName": "杉並 すけ""#))
        .stdout(predicate::str::contains(r#""subsidyAmount": "15,000""#))
        .stdout(predicate::str::contains(r#""requestAmount": "13,000""#))
        .stdout(predicate::str::contains(r#""month1": "8""#));
}

#[test]
fn test_classify() {
    let dir = TempDir::new().unwrap();
    let receipt = dir.path().join("receipt.txt");
    let invoice = dir.path().join("invoice.txt");
    fs::write(&receipt, RECEIPT).unwrap();
    fs::write(&invoice, "ご利用日  開始時刻  終了時刻").unwrap();

    cli(dir.path())
        .arg("classify")
        .arg(&receipt)
        .arg(&invoice)
        .assert()
        .success()
        .stdout(predicate::str::contains("receipt.txt\treceipt"))
        .stdout(predicate::str::contains("invoice.txt\tinvoice_table"));
}

#[test]
fn test_receipt_batch_fails_fast() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("a.txt");
    let bad = dir.path().join("b.txt");
    fs::write(&good, RECEIPT).unwrap();
    fs::write(&bad, "領収書兼利用明細書\nお支払い金額 ¥5,000").unwrap();

    cli(dir.path())
        .arg("receipt")
        .arg(&good)
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("b.txt"));
}

#[test]
fn test_receipt_batch_continue_on_error() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("a.txt");
    let bad = dir.path().join("b.txt");
    fs::write(&good, RECEIPT).unwrap();
    fs::write(&bad, "領収書兼利用明細書\nお支払い金額 ¥5,000").unwrap();

    cli(dir.path())
        .arg("receipt")
        .arg(&good)
        .arg(&bad)
        .arg("--continue-on-error")
        .assert()
        .success()
        .stdout(predicate::str::contains("2025/07/05,10:00,12:00,山田 花子"))
        .stderr(predicate::str::contains("b.txt"));
}

#[test]
fn test_store_save_backs_up_previous_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.csv");
    let store = dir.path().join("store.csv");
    fs::write(&input, CANONICAL_CSV).unwrap();

    cli(dir.path())
        .args(["store", "save"])
        .arg(&input)
        .arg("--to")
        .arg(&store)
        .assert()
        .success();
    assert!(store.exists());

    cli(dir.path())
        .args(["store", "save"])
        .arg(&input)
        .arg("--to")
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("store.csv.backup."));

    cli(dir.path())
        .args(["store", "backups"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("store.csv.backup."));
}

#[test]
fn test_store_validate_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.csv");
    fs::write(
        &input,
        "ご利用日,シッター名,お子さま\n2025-07-05,山田 花子,杉並 すけ\n",
    )
    .unwrap();

    cli(dir.path())
        .args(["store", "validate"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("row 1"));
}

#[test]
fn test_config_get_and_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rates.day_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2500"));

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "set", "rates.day_rate", "2000"])
        .assert()
        .success();

    cli(dir.path())
        .arg("--config")
        .arg(&config)
        .args(["config", "get", "rates.day_rate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2000"));
}
