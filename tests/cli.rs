//! CLI integration tests for the shop directory commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use restock::store::{SqliteStore, Store};
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir_str(&self) -> String {
        self.temp_dir.path().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("restock").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn shop(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        let data_dir = self.data_dir_str();
        let mut full = vec!["shop", args[0], "--data-dir", data_dir.as_str()];
        full.extend_from_slice(&args[1..]);
        self.cmd().args(full).assert()
    }

    fn list_json(&self) -> Vec<Value> {
        let output = self.shop(&["list", "--json"]).success().get_output().stdout.clone();
        serde_json::from_slice(&output).expect("parse shop list")
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.temp_dir.path().join("restock.db")).expect("open store")
    }
}

#[test]
fn test_shop_add_and_list() {
    let ctx = TestContext::new();

    ctx.shop(&["add", "--domain", "alpha.myshopify.com", "--token", "shpat_one"])
        .success()
        .stdout(predicate::str::contains("Registered shop \"alpha.myshopify.com\""));

    ctx.shop(&["list"])
        .success()
        .stdout(predicate::str::contains("alpha.myshopify.com"))
        .stdout(predicate::str::contains("active"));

    let shops = ctx.list_json();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0]["shop_domain"], "alpha.myshopify.com");
    assert_eq!(shops[0]["is_active"], true);
    assert!(shops[0].get("access_token").is_none());
}

#[test]
fn test_shop_add_rejects_bad_input() {
    let ctx = TestContext::new();

    ctx.shop(&["add", "--domain", "not a domain", "--token", "shpat_one"])
        .failure()
        .stderr(predicate::str::contains("Shop domain"));

    ctx.shop(&["add", "--domain", "alpha.myshopify.com", "--token", " "])
        .failure()
        .stderr(predicate::str::contains("--token cannot be empty"));
}

#[test]
fn test_list_without_database_fails() {
    let ctx = TestContext::new();

    ctx.shop(&["list"])
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn test_deactivate_and_reinstall() {
    let ctx = TestContext::new();

    ctx.shop(&["add", "--domain", "alpha.myshopify.com", "--token", "shpat_one"])
        .success();

    ctx.shop(&["deactivate", "--domain", "alpha.myshopify.com"])
        .success()
        .stdout(predicate::str::contains("Deactivated shop"));
    assert_eq!(ctx.list_json()[0]["is_active"], false);

    ctx.shop(&["deactivate", "--domain", "alpha.myshopify.com"])
        .success()
        .stdout(predicate::str::contains("already inactive"));

    ctx.shop(&["add", "--domain", "alpha.myshopify.com", "--token", "shpat_two"])
        .success()
        .stdout(predicate::str::contains("Updated shop"));

    let shop = ctx
        .store()
        .get_shop_by_domain("alpha.myshopify.com")
        .unwrap()
        .unwrap();
    assert!(shop.is_active);
    assert_eq!(shop.access_token, "shpat_two");
    assert_eq!(ctx.list_json().len(), 1);
}

#[test]
fn test_deactivate_unknown_shop_fails() {
    let ctx = TestContext::new();

    ctx.shop(&["add", "--domain", "alpha.myshopify.com", "--token", "shpat_one"])
        .success();

    ctx.shop(&["deactivate", "--domain", "beta.myshopify.com"])
        .failure()
        .stderr(predicate::str::contains("Shop not found"));
}
