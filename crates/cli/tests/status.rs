// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod common;
use common::*;

#[test]
fn empty_store_text() {
    let temp = init_temp_with_shop("example.myshopify.com");

    ordersync()
        .arg("status")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Shop: https://example.myshopify.com/"))
        .stdout(predicate::str::contains("Lock: free"))
        .stdout(predicate::str::contains("Watermark: none"))
        .stdout(predicate::str::contains("Orders: 0"))
        .stdout(predicate::str::contains("Recent runs").not());
}

#[test]
fn empty_store_json() {
    let temp = init_temp();
    let report = status_json(&temp);

    assert!(report["shop"].is_null());
    assert_eq!(report["lock"], serde_json::json!([]));
    assert!(report["watermark"].is_null());
    assert_eq!(report["orders"], 0);
    assert_eq!(report["line_items"], 0);
    assert_eq!(report["recent_runs"], serde_json::json!([]));
}

#[test]
fn shop_from_environment_wins() {
    let temp = init_temp_with_shop("example.myshopify.com");
    let report = {
        let output = ordersync()
            .args(["status", "-o", "json"])
            .env("ORDERSYNC_SHOP_URL", "other.myshopify.com")
            .current_dir(temp.path())
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice::<serde_json::Value>(&output).unwrap()
    };

    assert_eq!(report["shop"], "https://other.myshopify.com/");
}

#[test]
fn unlock_with_no_lock() {
    let temp = init_temp();

    ordersync()
        .arg("unlock")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No sync lock is held"));
}

#[test]
fn reset_watermark_with_no_watermark() {
    let temp = init_temp();

    ordersync()
        .arg("reset-watermark")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No watermark to clear"));
}

#[test]
fn rejects_unknown_output_format() {
    let temp = init_temp();

    ordersync()
        .args(["status", "-o", "yaml"])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
