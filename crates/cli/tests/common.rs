// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// An `ordersync` command with no credentials or shop leaking in from the
/// developer's environment.
pub fn ordersync() -> Command {
    let mut cmd = cargo_bin_cmd!("ordersync");
    for var in [
        "ORDERSYNC_CLIENT_ID",
        "ORDERSYNC_CLIENT_SECRET",
        "ORDERSYNC_SHOP_URL",
        "ORDERSYNC_LOG",
        "ORDERSYNC_TIMINGS",
        "RUST_LOG",
        "NO_COLOR",
        "COLOR",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Helper to create an initialized temp directory with no shop configured
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    ordersync()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Helper to create an initialized temp directory pointing at `shop`
pub fn init_temp_with_shop(shop: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    ordersync()
        .args(["init", "--shop", shop])
        .current_dir(temp.path())
        .assert()
        .success();
    temp
}

/// Run `status -o json` in `temp` and parse the report.
pub fn status_json(temp: &TempDir) -> serde_json::Value {
    let output = ordersync()
        .args(["status", "-o", "json"])
        .current_dir(temp.path())
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).unwrap()
}
