// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::error::Error;

#[test]
fn test_init_creates_config_and_database() {
    let dir = tempfile::tempdir().unwrap();

    run(
        Some("example.myshopify.com".into()),
        Some(dir.path().to_path_buf()),
    )
    .unwrap();

    let work_dir = dir.path().join(".ordersync");
    let config = Config::load(&work_dir).unwrap();
    assert_eq!(config.shop.url.as_deref(), Some("example.myshopify.com"));

    let db = Database::open(&work_dir.join("orders.db")).unwrap();
    assert_eq!(db.count_orders().unwrap(), 0);
    assert!(db.recent_sync_runs(1).unwrap().is_empty());
}

#[test]
fn test_init_twice_fails() {
    let dir = tempfile::tempdir().unwrap();
    run(None, Some(dir.path().to_path_buf())).unwrap();

    let err = run(None, Some(dir.path().to_path_buf())).unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized(_)));
}

#[test]
fn test_init_rejects_bad_shop_url() {
    let dir = tempfile::tempdir().unwrap();
    let err = run(Some("ftp://shop".into()), Some(dir.path().to_path_buf())).unwrap_err();

    assert!(matches!(err, Error::InvalidShopUrl { .. }));
    assert!(!dir.path().join(".ordersync").exists());
}
