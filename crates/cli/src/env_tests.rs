// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::ORDERSYNC_LOG, "ORDERSYNC_LOG");
    assert_eq!(vars::RUST_LOG, "RUST_LOG");
    assert_eq!(vars::ORDERSYNC_TIMINGS, "ORDERSYNC_TIMINGS");
    assert_eq!(vars::ORDERSYNC_CLIENT_ID, "ORDERSYNC_CLIENT_ID");
    assert_eq!(vars::ORDERSYNC_CLIENT_SECRET, "ORDERSYNC_CLIENT_SECRET");
    assert_eq!(vars::ORDERSYNC_SHOP_URL, "ORDERSYNC_SHOP_URL");
}

#[test]
fn test_timings_toggle() {
    std::env::remove_var("ORDERSYNC_TIMINGS");
    assert!(!timings());
    std::env::set_var("ORDERSYNC_TIMINGS", "yes");
    assert!(timings());
    std::env::remove_var("ORDERSYNC_TIMINGS");
}

#[test]
fn test_log_filter_precedence() {
    std::env::remove_var("ORDERSYNC_LOG");
    std::env::remove_var("RUST_LOG");
    assert_eq!(log_filter(), None);

    std::env::set_var("RUST_LOG", "warn");
    assert_eq!(log_filter().as_deref(), Some("warn"));

    std::env::set_var("ORDERSYNC_LOG", "ordersync=debug");
    assert_eq!(log_filter().as_deref(), Some("ordersync=debug"));

    std::env::set_var("ORDERSYNC_LOG", "  ");
    assert_eq!(log_filter().as_deref(), Some("warn"));

    std::env::remove_var("ORDERSYNC_LOG");
    std::env::remove_var("RUST_LOG");
}

#[test]
fn test_client_id() {
    std::env::remove_var("ORDERSYNC_CLIENT_ID");
    assert_eq!(client_id(), None);
    std::env::set_var("ORDERSYNC_CLIENT_ID", "abc");
    assert_eq!(client_id().as_deref(), Some("abc"));
    std::env::remove_var("ORDERSYNC_CLIENT_ID");
}

#[test]
fn test_blank_secret_is_unset() {
    std::env::set_var("ORDERSYNC_CLIENT_SECRET", "");
    assert_eq!(client_secret(), None);
    std::env::remove_var("ORDERSYNC_CLIENT_SECRET");
}

#[test]
fn test_shop_url() {
    std::env::set_var("ORDERSYNC_SHOP_URL", "example.myshopify.com");
    assert_eq!(shop_url().as_deref(), Some("example.myshopify.com"));
    std::env::remove_var("ORDERSYNC_SHOP_URL");
}
