// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables used by the CLI are defined here
//! with typed accessor functions. The variable name constants are generated
//! by `build.rs` and live in the [`vars`] submodule.

/// Generated environment variable name constants.
pub mod vars {
    include!(concat!(env!("OUT_DIR"), "/env_vars.rs"));
}

/// Returns a non-blank variable's value.
fn non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Returns `true` if `ORDERSYNC_TIMINGS` is set (any value).
pub fn timings() -> bool {
    std::env::var(vars::ORDERSYNC_TIMINGS).is_ok()
}

/// Log filter directives: `ORDERSYNC_LOG`, falling back to `RUST_LOG`.
pub fn log_filter() -> Option<String> {
    non_empty(vars::ORDERSYNC_LOG).or_else(|| non_empty(vars::RUST_LOG))
}

/// Returns the value of `ORDERSYNC_CLIENT_ID` if set.
pub fn client_id() -> Option<String> {
    non_empty(vars::ORDERSYNC_CLIENT_ID)
}

/// Returns the value of `ORDERSYNC_CLIENT_SECRET` if set.
pub fn client_secret() -> Option<String> {
    non_empty(vars::ORDERSYNC_CLIENT_SECRET)
}

/// Returns the value of `ORDERSYNC_SHOP_URL` if set.
pub fn shop_url() -> Option<String> {
    non_empty(vars::ORDERSYNC_SHOP_URL)
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
