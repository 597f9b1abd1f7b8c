// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::remote::TransportError;

/// All possible errors that can occur in the ordersync CLI.
///
/// Errors provide user-friendly messages with hints for common issues.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'ordersync init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("missing credential: {var} is not set\n  hint: export it or add it to a .env file in the project root")]
    MissingCredential { var: &'static str },

    #[error("no shop configured\n  hint: set [shop].url in .ordersync/config.toml or export ORDERSYNC_SHOP_URL")]
    MissingShopUrl,

    #[error("invalid shop url '{url}': {reason}")]
    InvalidShopUrl { url: String, reason: String },

    #[error("authentication failed: {0}\n  hint: check ORDERSYNC_CLIENT_ID and ORDERSYNC_CLIENT_SECRET")]
    Auth(String),

    #[error("network error after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: TransportError },

    #[error("unexpected HTTP {status} from {url}: {body}")]
    HttpStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("another sync is running (run {run_id}, started {started_at})\n  hint: wait for it to finish, or run 'ordersync unlock' if that process was killed")]
    LockContention {
        run_id: i64,
        started_at: DateTime<Utc>,
    },

    #[error("another watch loop is already running in {0}")]
    WatchAlreadyRunning(String),

    #[error("interrupted")]
    Interrupted,

    #[error("order not found: {0}")]
    OrderNotFound(i64),

    #[error("sync run not found: {0}")]
    SyncRunNotFound(i64),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data in database: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ordersync operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Interrupted => 130,
            _ => 1,
        }
    }
}

impl From<ordersync_core::Error> for Error {
    fn from(e: ordersync_core::Error) -> Self {
        match e {
            ordersync_core::Error::OrderNotFound(id) => Error::OrderNotFound(id),
            ordersync_core::Error::SyncRunNotFound(id) => Error::SyncRunNotFound(id),
            ordersync_core::Error::LockContention { run_id, started_at } => {
                Error::LockContention { run_id, started_at }
            }
            ordersync_core::Error::InvalidSyncStatus(s) => {
                Error::CorruptedData(format!("invalid sync status '{s}'"))
            }
            ordersync_core::Error::InvalidSyncType(s) => {
                Error::CorruptedData(format!("invalid sync type '{s}'"))
            }
            e @ ordersync_core::Error::MalformedOrder { .. } => {
                Error::InvalidResponse(e.to_string())
            }
            ordersync_core::Error::Database(e) => Error::Database(e),
            ordersync_core::Error::Io(e) => Error::Io(e),
            ordersync_core::Error::Json(e) => Error::Json(e),
            ordersync_core::Error::CorruptedData(s) => Error::CorruptedData(s),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
