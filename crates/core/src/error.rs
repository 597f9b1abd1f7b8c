// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ordersync-core operations.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// All possible errors that can occur in ordersync-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("order not found: {0}")]
    OrderNotFound(i64),

    #[error("sync run not found: {0}")]
    SyncRunNotFound(i64),

    #[error("another sync is running (run {run_id}, started {started_at})\n  hint: wait for it to finish, or run 'ordersync unlock' if that process was killed")]
    LockContention {
        run_id: i64,
        started_at: DateTime<Utc>,
    },

    #[error("invalid sync status: '{0}'\n  hint: valid statuses are: running, completed, failed, timeout")]
    InvalidSyncStatus(String),

    #[error("invalid sync type: '{0}'\n  hint: valid types are: incremental, reconciliation")]
    InvalidSyncType(String),

    #[error("malformed order {}: {reason}", order_id.map_or_else(|| "<no id>".to_string(), |id| id.to_string()))]
    MalformedOrder {
        order_id: Option<i64>,
        reason: String,
    },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

/// A specialized Result type for ordersync-core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error belongs to one order's payload rather than the store.
    ///
    /// A page write skips such an order and carries on. Anything else (a busy
    /// or unwritable database, I/O) stops the page.
    pub fn is_order_scoped(&self) -> bool {
        match self {
            Error::MalformedOrder { .. } | Error::CorruptedData(_) | Error::Json(_) => true,
            Error::Database(e) => {
                e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
