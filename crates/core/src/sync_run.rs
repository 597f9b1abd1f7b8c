// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync history records.
//!
//! A [`SyncRun`] is both the audit trail of one orchestrator invocation and
//! the advisory lock: a row in [`SyncStatus::Running`] means a run holds the
//! lock.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Lifecycle status of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Holds the lock. The only non-terminal state.
    Running,
    /// Finished normally; its `last_order_date` is a watermark candidate.
    Completed,
    /// Finished abnormally (fetch exhausted, auth failure, interrupt).
    Failed,
    /// Abandoned while running and reclaimed by a later run or an operator.
    Timeout,
}

impl SyncStatus {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Running => "running",
            SyncStatus::Completed => "completed",
            SyncStatus::Failed => "failed",
            SyncStatus::Timeout => "timeout",
        }
    }

    /// Returns true for every state except running.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SyncStatus::Running)
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "running" => Ok(SyncStatus::Running),
            "completed" => Ok(SyncStatus::Completed),
            "failed" => Ok(SyncStatus::Failed),
            "timeout" => Ok(SyncStatus::Timeout),
            _ => Err(Error::InvalidSyncStatus(s.to_string())),
        }
    }
}

/// Which walk over the remote order history a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    /// Resume from the last committed watermark.
    Incremental,
    /// Re-walk the full history from the origin, ignoring the watermark.
    Reconciliation,
}

impl SyncType {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncType::Incremental => "incremental",
            SyncType::Reconciliation => "reconciliation",
        }
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "incremental" => Ok(SyncType::Incremental),
            "reconciliation" => Ok(SyncType::Reconciliation),
            _ => Err(Error::InvalidSyncType(s.to_string())),
        }
    }
}

/// One row of `sync_history`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncRun {
    pub id: i64,
    pub sync_type: SyncType,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Last progress checkpoint of a running sync.
    pub heartbeat_at: Option<DateTime<Utc>>,
    pub records_fetched: i64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub status: SyncStatus,
    pub error_message: Option<String>,
}

impl SyncRun {
    /// The last moment this run was known to be alive.
    pub fn last_alive_at(&self) -> DateTime<Utc> {
        self.heartbeat_at.unwrap_or(self.started_at)
    }

    /// Returns true if a running row has not renewed its lease within `stale_after`.
    ///
    /// A heartbeat in the future (clock skew between hosts) is never stale.
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        (now - self.last_alive_at())
            .to_std()
            .is_ok_and(|idle| idle > stale_after)
    }
}

#[cfg(test)]
#[path = "sync_run_tests.rs"]
mod tests;
