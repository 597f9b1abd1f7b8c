// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Incremental sync watermark.
//!
//! There is no watermark table: the watermark is the `last_order_date` of the
//! most recently completed sync run. A run that never completes cannot move
//! it, and every run records at least the watermark it started from, so the
//! value never decreases.

use std::fmt;

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

use crate::clock::format_timestamp;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::sync_run::SyncStatus;

/// The point in time an incremental sync resumes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Watermark(pub DateTime<Utc>);

impl Watermark {
    pub fn at(&self) -> DateTime<Utc> {
        self.0
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_timestamp(self.0))
    }
}

impl Database {
    /// The watermark of the most recently completed run, if any run recorded one.
    pub fn current_watermark(&self) -> Result<Option<Watermark>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT last_order_date FROM sync_history
                 WHERE status = ?1 AND last_order_date IS NOT NULL
                 ORDER BY sync_completed_at DESC, id DESC LIMIT 1",
                params![SyncStatus::Completed.as_str()],
                |row| row.get(0),
            )
            .optional()?;

        value
            .map(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .map(|dt| Watermark(dt.with_timezone(&Utc)))
                    .map_err(|_| {
                        Error::CorruptedData(format!(
                            "invalid timestamp '{s}' in column 'last_order_date'"
                        ))
                    })
            })
            .transpose()
    }

    /// Forget the watermark so the next incremental run starts from the origin.
    ///
    /// Returns the number of completed runs whose last order date was cleared.
    pub fn clear_watermark(&self) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE sync_history SET last_order_date = NULL
             WHERE status = ?1 AND last_order_date IS NOT NULL",
            params![SyncStatus::Completed.as_str()],
        )?;
        Ok(affected)
    }
}

/// Tracks the highest order date a run has committed.
///
/// Starts at the run's starting watermark (the floor) and only moves forward.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatermarkTracker {
    floor: Option<DateTime<Utc>>,
    highest: Option<DateTime<Utc>>,
}

impl WatermarkTracker {
    pub fn new(floor: Option<Watermark>) -> Self {
        WatermarkTracker {
            floor: floor.map(|w| w.0),
            highest: None,
        }
    }

    /// Record the highest created-at of a committed page.
    pub fn observe(&mut self, created_at: Option<DateTime<Utc>>) {
        self.highest = self.highest.max(created_at);
    }

    /// The value to record as the run's last order date.
    pub fn current(&self) -> Option<DateTime<Utc>> {
        self.floor.max(self.highest)
    }
}

#[cfg(test)]
#[path = "watermark_tests.rs"]
mod tests;
