// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Run summary reported at the end of every sync, successful or not.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ordersync_core::clock::format_timestamp;
use ordersync_core::{PageWrite, SkippedOrder, SyncStatus, SyncType};

/// Counts and outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub run_id: i64,
    pub sync_type: SyncType,
    pub status: SyncStatus,
    pub pages: usize,
    /// Orders received from the API.
    pub fetched: usize,
    /// Orders written to the store.
    pub saved: usize,
    pub line_items: usize,
    pub skipped: Vec<SkippedOrder>,
    pub last_order_date: Option<DateTime<Utc>>,
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    pub fn new(run_id: i64, sync_type: SyncType) -> Self {
        RunSummary {
            run_id,
            sync_type,
            status: SyncStatus::Running,
            pages: 0,
            fetched: 0,
            saved: 0,
            line_items: 0,
            skipped: Vec::new(),
            last_order_date: None,
            elapsed: Duration::ZERO,
            error: None,
        }
    }

    /// Fold one committed page into the totals.
    pub fn add_page(&mut self, fetched: usize, write: PageWrite) {
        self.pages += 1;
        self.fetched += fetched;
        self.saved += write.orders_saved;
        self.line_items += write.line_items_saved;
        self.skipped.extend(write.skipped);
    }

    pub fn records_fetched(&self) -> i64 {
        i64::try_from(self.fetched).unwrap_or(i64::MAX)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Whole milliseconds keep the line readable.
        let elapsed = Duration::from_millis(u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX));
        writeln!(
            f,
            "{} sync {} (run {}) in {}",
            self.sync_type,
            self.status,
            self.run_id,
            humantime::format_duration(elapsed)
        )?;
        write!(
            f,
            "  pages: {}, fetched: {}, saved: {}, skipped: {}, line items: {}",
            self.pages,
            self.fetched,
            self.saved,
            self.skipped.len(),
            self.line_items
        )?;
        if let Some(at) = self.last_order_date {
            write!(f, "\n  last order date: {}", format_timestamp(at))?;
        }
        for skipped in &self.skipped {
            match skipped.order_id {
                Some(id) => write!(f, "\n  skipped order {}: {}", id, skipped.reason)?,
                None => write!(f, "\n  skipped order without id: {}", skipped.reason)?,
            }
        }
        if let Some(error) = &self.error {
            write!(f, "\n  error: {error}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "summary_tests.rs"]
mod tests;
