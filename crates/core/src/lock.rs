// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Advisory sync lock over `sync_history`.
//!
//! A run holds the lock while its row is `running`. Acquisition inspects the
//! running rows and inserts the new one inside a single `BEGIN IMMEDIATE`
//! transaction, so two processes sharing the database file cannot both pass
//! the check. A running row whose lease (heartbeat, else start time) is older
//! than the staleness threshold belonged to a killed process and is
//! reclassified as `timeout`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rusqlite::{params, Transaction, TransactionBehavior};

use crate::clock::format_timestamp;
use crate::db::{sync_run_from_row, Database, SYNC_RUN_COLUMNS};
use crate::error::{Error, Result};
use crate::sync_run::{SyncStatus, SyncType};

/// Idle time after which a running row is considered abandoned.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(2 * 60 * 60);

/// A successfully acquired lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockAcquired {
    /// The new sync run's row ID.
    pub run_id: i64,
    /// Stale runs reclassified as `timeout` during acquisition.
    pub reclaimed: Vec<i64>,
}

/// Error message recorded on a run stopped by Ctrl-C.
pub const INTERRUPTED_MESSAGE: &str = "interrupted by operator";

/// Final state written when a run releases the lock.
#[derive(Debug, Clone, PartialEq)]
pub struct RunFinish {
    pub status: SyncStatus,
    pub records_fetched: i64,
    pub last_order_date: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
}

impl RunFinish {
    pub fn completed(records_fetched: i64, last_order_date: Option<DateTime<Utc>>) -> Self {
        RunFinish {
            status: SyncStatus::Completed,
            records_fetched,
            last_order_date,
            error_message: None,
        }
    }

    pub fn failed(
        records_fetched: i64,
        last_order_date: Option<DateTime<Utc>>,
        message: impl Into<String>,
    ) -> Self {
        RunFinish {
            status: SyncStatus::Failed,
            records_fetched,
            last_order_date,
            error_message: Some(message.into()),
        }
    }

    /// A failed finish recording an operator interrupt.
    pub fn interrupted(records_fetched: i64, last_order_date: Option<DateTime<Utc>>) -> Self {
        Self::failed(records_fetched, last_order_date, INTERRUPTED_MESSAGE)
    }
}

impl Database {
    /// Acquire the sync lock by inserting a new `running` row.
    ///
    /// Fails with [`Error::LockContention`] when a live run holds the lock.
    pub fn acquire_sync_lock(
        &self,
        sync_type: SyncType,
        now: DateTime<Utc>,
        stale_after: Duration,
    ) -> Result<LockAcquired> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;

        let running = {
            let sql = format!(
                "SELECT {SYNC_RUN_COLUMNS} FROM sync_history WHERE status = ?1 ORDER BY id"
            );
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt
                .query_map(params![SyncStatus::Running.as_str()], sync_run_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        if let Some(live) = running.iter().find(|run| !run.is_stale(now, stale_after)) {
            return Err(Error::LockContention {
                run_id: live.id,
                started_at: live.started_at,
            });
        }

        let mut reclaimed = Vec::with_capacity(running.len());
        for run in &running {
            let message = format!(
                "abandoned: no heartbeat since {}",
                format_timestamp(run.last_alive_at())
            );
            tx.execute(
                "UPDATE sync_history SET status = ?1, sync_completed_at = ?2, error_message = ?3
                 WHERE id = ?4",
                params![
                    SyncStatus::Timeout.as_str(),
                    format_timestamp(now),
                    message,
                    run.id
                ],
            )?;
            tracing::warn!(run_id = run.id, started_at = %run.started_at, "reclaimed stale sync lock");
            reclaimed.push(run.id);
        }

        let stamp = format_timestamp(now);
        tx.execute(
            "INSERT INTO sync_history (sync_type, sync_started_at, heartbeat_at, records_fetched, status)
             VALUES (?1, ?2, ?2, 0, ?3)",
            params![sync_type.as_str(), stamp, SyncStatus::Running.as_str()],
        )?;
        let run_id = tx.last_insert_rowid();
        tx.commit()?;

        tracing::debug!(run_id, %sync_type, "acquired sync lock");
        Ok(LockAcquired { run_id, reclaimed })
    }

    /// Record progress of a running sync and renew its lease.
    ///
    /// Returns false if the row is no longer running (its lease was reclaimed).
    pub fn checkpoint_sync_run(
        &self,
        run_id: i64,
        records_fetched: i64,
        last_order_date: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE sync_history
             SET records_fetched = ?1,
                 last_order_date = COALESCE(?2, last_order_date),
                 heartbeat_at = ?3
             WHERE id = ?4 AND status = ?5",
            params![
                records_fetched,
                last_order_date.map(format_timestamp),
                format_timestamp(now),
                run_id,
                SyncStatus::Running.as_str()
            ],
        )?;
        Ok(affected > 0)
    }

    /// Release the lock, writing the run's final state.
    ///
    /// Only a row still `running` is updated. Returns false (and leaves the row
    /// alone) when another run already reclaimed it.
    pub fn release_sync_lock(
        &self,
        run_id: i64,
        finish: &RunFinish,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        if !finish.status.is_terminal() {
            return Err(Error::InvalidSyncStatus(finish.status.to_string()));
        }

        let affected = self.conn.execute(
            "UPDATE sync_history
             SET status = ?1, sync_completed_at = ?2, records_fetched = ?3,
                 last_order_date = ?4, error_message = ?5
             WHERE id = ?6 AND status = ?7",
            params![
                finish.status.as_str(),
                format_timestamp(now),
                finish.records_fetched,
                finish.last_order_date.map(format_timestamp),
                finish.error_message,
                run_id,
                SyncStatus::Running.as_str()
            ],
        )?;

        if affected == 0 {
            if !self.sync_run_exists(run_id)? {
                return Err(Error::SyncRunNotFound(run_id));
            }
            tracing::warn!(run_id, status = %finish.status, "sync run was reclaimed before release");
            return Ok(false);
        }
        Ok(true)
    }

    /// Reclassify every running row as `timeout`, regardless of staleness.
    ///
    /// Returns the number of rows released.
    pub fn force_unlock(&self, now: DateTime<Utc>) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE sync_history
             SET status = ?1, sync_completed_at = ?2, error_message = 'released by operator'
             WHERE status = ?3",
            params![
                SyncStatus::Timeout.as_str(),
                format_timestamp(now),
                SyncStatus::Running.as_str()
            ],
        )?;
        Ok(affected)
    }

    fn sync_run_exists(&self, run_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sync_history WHERE id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
#[path = "lock_tests.rs"]
mod tests;
