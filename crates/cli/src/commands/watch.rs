// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Polling loop.
//!
//! Each cycle runs one sync, then sleeps `[sync].poll_interval`. A cycle is
//! a reconciliation sweep when the last sweep to reach an end started more
//! than `[sync].reconcile_every` ago (or there never was one), otherwise an
//! incremental sync. Failed runs are logged and the loop carries on; only an
//! operator interrupt ends it.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ordersync_core::{ClockSource, Database, SyncType, SystemClock};

use super::open_db;
use super::runtime::Runtime;
use crate::config::get_watch_lock_path;
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::remote::Sleeper;
use crate::sync::RunOutcome;

pub fn run(once: bool) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    let _lock = acquire_watch_lock(&get_watch_lock_path(&work_dir))?;
    let runtime = Runtime::prepare(&work_dir, &config, Interrupt::install()?)?;

    tracing::info!(
        poll_interval = %humantime::format_duration(config.sync.poll_interval),
        reconcile_every = %humantime::format_duration(config.sync.reconcile_every),
        "watch started"
    );

    loop {
        let sync_type = due_sync_type(&db, SystemClock.now(), config.sync.reconcile_every)?;
        cycle(&runtime, &db, sync_type)?;

        if once {
            return Ok(());
        }
        runtime.sleeper().sleep(config.sync.poll_interval)?;
    }
}

/// Run one sync and log how it ended.
///
/// Returns an error only for an operator interrupt.
fn cycle(runtime: &Runtime, db: &Database, sync_type: SyncType) -> Result<()> {
    log_outcome(runtime.run(db, sync_type), sync_type)?;
    runtime.interrupt().check()
}

/// Log a cycle's outcome, passing through only an interrupt.
pub(crate) fn log_outcome(outcome: Result<RunOutcome>, sync_type: SyncType) -> Result<()> {
    match outcome {
        Ok(RunOutcome::Contended { run_id, started_at }) => {
            tracing::info!(run_id, %started_at, %sync_type, "skipped cycle, another sync holds the lock");
        }
        Ok(RunOutcome::Finished(summary)) => {
            tracing::info!(
                run_id = summary.run_id,
                %sync_type,
                fetched = summary.fetched,
                saved = summary.saved,
                skipped = summary.skipped.len(),
                "cycle finished"
            );
        }
        Ok(RunOutcome::Failed { summary, error: Error::Interrupted }) => {
            tracing::warn!(
                run_id = summary.run_id,
                %sync_type,
                fetched = summary.fetched,
                saved = summary.saved,
                skipped = summary.skipped.len(),
                "cycle interrupted"
            );
            return Err(Error::Interrupted);
        }
        Ok(RunOutcome::Failed { summary, error }) => {
            tracing::error!(
                run_id = summary.run_id,
                %sync_type,
                fetched = summary.fetched,
                saved = summary.saved,
                skipped = summary.skipped.len(),
                error = %error,
                "cycle failed"
            );
        }
        Err(e) => {
            tracing::error!(%sync_type, error = %e, "cycle could not run");
        }
    }
    Ok(())
}

/// The sync type the next cycle should run.
///
/// Sweeps are timed from the start of the last one that reached an end,
/// failed or not, so a sweep that keeps failing still leaves incremental
/// cycles in between. An interrupted sweep does not count.
pub(crate) fn due_sync_type(
    db: &Database,
    now: DateTime<Utc>,
    reconcile_every: Duration,
) -> Result<SyncType> {
    let last_sweep = db
        .last_finished_run(SyncType::Reconciliation)?
        .map(|run| run.started_at);
    Ok(match last_sweep {
        Some(at) if (now - at).to_std().is_ok_and(|age| age < reconcile_every) => {
            SyncType::Incremental
        }
        // Clock skew: a sweep stamped in the future still counts as recent.
        Some(at) if at > now => SyncType::Incremental,
        _ => SyncType::Reconciliation,
    })
}

/// Hold an exclusive file lock so only one watch loop runs per project.
pub(crate) fn acquire_watch_lock(lock_path: &Path) -> Result<File> {
    use fs2::FileExt;

    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)?;

    file.try_lock_exclusive()
        .map_err(|_| Error::WatchAlreadyRunning(lock_path.display().to_string()))?;

    Ok(file)
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
