// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use chrono::{DateTime, Utc};

use ordersync_core::{ClockSource, Database, SystemClock};

use super::open_db;
use crate::error::Result;

pub fn run() -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    println!("{}", unlock(&db, SystemClock.now())?);
    Ok(())
}

/// Mark every running sync as `timeout` and describe what was released.
pub(crate) fn unlock(db: &Database, now: DateTime<Utc>) -> Result<String> {
    let held = db.running_sync_runs()?;
    if held.is_empty() {
        return Ok("No sync lock is held".to_string());
    }

    let released = db.force_unlock(now)?;
    for run in &held {
        tracing::warn!(run_id = run.id, sync_type = %run.sync_type, "released sync lock");
    }
    let ids: Vec<String> = held.iter().map(|run| run.id.to_string()).collect();
    Ok(format!(
        "Released {} sync lock(s): run {}",
        released,
        ids.join(", ")
    ))
}

#[cfg(test)]
#[path = "unlock_tests.rs"]
mod tests;
