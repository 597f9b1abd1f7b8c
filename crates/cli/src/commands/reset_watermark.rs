// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ordersync_core::Database;

use super::open_db;
use crate::error::Result;

pub fn run() -> Result<()> {
    let (db, _config, _work_dir) = open_db()?;
    println!("{}", reset(&db)?);
    Ok(())
}

/// Clear the watermark and describe the result.
pub(crate) fn reset(db: &Database) -> Result<String> {
    let previous = db.current_watermark()?;
    let cleared = db.clear_watermark()?;

    if !db.running_sync_runs()?.is_empty() {
        eprintln!("warning: a sync is running; it will record a new watermark when it completes");
    }

    Ok(match previous {
        Some(watermark) => {
            tracing::info!(%watermark, runs = cleared, "watermark cleared");
            format!("Cleared watermark {watermark}; the next incremental sync starts from the origin")
        }
        None => "No watermark to clear".to_string(),
    })
}

#[cfg(test)]
#[path = "reset_watermark_tests.rs"]
mod tests;
