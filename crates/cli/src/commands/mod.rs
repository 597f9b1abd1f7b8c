// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod init;
pub mod reset_watermark;
pub mod runtime;
pub mod status;
pub mod sync;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;
pub mod unlock;
pub mod watch;

use std::path::PathBuf;

use ordersync_core::Database;

use crate::config::{find_work_dir, get_db_path, Config};
use crate::error::Result;

/// Helper to open the database from the current context.
pub fn open_db() -> Result<(Database, Config, PathBuf)> {
    let work_dir = find_work_dir()?;
    let config = Config::load(&work_dir)?;
    let db_path = get_db_path(&work_dir, &config);
    let db = crate::time_phase!("db::open", { Database::open(&db_path)? });
    Ok((db, config, work_dir))
}
