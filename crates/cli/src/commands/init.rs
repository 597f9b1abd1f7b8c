// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use ordersync_core::Database;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(shop: Option<String>, path: Option<PathBuf>) -> Result<()> {
    let target_path = match path {
        Some(p) => p,
        None => std::env::current_dir()?,
    };

    let work_dir = init_work_dir(&target_path, shop.as_deref())?;
    let config = Config::load(&work_dir)?;
    let db_path = get_db_path(&work_dir, &config);
    Database::open(&db_path)?;

    println!("Initialized order mirror at {}", work_dir.display());
    match &config.shop.url {
        Some(url) => println!("Shop: {url}"),
        None => println!("Shop: not set (add [shop].url to config.toml or export ORDERSYNC_SHOP_URL)"),
    }
    println!("Credentials: export ORDERSYNC_CLIENT_ID and ORDERSYNC_CLIENT_SECRET, or put them in .env");

    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
