// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordersync - mirror a shop's paginated order API into a local SQLite store.
//!
//! This crate provides the command-line side of the mirror: configuration,
//! the HTTP client for the order API, the sync orchestrator, and the
//! `ordersync` commands. Storage lives in [`ordersync_core`].
//!
//! # Main Components
//!
//! - [`Config`] - Project configuration (`.ordersync/config.toml`)
//! - [`remote`] - Token exchange, page fetching and retry policy
//! - [`sync`] - The run orchestrator shared by one-shot and polling syncs
//! - [`Error`] - Error types for all operations
//!
//! # Running a sync from code
//!
//! ```rust,ignore
//! use clap::Parser;
//! use ordersync::Cli;
//!
//! let cli = Cli::parse_from(["ordersync", "sync", "--reconcile"]);
//! ordersync::run(cli)?;
//! ```

mod cli;
pub mod colors;
mod commands;
pub mod env;
pub mod interrupt;
pub mod logging;
pub mod timings;

pub mod config;
pub mod error;
pub mod remote;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, get_db_path, init_work_dir, Config};
pub use error::{Error, Result};

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process execution.
pub fn run(cli: Cli) -> Result<()> {
    if let Some(dir) = &cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            Error::Config(format!("cannot change to directory {}: {}", dir.display(), e))
        })?;
    }
    logging::init(cli.log_file.as_deref())?;

    match cli.command {
        Command::Init { shop, path } => commands::init::run(shop, path),
        Command::Sync { reconcile, output } => commands::sync::run(reconcile, output),
        Command::Watch { once } => commands::watch::run(once),
        Command::Status { limit, output } => commands::status::run(limit, output),
        Command::Unlock => commands::unlock::run(),
        Command::ResetWatermark => commands::reset_watermark::run(),
    }
}
