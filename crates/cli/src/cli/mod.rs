// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::colors;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "ordersync")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Mirror a shop's order history into a local SQLite database")]
#[command(
    long_about = "Mirror a shop's order history into a local SQLite database.\n\n\
    Incremental syncs resume from the last committed order date; reconciliation \
    sweeps re-walk the full history. Runs coordinate through a lock row in the \
    sync history, so a scheduled loop and a manual sweep never overlap."
)]
pub struct Cli {
    /// Run as if ordersync was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "path")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create .ordersync/ with a default config and an empty database
    #[command(after_help = colors::examples("\
Examples:
  ordersync init                                Initialize in the current directory
  ordersync init --shop example.myshopify.com   Initialize for a shop"))]
    Init {
        /// Shop host or URL
        #[arg(long)]
        shop: Option<String>,

        /// Path to initialize (defaults to current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Run one sync and print its summary
    #[command(after_help = colors::examples("\
Examples:
  ordersync sync                 Fetch orders updated since the last run
  ordersync sync --reconcile     Re-walk the full order history
  ordersync sync -o json         Print the run summary as JSON"))]
    Sync {
        /// Re-walk the full history instead of resuming from the watermark
        #[arg(long)]
        reconcile: bool,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Sync on a fixed interval, with periodic reconciliation sweeps
    #[command(after_help = colors::examples("\
Examples:
  ordersync watch                              Poll every [sync].poll_interval
  ordersync watch --log-file sync.log          Poll, logging to a file
  ordersync watch --once                       Run a single cycle and exit"))]
    Watch {
        /// Run one cycle and exit
        #[arg(long)]
        once: bool,
    },

    /// Show the lock holder, watermark, counts and recent runs
    Status {
        /// Number of recent runs to show
        #[arg(long, short = 'n', default_value_t = 10)]
        limit: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Release a lock left behind by a killed sync
    Unlock,

    /// Forget the watermark so the next incremental sync starts from the origin
    ResetWatermark,
}

#[cfg(test)]
#[path = "../cli_tests/mod.rs"]
mod tests;
