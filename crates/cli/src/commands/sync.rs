// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use ordersync_core::clock::format_timestamp;
use ordersync_core::SyncType;

use super::open_db;
use super::runtime::Runtime;
use crate::cli::OutputFormat;
use crate::error::Result;
use crate::interrupt::Interrupt;
use crate::sync::{RunOutcome, RunSummary};

pub fn run(reconcile: bool, output: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    let runtime = Runtime::prepare(&work_dir, &config, Interrupt::install()?)?;

    let sync_type = if reconcile {
        SyncType::Reconciliation
    } else {
        SyncType::Incremental
    };
    let outcome = runtime.run(&db, sync_type)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    report(&mut out, outcome, output)
}

/// Print the outcome of a run.
///
/// Contention is not an error. A failed run prints its partial summary, then
/// returns the error that stopped it.
pub(crate) fn report(out: &mut impl Write, outcome: RunOutcome, output: OutputFormat) -> Result<()> {
    match outcome {
        RunOutcome::Contended { run_id, started_at } => {
            eprintln!(
                "another sync is running (run {}, started {}); nothing to do",
                run_id,
                format_timestamp(started_at)
            );
            Ok(())
        }
        RunOutcome::Finished(summary) => {
            write_summary(out, &summary, output)?;
            Ok(())
        }
        RunOutcome::Failed { summary, error } => {
            write_summary(out, &summary, output)?;
            Err(error)
        }
    }
}

fn write_summary(out: &mut impl Write, summary: &RunSummary, output: OutputFormat) -> Result<()> {
    match output {
        OutputFormat::Text => writeln!(out, "{summary}")?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
    }
    Ok(())
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
