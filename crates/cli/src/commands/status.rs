// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::fmt::Write as _;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use ordersync_core::clock::format_timestamp;
use ordersync_core::{ClockSource, Database, SyncRun, SystemClock, Watermark};

use super::open_db;
use crate::cli::OutputFormat;
use crate::colors;
use crate::config::{load_dotenv, Config};
use crate::error::Result;

/// Snapshot of the mirror's state.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub shop: Option<String>,
    /// Runs currently holding the lock, with staleness.
    pub lock: Vec<LockHolder>,
    pub watermark: Option<Watermark>,
    pub orders: i64,
    pub line_items: i64,
    pub recent_runs: Vec<SyncRun>,
}

#[derive(Debug, Serialize)]
pub struct LockHolder {
    #[serde(flatten)]
    pub run: SyncRun,
    /// No heartbeat within the staleness threshold; the next run reclaims it.
    pub stale: bool,
}

impl StatusReport {
    pub fn gather(
        db: &Database,
        config: &Config,
        now: DateTime<Utc>,
        limit: usize,
    ) -> Result<Self> {
        let lock = db
            .running_sync_runs()?
            .into_iter()
            .map(|run| LockHolder {
                stale: run.is_stale(now, config.sync.stale_after),
                run,
            })
            .collect();

        Ok(StatusReport {
            shop: config.shop_url().ok().map(|u| u.to_string()),
            lock,
            watermark: db.current_watermark()?,
            orders: db.count_orders()?,
            line_items: db.count_line_items()?,
            recent_runs: db.recent_sync_runs(limit)?,
        })
    }

    pub fn render_text(&self, stale_after: Duration) -> String {
        let mut out = String::new();
        let shop = self.shop.as_deref().unwrap_or("(not configured)");
        let _ = writeln!(out, "Shop: {shop}");

        if self.lock.is_empty() {
            let _ = writeln!(out, "Lock: free");
        }
        for holder in &self.lock {
            let run = &holder.run;
            let _ = write!(
                out,
                "Lock: held by run {} ({}) since {}, last heartbeat {}",
                run.id,
                run.sync_type,
                format_timestamp(run.started_at),
                format_timestamp(run.last_alive_at())
            );
            if holder.stale {
                let _ = write!(
                    out,
                    " [stale: no heartbeat for over {}]",
                    humantime::format_duration(stale_after)
                );
            }
            out.push('\n');
        }

        match &self.watermark {
            Some(w) => {
                let _ = writeln!(out, "Watermark: {w}");
            }
            None => {
                let _ = writeln!(out, "Watermark: none (next incremental sync starts from the origin)");
            }
        }
        let _ = writeln!(out, "Orders: {}", self.orders);
        let _ = writeln!(out, "Line items: {}", self.line_items);

        if !self.recent_runs.is_empty() {
            let _ = writeln!(out, "\n{}", heading("Recent runs:"));
            for run in &self.recent_runs {
                let _ = writeln!(out, "  {}", run_line(run));
            }
        }
        out.trim_end().to_string()
    }
}

fn heading(text: &str) -> String {
    if colors::should_colorize() {
        colors::header(text)
    } else {
        text.to_string()
    }
}

fn run_line(run: &SyncRun) -> String {
    let mut line = format!(
        "#{} {} {} started {}",
        run.id,
        run.sync_type,
        run.status,
        format_timestamp(run.started_at)
    );
    let _ = write!(line, ", {} fetched", run.records_fetched);
    if let Some(at) = run.last_order_date {
        let _ = write!(line, ", last order {}", format_timestamp(at));
    }
    if let Some(message) = &run.error_message {
        let _ = write!(line, " ({message})");
    }
    line
}

pub fn run(limit: usize, output: OutputFormat) -> Result<()> {
    let (db, config, work_dir) = open_db()?;
    load_dotenv(&work_dir)?;
    let report = StatusReport::gather(&db, &config, SystemClock.now(), limit)?;

    match output {
        OutputFormat::Text => println!("{}", report.render_text(config.sync.stale_after)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
