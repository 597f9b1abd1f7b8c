// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync orchestrator.
//!
//! One run walks this state machine:
//!
//! ```text
//! LOCK_CHECK ──contended──► END (not a failure)
//!     │
//!   TOKEN ──auth error──► FINALIZE(failed)
//!     │
//!   PAGE_LOOP { FETCH ─► WRITE ─► CHECKPOINT ─► next link? }
//!     │
//!   FINALIZE(completed | failed) ─► END
//! ```
//!
//! Errors inside the page loop never escape as errors: the lock is released
//! as `failed` with the message recorded, and the caller gets
//! [`RunOutcome::Failed`] with the partial summary.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use url::Url;

use ordersync_core::{ClockSource, Database, RunFinish, SyncType, WatermarkTracker};

use super::summary::RunSummary;
use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::remote::{
    fetch_token, OrdersQuery, PageFetcher, QueryStart, RetryPolicy, ShopEndpoint, Sleeper,
    Transport,
};
use crate::time_phase;

pub use ordersync_core::INTERRUPTED_MESSAGE;

/// Error message recorded when a run unwinds without finalizing.
const ABORTED_MESSAGE: &str = "aborted before finalize";

/// Per-run knobs taken from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub page_limit: u32,
    pub order_status: String,
    pub stale_after: Duration,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        RunSettings {
            page_limit: config.shop.page_limit,
            order_status: config.shop.order_status.clone(),
            stale_after: config.sync.stale_after,
        }
    }

    fn query(&self, start: QueryStart) -> OrdersQuery {
        OrdersQuery {
            limit: self.page_limit,
            status: self.order_status.clone(),
            start,
        }
    }
}

/// Everything one sync run needs, built once per invocation.
pub struct RunContext<'a> {
    pub db: &'a Database,
    pub transport: &'a dyn Transport,
    pub sleeper: &'a dyn Sleeper,
    pub clock: &'a dyn ClockSource,
    pub interrupt: &'a Interrupt,
    pub endpoint: &'a ShopEndpoint,
    pub credentials: &'a Credentials,
    pub policy: &'a RetryPolicy,
    pub settings: &'a RunSettings,
}

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// Another live run holds the lock; nothing was done.
    Contended {
        run_id: i64,
        started_at: DateTime<Utc>,
    },
    /// Walked the stream to its end.
    Finished(RunSummary),
    /// Stopped early; the lock was released as `failed`.
    Failed { summary: RunSummary, error: Error },
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::Contended { .. } => None,
            RunOutcome::Finished(summary) | RunOutcome::Failed { summary, .. } => Some(summary),
        }
    }
}

/// Releases the lock as `failed` if the run unwinds before finalizing.
struct LockGuard<'a> {
    db: &'a Database,
    clock: &'a dyn ClockSource,
    run_id: i64,
    released: bool,
}

impl<'a> LockGuard<'a> {
    fn new(db: &'a Database, clock: &'a dyn ClockSource, run_id: i64) -> Self {
        LockGuard {
            db,
            clock,
            run_id,
            released: false,
        }
    }

    fn release(&mut self, finish: &RunFinish) -> Result<bool> {
        self.released = true;
        Ok(self
            .db
            .release_sync_lock(self.run_id, finish, self.clock.now())?)
    }
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let finish = RunFinish::failed(0, None, ABORTED_MESSAGE);
        if let Err(e) = self
            .db
            .release_sync_lock(self.run_id, &finish, self.clock.now())
        {
            tracing::error!(run_id = self.run_id, error = %e, "failed to release sync lock");
        }
    }
}

/// Running state of the page loop.
struct Progress {
    summary: RunSummary,
    tracker: WatermarkTracker,
}

/// Run one sync of the given type.
///
/// Only store failures around the lock itself are returned as errors.
pub fn run_sync(ctx: &RunContext<'_>, sync_type: SyncType) -> Result<RunOutcome> {
    let started = Instant::now();

    let acquired =
        match ctx
            .db
            .acquire_sync_lock(sync_type, ctx.clock.now(), ctx.settings.stale_after)
        {
            Ok(acquired) => acquired,
            Err(ordersync_core::Error::LockContention { run_id, started_at }) => {
                tracing::info!(run_id, %started_at, "another sync is running, skipping");
                return Ok(RunOutcome::Contended { run_id, started_at });
            }
            Err(e) => return Err(e.into()),
        };
    let run_id = acquired.run_id;
    let mut guard = LockGuard::new(ctx.db, ctx.clock, run_id);
    tracing::info!(run_id, %sync_type, reclaimed = ?acquired.reclaimed, "sync started");

    let watermark = ctx.db.current_watermark()?;
    let (start, floor) = match sync_type {
        SyncType::Incremental => (QueryStart::Since(watermark), watermark),
        SyncType::Reconciliation => (QueryStart::Origin, None),
    };
    if let Some(w) = watermark {
        tracing::debug!(run_id, watermark = %w, "current watermark");
    }

    let mut progress = Progress {
        summary: RunSummary::new(run_id, sync_type),
        tracker: WatermarkTracker::new(floor),
    };
    let result = walk_pages(ctx, run_id, start, &mut progress);

    let records = progress.summary.records_fetched();
    let last_order_date = progress.tracker.current();
    let finish = match &result {
        Ok(()) => RunFinish::completed(records, last_order_date),
        Err(Error::Interrupted) => RunFinish::interrupted(records, last_order_date),
        Err(e) => RunFinish::failed(records, last_order_date, e.to_string()),
    };
    guard.release(&finish)?;

    let mut summary = progress.summary;
    summary.status = finish.status;
    summary.last_order_date = last_order_date;
    summary.error = finish.error_message;
    summary.elapsed = started.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                run_id,
                fetched = summary.fetched,
                saved = summary.saved,
                skipped = summary.skipped.len(),
                "sync completed"
            );
            Ok(RunOutcome::Finished(summary))
        }
        Err(error) => {
            tracing::error!(run_id, error = %error, fetched = summary.fetched, "sync failed");
            Ok(RunOutcome::Failed { summary, error })
        }
    }
}

fn walk_pages(
    ctx: &RunContext<'_>,
    run_id: i64,
    start: QueryStart,
    progress: &mut Progress,
) -> Result<()> {
    ctx.interrupt.check()?;
    let token = time_phase!("sync::token", {
        fetch_token(ctx.transport, ctx.endpoint, ctx.credentials)
    })?;
    tracing::info!(run_id, "obtained access token");

    let fetcher = PageFetcher::new(ctx.transport, ctx.sleeper, ctx.policy, token);
    let mut next: Option<Url> = Some(ctx.settings.query(start).first_page(ctx.endpoint)?);

    while let Some(url) = next.take() {
        ctx.interrupt.check()?;

        let page = time_phase!("sync::fetch_page", { fetcher.fetch(&url) })?;
        let fetched = page.orders.len();
        tracing::info!(
            run_id,
            page = progress.summary.pages + 1,
            orders = fetched,
            "fetched page"
        );
        if fetched == 0 {
            break;
        }

        let write = time_phase!("sync::write_page", {
            ctx.db.write_page(&page.orders, ctx.clock.now())
        })?;
        progress.tracker.observe(write.max_created_at);
        tracing::info!(
            run_id,
            saved = write.orders_saved,
            skipped = write.skipped.len(),
            line_items = write.line_items_saved,
            "wrote page"
        );
        progress.summary.add_page(fetched, write);

        let alive = ctx.db.checkpoint_sync_run(
            run_id,
            progress.summary.records_fetched(),
            progress.tracker.current(),
            ctx.clock.now(),
        )?;
        if !alive {
            tracing::warn!(run_id, "sync lock was reclaimed by another run, continuing");
        }

        next = page.next;
    }

    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
