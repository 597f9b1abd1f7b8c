// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ordersync-core: storage engine for the ordersync order mirror.
//!
//! This crate owns everything that touches the local SQLite store: the order
//! and sync-run data model, the idempotent upsert writer, the advisory sync
//! lock, and the watermark derived from sync history. It has no network code;
//! the `ordersync` crate drives it from the remote order API.

pub mod attribution;
pub mod clock;
pub mod db;
pub mod error;
pub mod lock;
pub mod order;
pub mod sync_run;
pub mod upsert;
pub mod watermark;

pub use attribution::Attribution;
pub use clock::{ClockSource, FixedClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use lock::{LockAcquired, RunFinish, DEFAULT_STALE_AFTER, INTERRUPTED_MESSAGE};
pub use order::{LineItem, Order, RemoteLineItem, RemoteOrder};
pub use sync_run::{SyncRun, SyncStatus, SyncType};
pub use upsert::{PageWrite, SkippedOrder, WrittenOrder};
pub use watermark::{Watermark, WatermarkTracker};
