// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync runs: mirror the remote order stream into the local store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Orchestrator │────►│ PageFetcher │────►│  Order API  │
//! │  (run_sync)  │     └─────────────┘     └─────────────┘
//! └──────────────┘
//!        │ lock / write_page / checkpoint / release
//!        ▼
//! ┌──────────────┐
//! │   Database   │  (sync_history is lock, audit log and watermark)
//! └──────────────┘
//! ```
//!
//! Incremental runs resume from the watermark; reconciliation runs re-walk
//! the full history and rely on idempotent writes to heal gaps.

mod orchestrator;
mod summary;

pub use orchestrator::{
    run_sync, RunContext, RunOutcome, RunSettings, INTERRUPTED_MESSAGE,
};
pub use summary::RunSummary;
