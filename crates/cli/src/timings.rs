// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Phase timing for sync runs.
//!
//! Every timed phase emits a `debug` event on the `ordersync::timings`
//! target, so `ORDERSYNC_LOG=ordersync::timings=debug` captures them in the
//! log. Setting `ORDERSYNC_TIMINGS` also prints them to stderr as
//! `[timings] sync::fetch_page 412ms`, which works without a log file.

use std::time::{Duration, Instant};

/// Check if stderr timings are enabled via `ORDERSYNC_TIMINGS`.
#[inline]
pub fn timings_enabled() -> bool {
    crate::env::timings()
}

/// One line of stderr timing output.
pub fn format_timing(phase: &str, elapsed: Duration) -> String {
    format!("[timings] {} {}ms", phase, elapsed.as_millis())
}

/// Report how long `phase` took since `start`.
pub fn record(phase: &str, start: Instant) -> Duration {
    let elapsed = start.elapsed();
    tracing::debug!(
        target: "ordersync::timings",
        phase,
        elapsed_ms = elapsed.as_millis() as u64,
        "phase finished"
    );
    if timings_enabled() {
        eprintln!("{}", format_timing(phase, elapsed));
    }
    elapsed
}

/// Time a block, reporting it under `phase`. Evaluates to the block's value.
///
/// ```rust,ignore
/// let page = time_phase!("sync::fetch_page", { fetcher.fetch(&url) })?;
/// ```
#[macro_export]
macro_rules! time_phase {
    ($phase:expr, $block:expr) => {{
        let __start = std::time::Instant::now();
        let __result = $block;
        $crate::timings::record($phase, __start);
        __result
    }};
}

#[cfg(test)]
#[path = "timings_tests.rs"]
mod tests;
