// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 7, 1, h, m, 0).unwrap()
}

fn running_run(started_at: DateTime<Utc>, heartbeat_at: Option<DateTime<Utc>>) -> SyncRun {
    SyncRun {
        id: 1,
        sync_type: SyncType::Incremental,
        started_at,
        completed_at: None,
        heartbeat_at,
        records_fetched: 0,
        last_order_date: None,
        status: SyncStatus::Running,
        error_message: None,
    }
}

#[parameterized(
    running = { SyncStatus::Running, "running" },
    completed = { SyncStatus::Completed, "completed" },
    failed = { SyncStatus::Failed, "failed" },
    timeout = { SyncStatus::Timeout, "timeout" },
)]
fn status_round_trips_through_storage_form(status: SyncStatus, text: &str) {
    assert_eq!(status.as_str(), text);
    assert_eq!(status.to_string(), text);
    assert_eq!(text.parse::<SyncStatus>().unwrap(), status);
}

#[test]
fn status_parse_is_case_insensitive() {
    assert_eq!("Completed".parse::<SyncStatus>().unwrap(), SyncStatus::Completed);
}

#[test]
fn status_parse_rejects_unknown() {
    let err = "paused".parse::<SyncStatus>().unwrap_err();
    assert!(matches!(err, Error::InvalidSyncStatus(s) if s == "paused"));
}

#[test]
fn only_running_is_non_terminal() {
    assert!(!SyncStatus::Running.is_terminal());
    assert!(SyncStatus::Completed.is_terminal());
    assert!(SyncStatus::Failed.is_terminal());
    assert!(SyncStatus::Timeout.is_terminal());
}

#[parameterized(
    incremental = { SyncType::Incremental, "incremental" },
    reconciliation = { SyncType::Reconciliation, "reconciliation" },
)]
fn sync_type_storage_form(sync_type: SyncType, text: &str) {
    assert_eq!(sync_type.as_str(), text);
    assert_eq!(text.parse::<SyncType>().unwrap(), sync_type);
}

#[test]
fn sync_type_parse_rejects_unknown() {
    assert!("hourly_update".parse::<SyncType>().is_err());
}

#[test]
fn staleness_measured_from_start_without_heartbeat() {
    let run = running_run(t(8, 0), None);
    let threshold = Duration::from_secs(2 * 60 * 60);

    assert!(!run.is_stale(t(9, 59), threshold));
    assert!(!run.is_stale(t(10, 0), threshold));
    assert!(run.is_stale(t(10, 1), threshold));
}

#[test]
fn heartbeat_renews_the_lease() {
    let run = running_run(t(8, 0), Some(t(11, 0)));
    let threshold = Duration::from_secs(2 * 60 * 60);

    assert_eq!(run.last_alive_at(), t(11, 0));
    assert!(!run.is_stale(t(12, 30), threshold));
    assert!(run.is_stale(t(13, 1), threshold));
}

#[test]
fn future_heartbeat_is_not_stale() {
    let run = running_run(t(12, 0), None);
    assert!(!run.is_stale(t(8, 0), Duration::from_secs(1)));
}
