// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use tempfile::TempDir;

fn t(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 8, 1, h, m, 0).unwrap()
}

#[test]
fn acquire_creates_running_row() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    assert!(lock.reclaimed.is_empty());
    let run = db.get_sync_run(lock.run_id).unwrap();
    assert_eq!(run.status, SyncStatus::Running);
    assert_eq!(run.sync_type, SyncType::Incremental);
    assert_eq!(run.started_at, t(9, 0));
    assert_eq!(run.heartbeat_at, Some(t(9, 0)));
    assert_eq!(run.records_fetched, 0);
}

#[test]
fn second_acquire_is_contended() {
    let db = Database::open_in_memory().unwrap();
    let first = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    let err = db
        .acquire_sync_lock(SyncType::Reconciliation, t(9, 30), DEFAULT_STALE_AFTER)
        .unwrap_err();

    match err {
        Error::LockContention { run_id, started_at } => {
            assert_eq!(run_id, first.run_id);
            assert_eq!(started_at, t(9, 0));
        }
        other => unreachable!("unexpected error: {other}"),
    }
    assert_eq!(db.recent_sync_runs(10).unwrap().len(), 1);
}

#[test]
fn stale_run_is_reclaimed() {
    let db = Database::open_in_memory().unwrap();
    let abandoned = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    let next = db
        .acquire_sync_lock(SyncType::Incremental, t(11, 1), DEFAULT_STALE_AFTER)
        .unwrap();

    assert_eq!(next.reclaimed, vec![abandoned.run_id]);
    let old = db.get_sync_run(abandoned.run_id).unwrap();
    assert_eq!(old.status, SyncStatus::Timeout);
    assert_eq!(old.completed_at, Some(t(11, 1)));
    assert!(old.error_message.unwrap().contains("no heartbeat"));
    assert_eq!(db.running_sync_runs().unwrap().len(), 1);
}

#[test]
fn checkpoint_renews_lease() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Reconciliation, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    assert!(db
        .checkpoint_sync_run(lock.run_id, 500, Some(t(1, 0)), t(10, 30))
        .unwrap());

    // 2h31m after start but only 1h after the heartbeat.
    let err = db
        .acquire_sync_lock(SyncType::Incremental, t(11, 31), DEFAULT_STALE_AFTER)
        .unwrap_err();
    assert!(matches!(err, Error::LockContention { .. }));

    let run = db.get_sync_run(lock.run_id).unwrap();
    assert_eq!(run.records_fetched, 500);
    assert_eq!(run.last_order_date, Some(t(1, 0)));
    assert_eq!(run.heartbeat_at, Some(t(10, 30)));
}

#[test]
fn checkpoint_without_date_keeps_previous() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();
    db.checkpoint_sync_run(lock.run_id, 10, Some(t(2, 0)), t(9, 5))
        .unwrap();
    db.checkpoint_sync_run(lock.run_id, 10, None, t(9, 10)).unwrap();

    let run = db.get_sync_run(lock.run_id).unwrap();
    assert_eq!(run.last_order_date, Some(t(2, 0)));
}

#[test]
fn release_records_final_state() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    let released = db
        .release_sync_lock(lock.run_id, &RunFinish::completed(3, Some(t(8, 0))), t(9, 2))
        .unwrap();

    assert!(released);
    let run = db.get_sync_run(lock.run_id).unwrap();
    assert_eq!(run.status, SyncStatus::Completed);
    assert_eq!(run.completed_at, Some(t(9, 2)));
    assert_eq!(run.records_fetched, 3);
    assert_eq!(run.last_order_date, Some(t(8, 0)));
    assert_eq!(run.error_message, None);

    db.acquire_sync_lock(SyncType::Incremental, t(9, 3), DEFAULT_STALE_AFTER)
        .unwrap();
}

#[test]
fn release_after_reclaim_is_ignored() {
    let db = Database::open_in_memory().unwrap();
    let slow = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();
    db.acquire_sync_lock(SyncType::Incremental, t(12, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    let released = db
        .release_sync_lock(slow.run_id, &RunFinish::completed(1, None), t(12, 5))
        .unwrap();

    assert!(!released);
    assert_eq!(
        db.get_sync_run(slow.run_id).unwrap().status,
        SyncStatus::Timeout
    );
}

#[test]
fn release_unknown_run_fails() {
    let db = Database::open_in_memory().unwrap();
    let err = db
        .release_sync_lock(99, &RunFinish::failed(0, None, "boom"), t(9, 0))
        .unwrap_err();
    assert!(matches!(err, Error::SyncRunNotFound(99)));
}

#[test]
fn release_as_running_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();
    let finish = RunFinish {
        status: SyncStatus::Running,
        records_fetched: 0,
        last_order_date: None,
        error_message: None,
    };
    assert!(db.release_sync_lock(lock.run_id, &finish, t(9, 1)).is_err());
}

#[test]
fn force_unlock_releases_live_runs() {
    let db = Database::open_in_memory().unwrap();
    let lock = db
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();

    assert_eq!(db.force_unlock(t(9, 1)).unwrap(), 1);
    assert_eq!(db.force_unlock(t(9, 2)).unwrap(), 0);

    let run = db.get_sync_run(lock.run_id).unwrap();
    assert_eq!(run.status, SyncStatus::Timeout);
    assert_eq!(run.error_message.as_deref(), Some("released by operator"));
    db.acquire_sync_lock(SyncType::Incremental, t(9, 3), DEFAULT_STALE_AFTER)
        .unwrap();
}

#[test]
fn lock_is_exclusive_across_connections() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orders.db");
    let a = Database::open(&path).unwrap();
    let b = Database::open(&path).unwrap();

    let held = a
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap();
    let err = b
        .acquire_sync_lock(SyncType::Incremental, t(9, 0), DEFAULT_STALE_AFTER)
        .unwrap_err();
    assert!(matches!(err, Error::LockContention { run_id, .. } if run_id == held.run_id));

    a.release_sync_lock(held.run_id, &RunFinish::completed(0, None), t(9, 1))
        .unwrap();
    b.acquire_sync_lock(SyncType::Incremental, t(9, 2), DEFAULT_STALE_AFTER)
        .unwrap();
}
