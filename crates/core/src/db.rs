// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed store for mirrored orders and sync history.
//!
//! The [`Database`] struct owns the connection and provides the read side of
//! the store. The write paths live next to their concerns: order upserts in
//! [`crate::upsert`], lock rows in [`crate::lock`], the watermark in
//! [`crate::watermark`].

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;
use std::path::Path;

use crate::attribution::Attribution;
use crate::error::{Error, Result};
use crate::lock::INTERRUPTED_MESSAGE;
use crate::order::{LineItem, Order};
use crate::sync_run::{SyncRun, SyncStatus, SyncType};

/// SQL schema for the order mirror.
pub const SCHEMA: &str = r#"
-- Order headers. Money columns hold exact decimal text.
CREATE TABLE IF NOT EXISTS orders (
    order_id INTEGER PRIMARY KEY,
    order_number INTEGER,
    order_name TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT,
    processed_at TEXT,
    customer_id INTEGER,
    email TEXT,
    country TEXT,
    country_code TEXT,
    province TEXT,
    city TEXT,
    total_price TEXT,
    subtotal_price TEXT,
    total_tax TEXT,
    total_discounts TEXT,
    currency TEXT,
    referring_site TEXT,
    landing_site TEXT,
    source_name TEXT,
    utm_source TEXT,
    utm_medium TEXT,
    utm_campaign TEXT,
    utm_content TEXT,
    utm_term TEXT,
    financial_status TEXT,
    fulfillment_status TEXT,
    cancelled_at TEXT,
    cancel_reason TEXT,
    tags TEXT,
    note TEXT,
    discount_codes TEXT,
    gateway TEXT,
    total_shipping TEXT NOT NULL DEFAULT '0',
    checkout_id INTEGER,
    synced_at TEXT NOT NULL
);

-- Line items, replaced wholesale with each order snapshot
CREATE TABLE IF NOT EXISTS line_items (
    line_item_id INTEGER PRIMARY KEY,
    order_id INTEGER NOT NULL,
    product_id INTEGER,
    variant_id INTEGER,
    product_title TEXT,
    variant_title TEXT,
    sku TEXT,
    vendor TEXT,
    quantity INTEGER,
    price TEXT,
    total_discount TEXT,
    product_type TEXT,
    FOREIGN KEY (order_id) REFERENCES orders(order_id) ON DELETE CASCADE
);

-- Sync history: audit trail, advisory lock and watermark source
CREATE TABLE IF NOT EXISTS sync_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sync_type TEXT NOT NULL,
    sync_started_at TEXT NOT NULL,
    sync_completed_at TEXT,
    heartbeat_at TEXT,
    records_fetched INTEGER NOT NULL DEFAULT 0,
    last_order_date TEXT,
    status TEXT NOT NULL DEFAULT 'running',
    error_message TEXT
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_orders_created ON orders(created_at);
CREATE INDEX IF NOT EXISTS idx_orders_updated ON orders(updated_at);
CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders(customer_id);
CREATE INDEX IF NOT EXISTS idx_line_items_order ON line_items(order_id);
CREATE INDEX IF NOT EXISTS idx_line_items_product ON line_items(product_id);
CREATE INDEX IF NOT EXISTS idx_sync_history_status ON sync_history(status);
"#;

pub(crate) const ORDER_COLUMNS: &str = "order_id, order_number, order_name, created_at, updated_at,
    processed_at, customer_id, email, country, country_code, province, city,
    total_price, subtotal_price, total_tax, total_discounts, currency,
    referring_site, landing_site, source_name, utm_source, utm_medium,
    utm_campaign, utm_content, utm_term, financial_status, fulfillment_status,
    cancelled_at, cancel_reason, tags, note, discount_codes, gateway,
    total_shipping, checkout_id, synced_at";

pub(crate) const LINE_ITEM_COLUMNS: &str = "line_item_id, order_id, product_id, variant_id,
    product_title, variant_title, sku, vendor, quantity, price, total_discount,
    product_type";

pub(crate) const SYNC_RUN_COLUMNS: &str = "id, sync_type, sync_started_at, sync_completed_at,
    heartbeat_at, records_fetched, last_order_date, status, error_message";

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

fn parse_timestamp_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<DateTime<Utc>>, rusqlite::Error> {
    value.map(|s| parse_timestamp(&s, column)).transpose()
}

fn parse_decimal_opt(
    value: Option<String>,
    column: &str,
) -> std::result::Result<Option<Decimal>, rusqlite::Error> {
    value.map(|s| parse_db(&s, column)).transpose()
}

/// Maps a row selected with [`ORDER_COLUMNS`].
pub(crate) fn order_from_row(row: &Row<'_>) -> std::result::Result<Order, rusqlite::Error> {
    let created_str: String = row.get(3)?;
    let shipping_str: String = row.get(33)?;
    let synced_str: String = row.get(35)?;

    Ok(Order {
        order_id: row.get(0)?,
        order_number: row.get(1)?,
        order_name: row.get(2)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp_opt(row.get(4)?, "updated_at")?,
        processed_at: parse_timestamp_opt(row.get(5)?, "processed_at")?,
        customer_id: row.get(6)?,
        email: row.get(7)?,
        country: row.get(8)?,
        country_code: row.get(9)?,
        province: row.get(10)?,
        city: row.get(11)?,
        total_price: parse_decimal_opt(row.get(12)?, "total_price")?,
        subtotal_price: parse_decimal_opt(row.get(13)?, "subtotal_price")?,
        total_tax: parse_decimal_opt(row.get(14)?, "total_tax")?,
        total_discounts: parse_decimal_opt(row.get(15)?, "total_discounts")?,
        currency: row.get(16)?,
        referring_site: row.get(17)?,
        landing_site: row.get(18)?,
        source_name: row.get(19)?,
        attribution: Attribution {
            utm_source: row.get(20)?,
            utm_medium: row.get(21)?,
            utm_campaign: row.get(22)?,
            utm_content: row.get(23)?,
            utm_term: row.get(24)?,
        },
        financial_status: row.get(25)?,
        fulfillment_status: row.get(26)?,
        cancelled_at: parse_timestamp_opt(row.get(27)?, "cancelled_at")?,
        cancel_reason: row.get(28)?,
        tags: row.get(29)?,
        note: row.get(30)?,
        discount_codes: row.get(31)?,
        gateway: row.get(32)?,
        total_shipping: parse_db(&shipping_str, "total_shipping")?,
        checkout_id: row.get(34)?,
        synced_at: parse_timestamp(&synced_str, "synced_at")?,
    })
}

fn line_item_from_row(row: &Row<'_>) -> std::result::Result<LineItem, rusqlite::Error> {
    Ok(LineItem {
        line_item_id: row.get(0)?,
        order_id: row.get(1)?,
        product_id: row.get(2)?,
        variant_id: row.get(3)?,
        product_title: row.get(4)?,
        variant_title: row.get(5)?,
        sku: row.get(6)?,
        vendor: row.get(7)?,
        quantity: row.get(8)?,
        price: parse_decimal_opt(row.get(9)?, "price")?,
        total_discount: parse_decimal_opt(row.get(10)?, "total_discount")?,
        product_type: row.get(11)?,
    })
}

/// Maps a row selected with [`SYNC_RUN_COLUMNS`].
pub(crate) fn sync_run_from_row(row: &Row<'_>) -> std::result::Result<SyncRun, rusqlite::Error> {
    let type_str: String = row.get(1)?;
    let started_str: String = row.get(2)?;
    let status_str: String = row.get(7)?;

    Ok(SyncRun {
        id: row.get(0)?,
        sync_type: parse_db(&type_str, "sync_type")?,
        started_at: parse_timestamp(&started_str, "sync_started_at")?,
        completed_at: parse_timestamp_opt(row.get(3)?, "sync_completed_at")?,
        heartbeat_at: parse_timestamp_opt(row.get(4)?, "heartbeat_at")?,
        records_fetched: row.get(5)?,
        last_order_date: parse_timestamp_opt(row.get(6)?, "last_order_date")?,
        status: parse_db(&status_str, "status")?,
        error_message: row.get(8)?,
    })
}

/// Create the schema on a database connection.
///
/// Idempotent: safe to run on every open.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// SQLite database connection with order mirror operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets status readers run alongside a sync writer
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Get an order header by ID.
    pub fn get_order(&self, order_id: i64) -> Result<Order> {
        let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ?1");
        let order = self
            .conn
            .query_row(&sql, params![order_id], order_from_row)
            .optional()?;

        order.ok_or(Error::OrderNotFound(order_id))
    }

    /// Check if an order exists.
    pub fn order_exists(&self, order_id: i64) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE order_id = ?1",
            params![order_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    pub fn count_orders(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))?;
        Ok(count)
    }

    pub fn count_line_items(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM line_items", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Get the line items of an order, ordered by line item ID.
    pub fn get_line_items(&self, order_id: i64) -> Result<Vec<LineItem>> {
        let sql = format!(
            "SELECT {LINE_ITEM_COLUMNS} FROM line_items WHERE order_id = ?1 ORDER BY line_item_id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![order_id], line_item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Get a sync run by ID.
    pub fn get_sync_run(&self, id: i64) -> Result<SyncRun> {
        let sql = format!("SELECT {SYNC_RUN_COLUMNS} FROM sync_history WHERE id = ?1");
        let run = self
            .conn
            .query_row(&sql, params![id], sync_run_from_row)
            .optional()?;

        run.ok_or(Error::SyncRunNotFound(id))
    }

    /// Get the most recent sync runs, newest first.
    pub fn recent_sync_runs(&self, limit: usize) -> Result<Vec<SyncRun>> {
        let sql = format!("SELECT {SYNC_RUN_COLUMNS} FROM sync_history ORDER BY id DESC LIMIT ?1");
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map(params![i64::try_from(limit).unwrap_or(i64::MAX)], sync_run_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    /// Get every run currently holding (or having abandoned) the lock.
    pub fn running_sync_runs(&self) -> Result<Vec<SyncRun>> {
        let sql = format!(
            "SELECT {SYNC_RUN_COLUMNS} FROM sync_history WHERE status = ?1 ORDER BY id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let runs = stmt
            .query_map(params![SyncStatus::Running.as_str()], sync_run_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    /// Get the most recently started run of `sync_type` that reached an end.
    ///
    /// Completed, failed and timed-out runs all count; a run stopped by an
    /// operator interrupt does not.
    pub fn last_finished_run(&self, sync_type: SyncType) -> Result<Option<SyncRun>> {
        let sql = format!(
            "SELECT {SYNC_RUN_COLUMNS} FROM sync_history
             WHERE sync_type = ?1 AND status != ?2
               AND NOT (status = ?3 AND error_message IS ?4)
             ORDER BY sync_started_at DESC, id DESC LIMIT 1"
        );
        let run = self
            .conn
            .query_row(
                &sql,
                params![
                    sync_type.as_str(),
                    SyncStatus::Running.as_str(),
                    SyncStatus::Failed.as_str(),
                    INTERRUPTED_MESSAGE
                ],
                sync_run_from_row,
            )
            .optional()?;
        Ok(run)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
