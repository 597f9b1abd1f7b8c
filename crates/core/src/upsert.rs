// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Idempotent order writer.
//!
//! Every order is written as one unit: the header upsert, the deletion of its
//! previous line items and the insertion of the current ones commit together.
//! Replaying the same payload any number of times leaves the store in the same
//! state. Immutable header fields keep their first-written value; the mutable
//! ones are overwritten, except where the new payload carries a null.

use chrono::{DateTime, Utc};
use rusqlite::params;
use serde::Serialize;
use serde_json::Value;

use crate::clock::format_timestamp;
use crate::db::{Database, LINE_ITEM_COLUMNS, ORDER_COLUMNS};
use crate::error::{Error, Result};
use crate::order::{LineItem, Order, RemoteOrder};

fn upsert_order_sql() -> String {
    format!(
        "INSERT INTO orders ({ORDER_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                 ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
                 ?31, ?32, ?33, ?34, ?35, ?36)
         ON CONFLICT(order_id) DO UPDATE SET
             updated_at = COALESCE(excluded.updated_at, updated_at),
             financial_status = COALESCE(excluded.financial_status, financial_status),
             fulfillment_status = COALESCE(excluded.fulfillment_status, fulfillment_status),
             cancelled_at = COALESCE(excluded.cancelled_at, cancelled_at),
             cancel_reason = COALESCE(excluded.cancel_reason, cancel_reason),
             tags = COALESCE(excluded.tags, tags),
             synced_at = excluded.synced_at"
    )
}

fn insert_line_item_sql() -> String {
    format!(
        "INSERT INTO line_items ({LINE_ITEM_COLUMNS})
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
    )
}

/// Outcome of writing one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenOrder {
    pub order_id: i64,
    pub created_at: DateTime<Utc>,
    pub line_items: usize,
}

/// An order of a page that was not written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedOrder {
    /// `None` when the payload had no usable id.
    pub order_id: Option<i64>,
    pub reason: String,
}

/// Outcome of writing one page of orders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWrite {
    pub orders_saved: usize,
    pub line_items_saved: usize,
    pub skipped: Vec<SkippedOrder>,
    /// Highest `created_at` among the orders written.
    pub max_created_at: Option<DateTime<Utc>>,
}

impl Database {
    /// Upsert an order header and replace its line items in one transaction.
    pub fn upsert_order(&self, order: &Order, line_items: &[LineItem]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;

        tx.execute(
            &upsert_order_sql(),
            params![
                order.order_id,
                order.order_number,
                order.order_name,
                format_timestamp(order.created_at),
                order.updated_at.map(format_timestamp),
                order.processed_at.map(format_timestamp),
                order.customer_id,
                order.email,
                order.country,
                order.country_code,
                order.province,
                order.city,
                order.total_price.map(|d| d.to_string()),
                order.subtotal_price.map(|d| d.to_string()),
                order.total_tax.map(|d| d.to_string()),
                order.total_discounts.map(|d| d.to_string()),
                order.currency,
                order.referring_site,
                order.landing_site,
                order.source_name,
                order.attribution.utm_source,
                order.attribution.utm_medium,
                order.attribution.utm_campaign,
                order.attribution.utm_content,
                order.attribution.utm_term,
                order.financial_status,
                order.fulfillment_status,
                order.cancelled_at.map(format_timestamp),
                order.cancel_reason,
                order.tags,
                order.note,
                order.discount_codes,
                order.gateway,
                order.total_shipping.to_string(),
                order.checkout_id,
                format_timestamp(order.synced_at),
            ],
        )?;

        tx.execute(
            "DELETE FROM line_items WHERE order_id = ?1",
            params![order.order_id],
        )?;

        {
            let mut stmt = tx.prepare(&insert_line_item_sql())?;
            for item in line_items {
                if item.order_id != order.order_id {
                    return Err(Error::CorruptedData(format!(
                        "line item {} belongs to order {}, not {}",
                        item.line_item_id, item.order_id, order.order_id
                    )));
                }
                stmt.execute(params![
                    item.line_item_id,
                    item.order_id,
                    item.product_id,
                    item.variant_id,
                    item.product_title,
                    item.variant_title,
                    item.sku,
                    item.vendor,
                    item.quantity,
                    item.price.map(|d| d.to_string()),
                    item.total_discount.map(|d| d.to_string()),
                    item.product_type,
                ])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    /// Decode one order payload and write it.
    pub fn write_remote_order(
        &self,
        value: &Value,
        synced_at: DateTime<Utc>,
    ) -> Result<WrittenOrder> {
        let remote = RemoteOrder::decode(value)?;
        let order = Order::from_remote(&remote, synced_at);
        let line_items: Vec<LineItem> = remote
            .line_items
            .iter()
            .map(|item| LineItem::from_remote(remote.id, item))
            .collect();

        self.upsert_order(&order, &line_items)?;

        Ok(WrittenOrder {
            order_id: remote.id,
            created_at: remote.created_at,
            line_items: line_items.len(),
        })
    }

    /// Write every order of a page, isolating failures per order.
    ///
    /// An order whose payload fails to decode or violates a constraint is
    /// rolled back on its own and reported in [`PageWrite::skipped`]; the rest
    /// of the page is still written. A store failure stops the page and is
    /// returned, so no later order can push the watermark past it.
    pub fn write_page(&self, orders: &[Value], synced_at: DateTime<Utc>) -> Result<PageWrite> {
        let mut page = PageWrite::default();

        for value in orders {
            match self.write_remote_order(value, synced_at) {
                Ok(written) => {
                    page.orders_saved += 1;
                    page.line_items_saved += written.line_items;
                    page.max_created_at = page.max_created_at.max(Some(written.created_at));
                }
                Err(e) if e.is_order_scoped() => {
                    let order_id = match &e {
                        Error::MalformedOrder { order_id, .. } => *order_id,
                        _ => value.get("id").and_then(Value::as_i64),
                    };
                    tracing::warn!(order_id, error = %e, "skipping order");
                    page.skipped.push(SkippedOrder {
                        order_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!(
                        order_id = value.get("id").and_then(serde_json::Value::as_i64),
                        saved = page.orders_saved,
                        error = %e,
                        "page write stopped"
                    );
                    return Err(e);
                }
            }
        }

        Ok(page)
    }
}

#[cfg(test)]
#[path = "upsert_tests.rs"]
mod tests;
