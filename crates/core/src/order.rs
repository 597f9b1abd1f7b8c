// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Order and line item types.
//!
//! Two layers live here:
//! - [`RemoteOrder`] / [`RemoteLineItem`]: the order API's JSON payload,
//!   decoded leniently (nulls accepted wherever the API emits them).
//! - [`Order`] / [`LineItem`]: the rows written to the store, with the
//!   derived columns (attribution, gateway, total shipping, discount codes).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::attribution::Attribution;
use crate::error::{Error, Result};

/// Treats a JSON `null` list the same as a missing one.
fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Customer reference embedded in a remote order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCustomer {
    pub id: Option<i64>,
}

/// Shipping address embedded in a remote order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteAddress {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
}

/// A discount application; only code-based discounts carry a code.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteDiscount {
    pub code: Option<String>,
}

/// A shipping line of a remote order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteShippingLine {
    pub price: Option<Decimal>,
}

/// A line item as delivered by the order API.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteLineItem {
    pub id: i64,
    pub product_id: Option<i64>,
    pub variant_id: Option<i64>,
    pub title: Option<String>,
    pub variant_title: Option<String>,
    pub sku: Option<String>,
    pub vendor: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub product_type: Option<String>,
}

/// An order as delivered by the order API.
///
/// Only `id` and `created_at` are required; everything else may be absent or
/// null in the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteOrder {
    pub id: i64,
    pub order_number: Option<i64>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub customer: Option<RemoteCustomer>,
    pub email: Option<String>,
    pub shipping_address: Option<RemoteAddress>,
    pub total_price: Option<Decimal>,
    pub subtotal_price: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub total_discounts: Option<Decimal>,
    pub currency: Option<String>,
    pub referring_site: Option<String>,
    pub landing_site: Option<String>,
    pub source_name: Option<String>,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub tags: Option<String>,
    pub note: Option<String>,
    pub checkout_id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub discount_applications: Vec<RemoteDiscount>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub payment_gateway_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub shipping_lines: Vec<RemoteShippingLine>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<RemoteLineItem>,
}

impl RemoteOrder {
    /// Decodes one order object from a page body.
    ///
    /// Failures are reported as [`Error::MalformedOrder`], carrying the order
    /// id when the payload has a numeric one.
    pub fn decode(value: &serde_json::Value) -> Result<RemoteOrder> {
        RemoteOrder::deserialize(value).map_err(|e| Error::MalformedOrder {
            order_id: value.get("id").and_then(serde_json::Value::as_i64),
            reason: e.to_string(),
        })
    }
}

/// An order header row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: i64,
    pub order_number: Option<i64>,
    pub order_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub processed_at: Option<DateTime<Utc>>,
    pub customer_id: Option<i64>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub total_price: Option<Decimal>,
    pub subtotal_price: Option<Decimal>,
    pub total_tax: Option<Decimal>,
    pub total_discounts: Option<Decimal>,
    pub currency: Option<String>,
    pub referring_site: Option<String>,
    pub landing_site: Option<String>,
    pub source_name: Option<String>,
    #[serde(flatten)]
    pub attribution: Attribution,
    pub financial_status: Option<String>,
    pub fulfillment_status: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
    pub tags: Option<String>,
    pub note: Option<String>,
    pub discount_codes: Option<String>,
    pub gateway: Option<String>,
    pub total_shipping: Decimal,
    pub checkout_id: Option<i64>,
    pub synced_at: DateTime<Utc>,
}

impl Order {
    /// Builds the stored row for a remote order, deriving the computed columns.
    pub fn from_remote(remote: &RemoteOrder, synced_at: DateTime<Utc>) -> Order {
        let address = remote.shipping_address.clone().unwrap_or_default();
        Order {
            order_id: remote.id,
            order_number: remote.order_number,
            order_name: remote.name.clone(),
            created_at: remote.created_at,
            updated_at: remote.updated_at,
            processed_at: remote.processed_at,
            customer_id: remote.customer.as_ref().and_then(|c| c.id),
            email: remote.email.clone(),
            country: address.country,
            country_code: address.country_code,
            province: address.province,
            city: address.city,
            total_price: remote.total_price,
            subtotal_price: remote.subtotal_price,
            total_tax: remote.total_tax,
            total_discounts: remote.total_discounts,
            currency: remote.currency.clone(),
            referring_site: remote.referring_site.clone(),
            landing_site: remote.landing_site.clone(),
            source_name: remote.source_name.clone(),
            attribution: Attribution::from_landing_site(remote.landing_site.as_deref()),
            financial_status: remote.financial_status.clone(),
            fulfillment_status: remote.fulfillment_status.clone(),
            cancelled_at: remote.cancelled_at,
            cancel_reason: remote.cancel_reason.clone(),
            tags: remote.tags.clone(),
            note: remote.note.clone(),
            discount_codes: discount_codes(&remote.discount_applications),
            gateway: payment_gateway(&remote.payment_gateway_names),
            total_shipping: total_shipping(&remote.shipping_lines),
            checkout_id: remote.checkout_id,
            synced_at,
        }
    }
}

/// A line item row. Always written as part of its order's full snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub line_item_id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub variant_id: Option<i64>,
    pub product_title: Option<String>,
    pub variant_title: Option<String>,
    pub sku: Option<String>,
    pub vendor: Option<String>,
    pub quantity: Option<i64>,
    pub price: Option<Decimal>,
    pub total_discount: Option<Decimal>,
    pub product_type: Option<String>,
}

impl LineItem {
    /// Builds the stored row for a remote line item of `order_id`.
    pub fn from_remote(order_id: i64, remote: &RemoteLineItem) -> LineItem {
        LineItem {
            line_item_id: remote.id,
            order_id,
            product_id: remote.product_id,
            variant_id: remote.variant_id,
            product_title: remote.title.clone(),
            variant_title: remote.variant_title.clone(),
            sku: remote.sku.clone(),
            vendor: remote.vendor.clone(),
            quantity: remote.quantity,
            price: remote.price,
            total_discount: remote.total_discount,
            product_type: remote.product_type.clone(),
        }
    }
}

/// The payment gateway of an order: the first listed gateway name, if any.
pub fn payment_gateway(names: &[String]) -> Option<String> {
    names.first().cloned()
}

/// Sum of shipping-line prices; zero when there are none.
pub fn total_shipping(lines: &[RemoteShippingLine]) -> Decimal {
    lines
        .iter()
        .filter_map(|line| line.price)
        .fold(Decimal::ZERO, |acc, price| acc + price)
}

/// Comma-joined codes of the discount applications that carry one.
pub fn discount_codes(discounts: &[RemoteDiscount]) -> Option<String> {
    let codes: Vec<&str> = discounts
        .iter()
        .filter_map(|d| d.code.as_deref())
        .filter(|code| !code.is_empty())
        .collect();
    if codes.is_empty() {
        None
    } else {
        Some(codes.join(","))
    }
}

#[cfg(test)]
#[path = "order_tests.rs"]
mod tests;
