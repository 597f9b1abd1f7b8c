// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use super::*;
use chrono::TimeZone;
use serde_json::json;
use std::str::FromStr;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn synced() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn full_order() -> serde_json::Value {
    json!({
        "id": 5001,
        "order_number": 1042,
        "name": "#1042",
        "created_at": "2024-05-30T10:15:00-04:00",
        "updated_at": "2024-05-30T11:00:00-04:00",
        "processed_at": "2024-05-30T10:15:01-04:00",
        "customer": { "id": 77 },
        "email": "buyer@example.com",
        "shipping_address": {
            "country": "Australia",
            "country_code": "AU",
            "province": "Victoria",
            "city": "Melbourne"
        },
        "total_price": "42.50",
        "subtotal_price": "35.00",
        "total_tax": "3.50",
        "total_discounts": "0.00",
        "currency": "AUD",
        "landing_site": "/?utm_source=newsletter&utm_medium=email",
        "source_name": "web",
        "financial_status": "paid",
        "fulfillment_status": null,
        "tags": "vip, wholesale",
        "discount_applications": [
            { "code": "SPRING10" },
            { "title": "automatic" },
            { "code": "FREESHIP" }
        ],
        "payment_gateway_names": ["shopify_payments", "gift_card"],
        "shipping_lines": [ { "price": "4.00" }, { "price": "3.50" } ],
        "line_items": [
            {
                "id": 9001,
                "product_id": 300,
                "variant_id": 301,
                "title": "Sasha Dress",
                "sku": "SD-01",
                "quantity": 1,
                "price": "20.00",
                "total_discount": "0.00",
                "product_type": "pattern"
            },
            { "id": 9002, "product_id": 310, "quantity": 2, "price": "7.50" }
        ]
    })
}

#[test]
fn decode_full_order() {
    let remote = RemoteOrder::decode(&full_order()).unwrap();
    assert_eq!(remote.id, 5001);
    assert_eq!(
        remote.created_at,
        Utc.with_ymd_and_hms(2024, 5, 30, 14, 15, 0).unwrap()
    );
    assert_eq!(remote.total_price, Some(dec("42.50")));
    assert_eq!(remote.line_items.len(), 2);
    assert_eq!(remote.line_items[1].quantity, Some(2));
}

#[test]
fn order_from_remote_derives_columns() {
    let remote = RemoteOrder::decode(&full_order()).unwrap();
    let order = Order::from_remote(&remote, synced());

    assert_eq!(order.order_id, 5001);
    assert_eq!(order.customer_id, Some(77));
    assert_eq!(order.country_code.as_deref(), Some("AU"));
    assert_eq!(order.attribution.utm_source.as_deref(), Some("newsletter"));
    assert_eq!(order.attribution.utm_medium.as_deref(), Some("email"));
    assert_eq!(order.attribution.utm_campaign, None);
    assert_eq!(order.gateway.as_deref(), Some("shopify_payments"));
    assert_eq!(order.total_shipping, dec("7.50"));
    assert_eq!(order.discount_codes.as_deref(), Some("SPRING10,FREESHIP"));
    assert_eq!(order.fulfillment_status, None);
    assert_eq!(order.synced_at, synced());
}

#[test]
fn minimal_order_defaults() {
    let remote = RemoteOrder::decode(&json!({
        "id": 1,
        "created_at": "2024-01-01T00:00:00Z",
        "payment_gateway_names": null,
        "shipping_lines": null,
        "line_items": null
    }))
    .unwrap();
    let order = Order::from_remote(&remote, synced());

    assert!(remote.line_items.is_empty());
    assert_eq!(order.gateway, None);
    assert_eq!(order.total_shipping, Decimal::ZERO);
    assert_eq!(order.discount_codes, None);
    assert_eq!(order.attribution, Attribution::default());
    assert_eq!(order.customer_id, None);
    assert_eq!(order.country, None);
}

#[test]
fn numeric_prices_are_accepted() {
    let remote = RemoteOrder::decode(&json!({
        "id": 2,
        "created_at": "2024-01-01T00:00:00Z",
        "total_price": 12.5,
        "shipping_lines": [ { "price": 5 } ]
    }))
    .unwrap();
    assert_eq!(remote.total_price, Some(dec("12.5")));
    assert_eq!(total_shipping(&remote.shipping_lines), dec("5"));
}

#[test]
fn decode_missing_id_is_malformed() {
    let err = RemoteOrder::decode(&json!({ "created_at": "2024-01-01T00:00:00Z" })).unwrap_err();
    match err {
        Error::MalformedOrder { order_id, reason } => {
            assert_eq!(order_id, None);
            assert!(reason.contains("id"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn decode_bad_timestamp_keeps_id() {
    let err = RemoteOrder::decode(&json!({ "id": 9, "created_at": "yesterday" })).unwrap_err();
    assert!(matches!(err, Error::MalformedOrder { order_id: Some(9), .. }));
}

#[test]
fn line_item_from_remote() {
    let remote = RemoteOrder::decode(&full_order()).unwrap();
    let item = LineItem::from_remote(remote.id, &remote.line_items[0]);
    assert_eq!(item.line_item_id, 9001);
    assert_eq!(item.order_id, 5001);
    assert_eq!(item.product_title.as_deref(), Some("Sasha Dress"));
    assert_eq!(item.price, Some(dec("20.00")));
}

#[test]
fn shipping_lines_without_price_are_skipped() {
    let lines = vec![
        RemoteShippingLine { price: None },
        RemoteShippingLine {
            price: Some(dec("2.25")),
        },
    ];
    assert_eq!(total_shipping(&lines), dec("2.25"));
    assert_eq!(total_shipping(&[]), Decimal::ZERO);
}

#[test]
fn gateway_is_first_name() {
    assert_eq!(payment_gateway(&[]), None);
    assert_eq!(
        payment_gateway(&["paypal".to_string(), "manual".to_string()]).as_deref(),
        Some("paypal")
    );
}
