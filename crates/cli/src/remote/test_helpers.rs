// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for the remote and sync modules.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use super::retry::Sleeper;
use super::transport::{HttpRequest, HttpResponse, Transport, TransportError, TransportResult};
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;

pub const SHOP: &str = "https://shop.test/";

/// Mock transport replaying a script of responses in order.
///
/// Every request is recorded. Running past the end of the script yields a
/// connection error.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<TransportResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: TransportResult<HttpResponse>) -> &Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }

    pub fn respond(&self, response: HttpResponse) -> &Self {
        self.push(Ok(response))
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    /// A successful token exchange.
    pub fn token(&self) -> &Self {
        self.respond(token_response())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_urls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.url.as_str().to_string())
            .collect()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: &HttpRequest) -> TransportResult<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ConnectionFailed("script exhausted".into())))
    }
}

/// Sleeper that records requested sleeps and returns immediately.
///
/// With an interrupt attached, the first sleep raises it and fails the way
/// an operator's Ctrl-C would.
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
    interrupt_on_sleep: Option<Interrupt>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interrupting(interrupt: Interrupt) -> Self {
        RecordingSleeper {
            sleeps: Mutex::new(Vec::new()),
            interrupt_on_sleep: Some(interrupt),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> Result<()> {
        self.sleeps.lock().unwrap().push(duration);
        if let Some(interrupt) = &self.interrupt_on_sleep {
            interrupt.trigger();
            return Err(Error::Interrupted);
        }
        Ok(())
    }
}

pub fn shop_url() -> Url {
    Url::parse(SHOP).unwrap()
}

pub fn token_response() -> HttpResponse {
    HttpResponse::new(200, r#"{"access_token":"tok-123","scope":"read_orders"}"#)
}

/// An order payload created on 2024-03-`day` at 10:00 UTC.
pub fn order(id: i64, day: u32, line_items: &[i64]) -> Value {
    let items: Vec<Value> = line_items
        .iter()
        .map(|item| json!({ "id": item, "product_id": 7, "quantity": 1, "price": "12.00" }))
        .collect();
    json!({
        "id": id,
        "name": format!("#{id}"),
        "created_at": format!("2024-03-{day:02}T10:00:00Z"),
        "updated_at": format!("2024-03-{day:02}T11:00:00Z"),
        "financial_status": "paid",
        "landing_site": "/?utm_source=newsletter&utm_medium=email",
        "payment_gateway_names": ["shopify_payments"],
        "shipping_lines": [{ "price": "5.00" }],
        "line_items": items
    })
}

/// A page of orders, optionally linking to `next`.
pub fn page(orders: Vec<Value>, next: Option<&str>) -> HttpResponse {
    let response = HttpResponse::new(200, json!({ "orders": orders }).to_string());
    match next {
        Some(url) => response.with_header("Link", &format!("<{url}>; rel=\"next\"")),
        None => response,
    }
}

/// URL of a follow-up page, as the API would put in a `Link` header.
pub fn page_url(page_info: &str) -> String {
    format!("{SHOP}admin/api/2024-10/orders.json?limit=250&page_info={page_info}")
}
