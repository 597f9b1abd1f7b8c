// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client side of the remote order API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ PageFetcher │────►│  Transport  │────►│  Order API  │
//! │ (+ retry)   │◄────│   (trait)   │◄────│   (HTTPS)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲
//!        │ access token
//! ┌─────────────┐
//! │ fetch_token │  (client-credentials exchange)
//! └─────────────┘
//! ```
//!
//! # Features
//!
//! - Blocking reqwest transport behind an injectable trait
//! - Cursor pagination through `Link` headers
//! - Linear backoff on transient failures, fixed cool-down on HTTP 429
//! - Interruptible sleeps

mod auth;
mod fetcher;
mod link;
mod retry;
mod transport;

pub use auth::{fetch_token, AccessToken, ACCESS_TOKEN_HEADER};
pub use fetcher::{OrdersQuery, Page, PageFetcher, QueryStart, ShopEndpoint};
pub use link::next_link;
pub use retry::{RetryClass, RetryPolicy, Sleeper, ThreadSleeper};
pub use transport::{
    HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError,
    TransportResult,
};

#[cfg(test)]
pub(crate) mod test_helpers;
