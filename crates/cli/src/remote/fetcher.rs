// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Page fetcher for the paginated orders endpoint.
//!
//! The first request carries the query filters. Every following request is
//! the exact URL from the previous page's `Link: <...>; rel="next"` header,
//! which already encodes the cursor and filters.

use serde_json::Value;
use url::Url;

use super::auth::{AccessToken, ACCESS_TOKEN_HEADER};
use super::link::next_link;
use super::retry::{RetryPolicy, Sleeper};
use super::transport::{HttpRequest, HttpResponse, Transport};
use crate::config::Config;
use crate::error::{Error, Result};
use ordersync_core::Watermark;

/// Response body bytes kept in an HTTP status error.
const ERROR_BODY_LIMIT: usize = 512;

/// Base URL and API version of one shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopEndpoint {
    base: Url,
    api_version: String,
}

impl ShopEndpoint {
    pub fn new(base: Url, api_version: impl Into<String>) -> Self {
        ShopEndpoint {
            base,
            api_version: api_version.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(ShopEndpoint::new(config.shop_url()?, config.shop.api_version.clone()))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn token_url(&self) -> Result<Url> {
        self.join("admin/oauth/access_token")
    }

    pub fn orders_url(&self) -> Result<Url> {
        self.join(&format!("admin/api/{}/orders.json", self.api_version))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| Error::InvalidShopUrl {
            url: self.base.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Where a run starts reading the order stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStart {
    /// Orders updated at or after the watermark; everything if there is none.
    Since(Option<Watermark>),
    /// Full history, oldest first.
    Origin,
}

/// Filters for the first page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrdersQuery {
    pub limit: u32,
    pub status: String,
    pub start: QueryStart,
}

impl OrdersQuery {
    /// URL of the first page.
    pub fn first_page(&self, endpoint: &ShopEndpoint) -> Result<Url> {
        let mut url = endpoint.orders_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("limit", &self.limit.to_string())
                .append_pair("status", &self.status);
            match self.start {
                QueryStart::Since(Some(watermark)) => {
                    pairs.append_pair("updated_at_min", &watermark.to_string());
                }
                QueryStart::Since(None) => {}
                QueryStart::Origin => {
                    pairs.append_pair("order", "created_at asc");
                }
            }
        }
        Ok(url)
    }
}

/// One page of raw order payloads.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub orders: Vec<Value>,
    /// Follow-up page, if the stream continues.
    pub next: Option<Url>,
}

/// Fetches pages with the retry policy applied to each request.
pub struct PageFetcher<'a> {
    transport: &'a dyn Transport,
    sleeper: &'a dyn Sleeper,
    policy: &'a RetryPolicy,
    token: AccessToken,
}

impl<'a> PageFetcher<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        sleeper: &'a dyn Sleeper,
        policy: &'a RetryPolicy,
        token: AccessToken,
    ) -> Self {
        PageFetcher {
            transport,
            sleeper,
            policy,
            token,
        }
    }

    /// Fetch and parse the page at `url`.
    pub fn fetch(&self, url: &Url) -> Result<Page> {
        let request =
            HttpRequest::get(url.clone()).with_header(ACCESS_TOKEN_HEADER, self.token.secret());

        let response = self.policy.run(self.sleeper, url.as_str(), || {
            let response = self.transport.execute(&request)?;
            check_status(url, response)
        })?;

        parse_page(url, &response)
    }
}

fn check_status(url: &Url, response: HttpResponse) -> Result<HttpResponse> {
    if response.status == 200 {
        return Ok(response);
    }
    let mut body = response.body;
    if body.len() > ERROR_BODY_LIMIT {
        let mut end = ERROR_BODY_LIMIT;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
    }
    Err(Error::HttpStatus {
        status: response.status,
        url: url.to_string(),
        body,
    })
}

fn parse_page(url: &Url, response: &HttpResponse) -> Result<Page> {
    let mut body: Value = serde_json::from_str(&response.body)
        .map_err(|e| Error::InvalidResponse(format!("page body is not JSON: {e}")))?;
    let orders = match body.get_mut("orders").map(Value::take) {
        Some(Value::Array(orders)) => orders,
        Some(Value::Null) | None => {
            return Err(Error::InvalidResponse(
                "page body has no \"orders\" array".into(),
            ))
        }
        Some(other) => {
            return Err(Error::InvalidResponse(format!(
                "\"orders\" is not an array: {other}"
            )))
        }
    };

    let next = match response.header("Link") {
        Some(header) => next_link(header, url)?,
        None => None,
    };

    Ok(Page { orders, next })
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
