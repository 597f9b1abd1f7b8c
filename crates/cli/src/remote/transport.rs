// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Transport abstraction for HTTP communication with the order API.
//!
//! Provides a trait-based transport layer that enables:
//! - Real HTTPS requests for production
//! - Scripted mock transports for unit testing

use std::time::Duration;

use url::Url;

/// Error type for transport operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Connection could not be established or was reset.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request or the response read timed out.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The response body was cut off while reading.
    #[error("response body interrupted: {0}")]
    BodyInterrupted(String),

    /// The request itself could not be built or sent.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns true for network failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::InvalidRequest(_))
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// An HTTP request to the order API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(String, String)>,
    /// URL-encoded form body, sent only for POST.
    pub form: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        HttpRequest {
            method: Method::Get,
            url,
            headers: Vec::new(),
            form: Vec::new(),
        }
    }

    pub fn post_form(url: Url, form: Vec<(String, String)>) -> Self {
        HttpRequest {
            method: Method::Post,
            url,
            headers: Vec::new(),
            form,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// A fully read HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Transport trait for blocking request/response exchanges.
///
/// This trait abstracts over the actual transport mechanism, allowing
/// for easy testing with mock implementations. Any HTTP status is a
/// successful exchange; only failures to complete the exchange are errors.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> TransportResult<HttpResponse>;
}

/// HTTPS transport implementation using the blocking reqwest client.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a new transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> TransportResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ordersync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(ReqwestTransport { client })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    let message = e.to_string();
    if e.is_timeout() {
        TransportError::Timeout(message)
    } else if e.is_body() || e.is_decode() {
        TransportError::BodyInterrupted(message)
    } else if e.is_builder() || e.is_redirect() {
        TransportError::InvalidRequest(message)
    } else {
        TransportError::ConnectionFailed(message)
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> TransportResult<HttpResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(request.url.clone()),
            Method::Post => self.client.post(request.url.clone()).form(&request.form),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().map_err(map_reqwest_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
