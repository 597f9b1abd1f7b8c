// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client-credentials token exchange.

use std::fmt;

use serde::Deserialize;

use super::fetcher::ShopEndpoint;
use super::transport::{HttpRequest, Transport};
use crate::config::Credentials;
use crate::error::{Error, Result};

/// Header carrying the access token on order requests.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Bearer token for order requests. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange client credentials for an access token.
///
/// Any non-200 answer is an [`Error::Auth`]. The exchange is not retried:
/// bad credentials will not fix themselves.
pub fn fetch_token(
    transport: &dyn Transport,
    endpoint: &ShopEndpoint,
    credentials: &Credentials,
) -> Result<AccessToken> {
    let url = endpoint.token_url()?;
    let request = HttpRequest::post_form(
        url,
        vec![
            ("grant_type".to_string(), "client_credentials".to_string()),
            ("client_id".to_string(), credentials.client_id.clone()),
            ("client_secret".to_string(), credentials.client_secret.clone()),
        ],
    );

    let response = transport
        .execute(&request)
        .map_err(|e| Error::Auth(format!("token request failed: {e}")))?;
    if response.status != 200 {
        return Err(Error::Auth(format!(
            "token endpoint answered HTTP {}",
            response.status
        )));
    }

    let parsed: TokenResponse = serde_json::from_str(&response.body)
        .map_err(|e| Error::Auth(format!("unreadable token response: {e}")))?;
    if parsed.access_token.is_empty() {
        return Err(Error::Auth("token response had an empty access_token".into()));
    }

    tracing::debug!("obtained access token");
    Ok(AccessToken::new(parsed.access_token))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
