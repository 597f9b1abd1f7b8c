// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Marketing attribution parsed from an order's landing page.
//!
//! The storefront records the first page a buyer landed on, query string
//! included. Campaign links carry the five `utm_*` parameters there.

use serde::{Deserialize, Serialize};
use url::Url;

/// Base used to resolve relative landing paths such as `/products/x?utm_source=y`.
const RELATIVE_BASE: &str = "https://storefront.invalid/";

/// The five UTM attribution fields of an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
}

impl Attribution {
    /// Extracts attribution from a landing-site URL.
    ///
    /// Never fails: a missing, empty or unparseable URL yields all five fields
    /// as `None`. Blank parameter values count as absent, and the first
    /// occurrence of a repeated parameter wins.
    pub fn from_landing_site(landing_site: Option<&str>) -> Self {
        let mut attribution = Attribution::default();

        let Some(url) = landing_site.and_then(parse_landing_site) else {
            return attribution;
        };

        for (key, value) in url.query_pairs() {
            if value.trim().is_empty() {
                continue;
            }
            let slot = match key.as_ref() {
                "utm_source" => &mut attribution.utm_source,
                "utm_medium" => &mut attribution.utm_medium,
                "utm_campaign" => &mut attribution.utm_campaign,
                "utm_content" => &mut attribution.utm_content,
                "utm_term" => &mut attribution.utm_term,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        attribution
    }
}

fn parse_landing_site(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let base = Url::parse(RELATIVE_BASE).ok()?;
    base.join(raw).ok()
}

#[cfg(test)]
#[path = "attribution_tests.rs"]
mod tests;
