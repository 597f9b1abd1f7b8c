// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `Link` header parsing for cursor pagination.
//!
//! The order API answers with entries like
//! `<https://shop/admin/api/2024-10/orders.json?page_info=abc>; rel="next"`.
//! Only the `next` relation matters for a forward walk.

use url::Url;

use crate::error::{Error, Result};

/// Find the `rel="next"` target in a `Link` header value.
///
/// Relative targets resolve against `base`. Returns `Ok(None)` when there is
/// no next link.
pub fn next_link(header: &str, base: &Url) -> Result<Option<Url>> {
    for entry in header.split(',') {
        let mut parts = entry.split(';');
        let target = parts.next().unwrap_or_default().trim();
        let is_next = parts.any(|param| is_rel_next(param.trim()));
        if !is_next {
            continue;
        }

        let raw = target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .ok_or_else(|| Error::InvalidResponse(format!("malformed Link entry: {}", entry.trim())))?;
        let url = base
            .join(raw)
            .map_err(|e| Error::InvalidResponse(format!("bad next link '{raw}': {e}")))?;
        return Ok(Some(url));
    }
    Ok(None)
}

fn is_rel_next(param: &str) -> bool {
    let Some((key, value)) = param.split_once('=') else {
        return false;
    };
    key.trim().eq_ignore_ascii_case("rel")
        && value
            .trim()
            .trim_matches('"')
            .split_whitespace()
            .any(|rel| rel.eq_ignore_ascii_case("next"))
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
