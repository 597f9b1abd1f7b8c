// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

fn base() -> Url {
    Url::parse("https://shop.test/admin/api/2024-10/orders.json?limit=250").unwrap()
}

#[test]
fn test_next_only() {
    let header = r#"<https://shop.test/admin/api/2024-10/orders.json?page_info=abc>; rel="next""#;
    let next = next_link(header, &base()).unwrap().unwrap();
    assert_eq!(next.query(), Some("page_info=abc"));
}

#[test]
fn test_previous_and_next() {
    let header = r#"<https://shop.test/o.json?page_info=p>; rel="previous", <https://shop.test/o.json?page_info=n>; rel="next""#;
    let next = next_link(header, &base()).unwrap().unwrap();
    assert_eq!(next.as_str(), "https://shop.test/o.json?page_info=n");
}

#[parameterized(
    previous_only = { r#"<https://shop.test/o.json?page_info=p>; rel="previous""# },
    empty = { "" },
    no_rel = { "<https://shop.test/o.json>" },
)]
fn test_no_next(header: &str) {
    assert_eq!(next_link(header, &base()).unwrap(), None);
}

#[test]
fn test_relative_target_resolves_against_base() {
    let next = next_link(r#"</admin/api/2024-10/orders.json?page_info=x>; rel=next"#, &base())
        .unwrap()
        .unwrap();
    assert_eq!(
        next.as_str(),
        "https://shop.test/admin/api/2024-10/orders.json?page_info=x"
    );
}

#[test]
fn test_rel_is_case_insensitive() {
    let next = next_link(r#"<https://shop.test/n>; REL="Next""#, &base()).unwrap();
    assert!(next.is_some());
}

#[test]
fn test_missing_brackets_is_invalid() {
    let err = next_link(r#"https://shop.test/n; rel="next""#, &base()).unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)));
}
