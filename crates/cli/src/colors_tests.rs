// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// Strip all ANSI escape sequences from a string
fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

#[test]
fn paint_wraps_text_in_escape_codes() {
    assert_eq!(header("Examples:"), "\x1b[38;5;74mExamples:\x1b[0m");
    assert_eq!(literal("x"), "\x1b[38;5;250mx\x1b[0m");
    assert_eq!(context("x"), "\x1b[38;5;245mx\x1b[0m");
}

#[test]
fn colorized_examples_keep_their_text() {
    let text = "Examples:\n  ordersync sync              Incremental sync\n  plain";
    let colored = colorize_examples(text);

    assert_eq!(strip_ansi(&colored), text);
    assert!(colored.contains(&header("Examples:")));
    assert!(colored.contains(&literal("ordersync sync")));
}

#[test]
fn lines_without_description_are_untouched() {
    assert_eq!(colorize_examples("  just text"), "  just text");
}
