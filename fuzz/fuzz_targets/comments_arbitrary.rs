// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the comment lexer and template dedent.
//!
//! Both are total: any text must produce a result without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use xapi_lang::source_analysis::collect_comments;
use xapi_lang::template::{dedent, dedent_lines};

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    for comment in collect_comments(source) {
        assert!(comment.span().end() as usize <= source.len());
    }
    let once = dedent(source);
    assert_eq!(dedent_lines(&once), once);
});
