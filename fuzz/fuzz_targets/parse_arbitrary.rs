// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for parser crash safety testing.
//!
//! Feeds arbitrary text to every parser entry point with comment attribution
//! on. The parser must return a tree or a `ParseError`, never panic, and the
//! merger must keep every comment the comment lexer found.

#![no_main]

use libfuzzer_sys::fuzz_target;
use xapi_lang::attribution::MergeOptions;
use xapi_lang::source_analysis::{EntryPoint, collect_comments, parse_with_comments};

fuzz_target!(|data: &[u8]| {
    // Invalid UTF-8 never reaches the parser
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    let expected = collect_comments(source).len();
    let options = MergeOptions::default();
    for entry in EntryPoint::ALL {
        if let Ok(tree) = parse_with_comments(source, entry, &options) {
            assert_eq!(tree.comments().count(), expected);
        }
    }
});
