// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the parser.
//!
//! 1. **Never panics** on arbitrary input, for every entry point
//! 2. **Deterministic** output for the same input
//! 3. **Containment** of every child's span in its parent's span
//! 4. **Comment conservation** across `parse_with_comments`

use proptest::prelude::*;

use super::{EntryPoint, parse, parse_with_comments};
use crate::attribution::MergeOptions;
use crate::source_analysis::collect_comments;

/// Fragments that hit the interesting corners of the grammar when glued
/// together at random.
fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "class ", "A ", "{ ", "} ", "( ", ") ", "[", "]", "<", ">", "/", "/>", "</", "=", ";",
        ",", ":", ".", "x", "1", "\"s\"", "`t ${a}`", "// c\n", "/* b */", "@A ", "int ",
        "new ", "return ", "if ", "else ", "-", "&&", "? ", "->", "::", "\n",
    ])
}

fn glued() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..40).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn never_panics_on_arbitrary_text(source in "\\PC{0,120}") {
        for entry in EntryPoint::ALL {
            let _ = parse(&source, entry);
        }
    }

    #[test]
    fn never_panics_on_grammar_fragments(source in glued()) {
        for entry in EntryPoint::ALL {
            let _ = parse(&source, entry);
        }
    }

    #[test]
    fn parsing_is_deterministic(source in glued()) {
        for entry in EntryPoint::ALL {
            prop_assert_eq!(parse(&source, entry), parse(&source, entry));
        }
    }

    #[test]
    fn children_lie_within_parents(source in glued()) {
        for entry in EntryPoint::ALL {
            let Ok(tree) = parse(&source, entry) else { continue };
            for id in tree.ids() {
                let span = tree.node(id).span();
                for child in tree.children(id) {
                    let child_span = tree.node(child).span();
                    prop_assert!(child_span.start() >= span.start());
                    prop_assert!(child_span.end() <= span.end());
                }
            }
        }
    }

    #[test]
    fn comments_are_conserved(source in glued(), across in any::<bool>(), annotations in any::<bool>()) {
        let options = MergeOptions {
            assign_across_blank_lines: across,
            annotations_as_node_start: annotations,
        };
        let expected = collect_comments(&source).len();
        for entry in EntryPoint::ALL {
            let Ok(tree) = parse_with_comments(&source, entry, &options) else { continue };
            prop_assert_eq!(tree.comments().count(), expected);
        }
    }
}
