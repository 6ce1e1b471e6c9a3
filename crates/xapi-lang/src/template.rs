// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Template literal dedent.
//!
//! Template literals are usually written indented to match the surrounding
//! code:
//!
//! ```text
//! html = `
//!     <div>
//!       ${body}
//!     </div>
//! `;
//! ```
//!
//! [`dedent`] turns the raw text between the backticks into the lines the
//! author meant, without the shared indentation and without the line breaks
//! that only exist because of the delimiters.
//!
//! ```
//! use xapi_lang::template::dedent;
//!
//! assert_eq!(dedent("\n    <div>\n      x\n    </div>\n"), ["<div>", "  x", "</div>"]);
//! ```

/// Dedents the raw text of a template literal.
///
/// 1. Line breaks are normalised to `\n`.
/// 2. A line break right after the opening delimiter is dropped, and so is a
///    line break right before the closing one.
/// 3. Text that is entirely whitespace yields no lines.
/// 4. The remaining lines go through [`dedent_lines`].
#[must_use]
pub fn dedent(raw: &str) -> Vec<String> {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.strip_prefix('\n').unwrap_or(&text);
    if text.chars().all(char::is_whitespace) {
        return Vec::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    let lines: Vec<&str> = text.split('\n').collect();
    dedent_lines(&lines)
}

/// Removes the indentation and trailing whitespace shared by every
/// non-blank line. Blank lines do not take part and come out empty.
///
/// Applying it to its own output changes nothing.
#[must_use]
pub fn dedent_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let content: Vec<&str> = lines
        .iter()
        .map(|line| line.as_ref())
        .filter(|line| !is_blank(line))
        .collect();
    let leading = content
        .iter()
        .map(|line| line.chars().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);
    let trailing = content
        .iter()
        .map(|line| line.chars().rev().take_while(|c| c.is_whitespace()).count())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            let line = line.as_ref();
            if is_blank(line) {
                return String::new();
            }
            let len = line.chars().count();
            line.chars()
                .skip(leading)
                .take(len - leading - trailing)
                .collect()
        })
        .collect()
}

fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_indent_is_removed() {
        assert_eq!(dedent("\n    a\n      b\n    "), ["a", "  b", ""]);
    }

    #[test]
    fn delimiter_line_breaks_contribute_nothing() {
        assert_eq!(dedent("\n  a\n"), ["a"]);
        assert_eq!(dedent("a"), ["a"]);
        assert_eq!(dedent("a\n\nb"), ["a", "", "b"]);
    }

    #[test]
    fn whitespace_only_text_is_empty() {
        assert!(dedent("").is_empty());
        assert!(dedent("\n").is_empty());
        assert!(dedent("  \n\t \n").is_empty());
    }

    #[test]
    fn shared_trailing_whitespace_is_removed() {
        assert_eq!(dedent("  a  \n  bb  "), ["a", "bb"]);
        assert_eq!(dedent("a  \nb"), ["a  ", "b"]);
    }

    #[test]
    fn carriage_returns_are_normalised() {
        assert_eq!(dedent("\r\n  a\r\n  b\r\n"), ["a", "b"]);
        assert_eq!(dedent("\r  a\r  b"), ["a", "b"]);
    }

    #[test]
    fn unindented_line_keeps_the_rest() {
        assert_eq!(dedent("\n  a\nb\n"), ["  a", "b"]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(dedent("\n  é\n   ü"), ["é", " ü"]);
    }

    #[test]
    fn dedent_lines_is_idempotent_on_example() {
        let once = dedent("\n    a\n      b\n    ");
        assert_eq!(dedent_lines(&once), once);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn dedent_is_idempotent(raw in "[ \\t\\na-c\\r]{0,60}") {
            let once = dedent(&raw);
            prop_assert_eq!(dedent_lines(&once), once);
        }

        #[test]
        fn dedent_never_adds_lines(raw in "\\PC{0,80}") {
            let lines = dedent(&raw);
            prop_assert!(lines.len() <= raw.split(['\n', '\r']).count());
        }

        #[test]
        fn indenting_uniformly_changes_nothing(
            lines in prop::collection::vec("[a-z][a-z ]{0,8}[a-z]", 1..6),
            indent in 0usize..6,
        ) {
            let pad = " ".repeat(indent);
            let raw: String = lines.iter().map(|line| format!("\n{pad}{line}")).collect();
            prop_assert_eq!(dedent(&raw), lines);
        }
    }
}
