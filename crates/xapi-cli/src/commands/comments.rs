// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `xapi comments`: List the comments of a file as the comment lexer sees
//! them, before any attribution.

use camino::Utf8Path;
use miette::Result;
use serde_json::json;
use xapi_lang::ast::Comment;
use xapi_lang::source_analysis::collect_comments;

use super::{OutputFormat, read_source};

pub fn run(path: &Utf8Path, format: OutputFormat) -> Result<()> {
    let source = read_source(path)?;
    let comments = collect_comments(&source);
    tracing::info!(%path, count = comments.len(), "collected comments");
    for comment in &comments {
        println!("{}", render(comment, format));
    }
    Ok(())
}

fn render(comment: &Comment, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "{}-{} {}: {}",
            comment.begin(),
            comment.end(),
            comment.kind().as_str(),
            comment.content().trim()
        ),
        OutputFormat::Json => json!({
            "kind": comment.kind().as_str(),
            "content": comment.content(),
            "begin": comment.begin().to_string(),
            "end": comment.end().to_string(),
            "span_start": comment.span().start(),
            "span_end": comment.span().end(),
        })
        .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text() {
        let comments = collect_comments("int x; // note\n/* b */");
        assert_eq!(render(&comments[0], OutputFormat::Text), "1:8-1:14 line: note");
        assert_eq!(render(&comments[1], OutputFormat::Text), "2:1-2:7 block: b");
    }

    #[test]
    fn test_render_json() {
        let comments = collect_comments("/** d */");
        let value: serde_json::Value =
            serde_json::from_str(&render(&comments[0], OutputFormat::Json)).unwrap();
        assert_eq!(value["kind"], "doc");
        assert_eq!(value["span_start"], 0);
        assert_eq!(value["span_end"], 8);
    }
}
