// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error reports with source context.
//!
//! Library errors carry a span but not the text it points into. Attaching
//! the file as a [`NamedSource`] lets miette render the offending lines with
//! an arrow under the span.

use camino::Utf8Path;
use miette::{Diagnostic, NamedSource, Report};

/// Wraps `error` in a report that renders against `source`.
pub fn with_source<E>(error: E, path: &Utf8Path, source: &str) -> Report
where
    E: Diagnostic + Send + Sync + 'static,
{
    Report::new(error).with_source_code(NamedSource::new(path.as_str(), source.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use xapi_lang::schema::{DslModel, compile_schema};
    use xapi_lang::source_analysis::{EntryPoint, parse, parse_tag_container};

    #[test]
    fn test_parse_error_keeps_span_and_source() {
        let source = "class A {\n  int x\n}";
        let err = parse(source, EntryPoint::CompilationUnit).unwrap_err();
        let span = err.span;
        let report = with_source(err, Utf8Path::new("A.java"), source);

        assert!(report.source_code().is_some());
        let label = report.labels().unwrap().next().unwrap();
        assert_eq!(label.offset(), span.start() as usize);
        assert_eq!(report.code().unwrap().to_string(), "xapi::parse");
    }

    #[test]
    fn test_schema_error_code() {
        let source = "<d elements=[] />";
        let tree = parse_tag_container(source).unwrap();
        let err = compile_schema(&DslModel::new(&tree).unwrap()).unwrap_err();
        let report = with_source(err, Utf8Path::new("d.xapi"), source);
        assert_eq!(report.code().unwrap().to_string(), "xapi::schema");
    }
}
