// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod comments;
pub mod dedent;
pub mod parse;
pub mod schema;

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic, Result};
use xapi_lang::attribution::MergeOptions;
use xapi_lang::config::XapiConfig;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// Machine-readable JSON.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown format '{other}': expected 'text' or 'json'"
            )),
        }
    }
}

/// Command-line overrides for the comment attribution toggles.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentFlags {
    pub assign_across_blank_lines: bool,
    pub ignore_annotations: bool,
}

/// Reads a source file.
pub fn read_source(path: &Utf8Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read '{path}'"))
}

/// Resolves the merge options for `source`: flags override the config file,
/// which overrides the defaults.
///
/// The config file is `config` when given, otherwise `xapi.toml` in the
/// source file's directory if there is one.
pub fn merge_options(
    source: &Utf8Path,
    config: Option<&Utf8Path>,
    flags: CommentFlags,
) -> Result<MergeOptions> {
    let loaded = match config {
        Some(path) => Some(XapiConfig::load(path)?),
        None => {
            let dir = source
                .parent()
                .filter(|dir| !dir.as_str().is_empty())
                .unwrap_or_else(|| Utf8Path::new("."));
            XapiConfig::find(dir)?
        }
    };
    let mut options = loaded.unwrap_or_default().merge_options();
    if flags.assign_across_blank_lines {
        options.assign_across_blank_lines = true;
    }
    if flags.ignore_annotations {
        options.annotations_as_node_start = false;
    }
    tracing::debug!(?options, "merge options");
    Ok(options)
}
