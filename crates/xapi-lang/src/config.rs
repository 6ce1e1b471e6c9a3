// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Project configuration.
//!
//! An optional `xapi.toml` next to the sources holds the comment attribution
//! toggles:
//!
//! ```toml
//! [comments]
//! assign-across-blank-lines = false
//! annotations-as-node-start = true
//! ```
//!
//! Missing sections and keys fall back to their defaults.

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::attribution::MergeOptions;

/// File name looked up by [`XapiConfig::find`].
pub const CONFIG_FILE: &str = "xapi.toml";

/// The contents of `xapi.toml`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct XapiConfig {
    /// The `[comments]` section.
    pub comments: MergeOptions,
}

/// A configuration file that could not be loaded.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config '{path}'")]
    #[diagnostic(code(xapi::config::io))]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}'")]
    #[diagnostic(code(xapi::config::parse))]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl XapiConfig {
    /// Parses configuration text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Loads the config file at `path`.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        tracing::debug!(%path, ?config, "loaded config");
        Ok(config)
    }

    /// Loads `xapi.toml` from `dir` if it exists.
    ///
    /// Returns `None` if there is no such file and an error if it exists but
    /// cannot be read or parsed.
    pub fn find(dir: &Utf8Path) -> Result<Option<Self>, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        let exists = path.try_exists().map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        if exists { Self::load(&path).map(Some) } else { Ok(None) }
    }

    /// The options the comment attribution merger runs with.
    #[must_use]
    pub const fn merge_options(&self) -> MergeOptions {
        self.comments
    }
}
