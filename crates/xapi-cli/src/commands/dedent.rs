// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! `xapi dedent`: Print a file's contents the way a template literal body
//! would be dedented.

use camino::Utf8Path;
use miette::Result;
use xapi_lang::template::dedent;

use super::read_source;

pub fn run(path: &Utf8Path) -> Result<()> {
    let source = read_source(path)?;
    for line in dedent(&source) {
        println!("{line}");
    }
    Ok(())
}
