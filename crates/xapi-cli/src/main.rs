// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! xapi command-line interface.
//!
//! This is the main entry point for the `xapi` command.

use camino::Utf8PathBuf;
use clap::{ArgAction, Args, Parser, Subcommand};
use miette::Result;
use tracing_subscriber::EnvFilter;
use xapi_lang::source_analysis::EntryPoint;

mod commands;
mod diagnostic;

use commands::{CommentFlags, OutputFormat};

/// xapi: parser, comment attribution and schema tools
#[derive(Debug, Parser)]
#[command(name = "xapi")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file to use instead of `xapi.toml` next to the input
    #[arg(long, global = true)]
    config: Option<Utf8PathBuf>,

    #[command(flatten)]
    comments: CommentArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct CommentArgs {
    /// Attach comments to the next node even across blank lines
    #[arg(long, global = true)]
    assign_across_blank_lines: bool,

    /// Do not count leading annotations as part of a node
    #[arg(long, global = true)]
    ignore_annotations: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a file and print its syntax tree with attributed comments
    Parse {
        /// Source file to parse
        path: Utf8PathBuf,

        /// Grammar production to start from
        #[arg(long, default_value = "compilation-unit")]
        entry: EntryPoint,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// List the comments in a file
    Comments {
        /// Source file to scan
        path: Utf8PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compile a definition document and print its schema
    Schema {
        /// Definition document (a tag container)
        path: Utf8PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the dedented lines of a file
    Dedent {
        /// File holding template text
        path: Utf8PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    // Install miette's fancy error handler
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let flags = CommentFlags {
        assign_across_blank_lines: cli.comments.assign_across_blank_lines,
        ignore_annotations: cli.comments.ignore_annotations,
    };
    let config = cli.config.as_deref();

    let result = match cli.command {
        Command::Parse {
            path,
            entry,
            format,
        } => commands::parse::run(&path, entry, format, config, flags),
        Command::Comments { path, format } => commands::comments::run(&path, format),
        Command::Schema { path, format } => commands::schema::run(&path, format),
        Command::Dedent { path } => commands::dedent::run(&path),
    };

    // Exit with appropriate code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{e:?}");
            std::process::exit(1);
        }
    }
}
