//! cli
//!
//! Command-line interface layer for repostamp.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging and load configuration
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to the
//! [`crate::engine`] for execution. Errors are reported through `anyhow` by
//! `main`.

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::engine;
use crate::logging;
use anyhow::Result;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    logging::init(cli.debug);

    let ctx = engine::Context {
        cwd: cli.cwd.clone(),
        quiet: cli.quiet,
    };

    commands::dispatch(cli.command, cli.config.as_deref(), &ctx)
}
