//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads whatever configuration it needs
//! 2. Calls the engine to execute the command
//! 3. Formats and displays output

mod completion;
mod read;

pub use completion::completion;
pub use read::read;

use std::path::Path;

use anyhow::Result;

use super::args::Command;
use crate::engine::Context;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, config_path: Option<&Path>, ctx: &Context) -> Result<()> {
    match command {
        Command::Read {
            target,
            auth,
            format,
        } => read(ctx, config_path, target.into(), auth.into(), format),
        Command::Completion { shell } => completion(shell),
    }
}
