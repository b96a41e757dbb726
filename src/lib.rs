//! repostamp - resolve a git repository into a provenance record
//!
//! Given a working directory or a remote URL plus an optional branch or tag,
//! repostamp reports the fully-qualified reference, its commit, the nearest
//! describing tag, and whether the working tree is clean. Build and deploy
//! tooling uses the record to stamp artifacts with where they came from.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Runs the Locate → Resolve → Describe/Status → Report pipeline
//! - [`core`] - Domain types, query and report records, configuration
//! - [`git`] - Single interface for all Git operations
//! - [`auth`] - Credential resolution for remote clones
//! - [`ui`] - Terminal output
//! - [`logging`] - Tracing subscriber setup
//!
//! # Correctness Invariants
//!
//! 1. A repository the caller owns is never modified
//! 2. Branch and tag selectors are mutually exclusive
//! 3. Every query opens its own handles and drops them on return
//! 4. Secrets never reach logs, errors, or debug output

pub mod auth;
pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod logging;
pub mod ui;
