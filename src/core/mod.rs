//! core
//!
//! Domain types, query records, and configuration.
//!
//! # Modules
//!
//! - [`types`] - Validated names and object ids
//! - [`query`] - Query input, resolved reference, and report output
//! - [`config`] - Config file schema and loading
//!
//! Nothing in `core` touches a repository; the [`crate::engine`] does that
//! through [`crate::git`].

pub mod config;
pub mod query;
pub mod types;
