//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. Every repository read flows
//! through this interface. No other module imports `git2`, and nothing shells
//! out to the git CLI.
//!
//! # Responsibilities
//!
//! - Opening a repository at an exact path
//! - Cloning a remote into a caller-owned directory
//! - Ref resolution (HEAD, branches, tags) peeled to commits
//! - Tag listing and ancestry walks
//! - Working tree status
//! - Remote URL lookup
//!
//! # Invariants
//!
//! - Read-only: no ref, index or worktree of an existing repository is changed
//! - All operations return strong types (Oid, RefName, TagName)
//!
//! # Example
//!
//! ```ignore
//! use repostamp::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let tags = git.list_tags()?;
//! let clean = git.worktree_status(true)?.is_clean();
//! ```

mod interface;
mod transport;

pub use interface::{Git, GitError, Head, TagEntry, WorktreeStatus};
pub use transport::{DEFAULT_SSH_USER, MAX_CREDENTIAL_ATTEMPTS};
