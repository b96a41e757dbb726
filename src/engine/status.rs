//! engine::status
//!
//! Working tree cleanliness.

use super::QueryError;
use crate::git::{Git, GitError};

/// Report whether the working tree matches HEAD.
///
/// Untracked files make the tree dirty; ignored files never do.
///
/// # Errors
///
/// - [`QueryError::StatusUnavailable`] for a bare repository or any failed scan
pub fn is_clean(git: &Git) -> Result<bool, QueryError> {
    let status = git.worktree_status(true).map_err(|e| match e {
        GitError::BareRepo => {
            QueryError::StatusUnavailable("repository has no working tree".to_string())
        }
        other => QueryError::StatusUnavailable(other.to_string()),
    })?;

    tracing::debug!(
        staged = status.staged,
        unstaged = status.unstaged,
        untracked = status.untracked,
        conflicts = status.has_conflicts,
        "working tree status"
    );

    Ok(status.is_clean())
}
