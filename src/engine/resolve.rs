//! engine::resolve
//!
//! Settle a [`Selector`] on exactly one reference and its commit.

use super::{QueryError, RepoLocation};
use crate::core::query::{RefKind, ResolvedReference, Selector};
use crate::core::types::RefName;
use crate::git::{Git, GitError, Head};

/// Resolve the selector against an open repository.
///
/// Branches resolve through `refs/heads/`, tags through `refs/tags/` (peeled
/// to the tagged commit), and no selector through HEAD. A detached HEAD
/// resolves to `HEAD` itself.
///
/// # Errors
///
/// - [`QueryError::ReferenceNotFound`] if the ref is missing or HEAD is unborn
pub fn resolve(
    git: &Git,
    selector: &Selector,
    location: &RepoLocation,
) -> Result<ResolvedReference, QueryError> {
    let missing = |e: GitError| match e {
        GitError::RefNotFound { refname } => QueryError::ReferenceNotFound {
            refname,
            location: location.to_string(),
        },
        other => QueryError::Git(other),
    };

    let resolved = match selector {
        Selector::Branch(branch) => {
            let name = RefName::for_branch(branch);
            let commit = git.resolve_ref(&name).map_err(missing)?;
            ResolvedReference {
                name,
                kind: RefKind::Branch,
                commit,
            }
        }
        Selector::Tag(tag) => {
            let name = RefName::for_tag(tag);
            let commit = git.resolve_ref(&name).map_err(missing)?;
            ResolvedReference {
                name,
                kind: RefKind::Tag,
                commit,
            }
        }
        Selector::Head => match git.head().map_err(missing)? {
            Head::Branch { name, oid } => ResolvedReference {
                name,
                kind: RefKind::Branch,
                commit: oid,
            },
            Head::Detached { oid } => ResolvedReference {
                name: RefName::head(),
                kind: RefKind::Detached,
                commit: oid,
            },
        },
    };

    tracing::debug!(
        selector = %selector,
        refname = %resolved.name,
        commit = %resolved.commit,
        "resolved reference"
    );

    Ok(resolved)
}
