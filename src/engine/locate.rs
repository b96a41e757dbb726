//! engine::locate
//!
//! Find and open the repository a query is about.
//!
//! # Modes
//!
//! - **Remote**: a URL is given. The remote is cloned into a fresh temporary
//!   directory (with all tags, and the selected branch checked out). Any
//!   `path` is ignored.
//! - **Explicit**: a path is given. The repository is opened at exactly that
//!   path; parents are never searched.
//! - **Discovery**: neither is given. The query origin and each of its
//!   ancestors are tried in turn, ending with the filesystem root. The offset
//!   of the origin below the repository root is recorded.
//!
//! The temporary clone lives exactly as long as the [`LocatedRepo`].

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;

use super::{Context, QueryError};
use crate::auth::Auth;
use crate::core::query::{RepositoryQuery, Selector};
use crate::git::{Git, GitError};

/// Where a located repository came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoLocation {
    /// A directory on this machine.
    Local(PathBuf),
    /// A remote cloned for this query.
    Remote(String),
}

impl fmt::Display for RepoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepoLocation::Local(path) => write!(f, "{}", path.display()),
            RepoLocation::Remote(url) => f.write_str(url),
        }
    }
}

/// An open repository owned by one query.
#[derive(Debug)]
pub struct LocatedRepo {
    pub git: Git,
    pub location: RepoLocation,
    /// Origin relative to the discovered root; discovery mode only.
    pub relative_path: Option<String>,
    // Dropped after `git`, removing the clone from disk.
    _clone_dir: Option<TempDir>,
}

/// Open the repository named by `query`.
///
/// `selector` decides which branch a remote clone checks out.
///
/// # Errors
///
/// - [`QueryError::RepositoryNotFound`] for a bad path or a failed discovery
/// - [`QueryError::ReferenceNotFound`] when a clone's branch does not exist
/// - [`QueryError::Transport`] for other clone failures
pub fn locate(
    ctx: &Context,
    query: &RepositoryQuery,
    selector: &Selector,
    auth: &Auth,
) -> Result<LocatedRepo, QueryError> {
    if let Some(url) = query.url() {
        return clone(url, selector, auth);
    }

    if let Some(path) = query.path() {
        let path = ctx
            .resolve_path(path)
            .map_err(|e| not_found(path, e.to_string()))?;
        return open_exact(&path);
    }

    let origin = ctx
        .origin()
        .map_err(|e| not_found(Path::new("."), e.to_string()))?;
    discover(&origin)
}

/// Open the repository at exactly `path`.
pub fn open_exact(path: &Path) -> Result<LocatedRepo, QueryError> {
    let git = Git::open(path).map_err(|e| match e {
        GitError::NotARepo { message, .. } => not_found(path, message),
        other => QueryError::Git(other),
    })?;

    tracing::debug!(path = %path.display(), "opened repository");

    Ok(LocatedRepo {
        git,
        location: RepoLocation::Local(path.to_path_buf()),
        relative_path: None,
        _clone_dir: None,
    })
}

/// Search `origin` and its ancestors for a repository.
///
/// # Errors
///
/// - [`QueryError::RepositoryNotFound`] if no ancestor, up to and including
///   the filesystem root, is a repository
pub fn discover(origin: &Path) -> Result<LocatedRepo, QueryError> {
    let origin = origin
        .canonicalize()
        .map_err(|e| not_found(origin, e.to_string()))?;

    for candidate in origin.ancestors() {
        match Git::open(candidate) {
            Ok(git) => {
                let relative = relative_offset(&origin, candidate);
                tracing::debug!(
                    origin = %origin.display(),
                    root = %candidate.display(),
                    relative_path = %relative,
                    "discovered repository"
                );
                return Ok(LocatedRepo {
                    git,
                    location: RepoLocation::Local(candidate.to_path_buf()),
                    relative_path: Some(relative),
                    _clone_dir: None,
                });
            }
            Err(GitError::NotARepo { .. }) => {
                tracing::trace!(candidate = %candidate.display(), "not a repository");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(not_found(
        &origin,
        "no repository in this directory or any parent".to_string(),
    ))
}

/// `origin` below `root`, forward-slash separated; empty when they are equal.
pub fn relative_offset(origin: &Path, root: &Path) -> String {
    let Ok(rest) = origin.strip_prefix(root) else {
        return String::new();
    };

    rest.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn clone(url: &str, selector: &Selector, auth: &Auth) -> Result<LocatedRepo, QueryError> {
    let dir = tempfile::Builder::new()
        .prefix("repostamp-")
        .tempdir()
        .map_err(|e| QueryError::Transport {
            url: url.to_string(),
            message: format!("unable to create clone directory: {e}"),
        })?;

    let git = Git::clone_remote(url, dir.path(), selector.branch(), auth).map_err(|e| match e {
        GitError::RefNotFound { refname } => QueryError::ReferenceNotFound {
            refname,
            location: url.to_string(),
        },
        GitError::Clone { url, message } => QueryError::Transport { url, message },
        other => QueryError::Git(other),
    })?;

    tracing::info!(url, "cloned remote repository");

    Ok(LocatedRepo {
        git,
        location: RepoLocation::Remote(url.to_string()),
        relative_path: None,
        _clone_dir: Some(dir),
    })
}

fn not_found(path: &Path, reason: String) -> QueryError {
    QueryError::RepositoryNotFound {
        location: path.display().to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod relative_offset {
        use super::*;

        #[test]
        fn same_directory_is_empty() {
            assert_eq!(relative_offset(Path::new("/a/b"), Path::new("/a/b")), "");
        }

        #[test]
        fn nested_uses_forward_slashes() {
            assert_eq!(
                relative_offset(Path::new("/repo/x/y/z"), Path::new("/repo")),
                "x/y/z"
            );
        }

        #[test]
        fn unrelated_paths_are_empty() {
            assert_eq!(relative_offset(Path::new("/a"), Path::new("/b")), "");
        }
    }

    mod location {
        use super::*;

        #[test]
        fn display() {
            assert_eq!(
                RepoLocation::Remote("https://example.com/r.git".into()).to_string(),
                "https://example.com/r.git"
            );
            assert_eq!(RepoLocation::Local("/srv/r".into()).to_string(), "/srv/r");
        }
    }

    #[test]
    fn open_exact_rejects_plain_directory() {
        let dir = TempDir::new().unwrap();
        let err = open_exact(dir.path()).unwrap_err();
        assert!(matches!(err, QueryError::RepositoryNotFound { .. }));
    }

    #[test]
    fn discover_missing_origin_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = discover(&dir.path().join("gone")).unwrap_err();
        assert!(matches!(err, QueryError::RepositoryNotFound { .. }));
    }

    #[test]
    fn discover_searches_up_to_the_root() {
        let dir = TempDir::new().unwrap();
        // a checkout enclosing the temp dir would be found instead
        if dir.path().ancestors().any(|a| a.join(".git").exists()) {
            return;
        }
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        let err = discover(&nested).unwrap_err();
        match err {
            QueryError::RepositoryNotFound { location, reason } => {
                assert!(location.ends_with("c"), "location: {location}");
                assert!(reason.contains("any parent"), "reason: {reason}");
            }
            other => panic!("expected RepositoryNotFound, got {other:?}"),
        }
    }
}
