//! engine
//!
//! Runs one repository read: Locate -> Resolve -> Describe + Status -> Report.
//!
//! # Architecture
//!
//! Each stage lives in its own module and talks to the repository only
//! through [`crate::git::Git`]:
//!
//! 1. **Locate** ([`locate`]): open the repository named by a path or URL, or
//!    discover one by searching upward from the query origin
//! 2. **Resolve** ([`resolve`]): settle the selector on exactly one reference
//! 3. **Describe** ([`describe`]): find the nearest tag for an untagged commit
//! 4. **Status** ([`status`]): decide whether the working tree is clean
//! 5. **Report** ([`query`]): merge the results into a `RepositoryReport`
//!
//! ```text
//! Auth -> Locate -> Resolve -> { Describe, Status } -> Report
//! ```
//!
//! # Invariants
//!
//! - Nothing is written to a repository the caller owns
//! - Every query opens and drops its own handles; nothing is cached
//! - Any stage failure fails the whole query; there are no partial reports
//!
//! # Example
//!
//! ```no_run
//! use repostamp::auth::Auth;
//! use repostamp::core::query::RepositoryQuery;
//! use repostamp::engine::{read_repository, Context};
//!
//! let report = read_repository(&Context::default(), &RepositoryQuery::default(), &Auth::anonymous())?;
//! println!("{} at {}", report.id, report.commit_sha);
//! # Ok::<(), repostamp::engine::QueryError>(())
//! ```

pub mod describe;
pub mod locate;
pub mod query;
pub mod resolve;
pub mod status;

pub use locate::{LocatedRepo, RepoLocation};
pub use query::read_repository;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::auth::AuthError;
use crate::core::config::ConfigError;
use crate::core::query::QueryValidationError;
use crate::git::GitError;

/// Execution context for a query.
///
/// Contains global settings derived from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Working directory override; the origin of discovery and the base for
    /// relative paths.
    pub cwd: Option<PathBuf>,
    /// Quiet mode (minimal output).
    pub quiet: bool,
}

impl Context {
    /// Directory a query starts from.
    pub fn origin(&self) -> std::io::Result<PathBuf> {
        let current = std::env::current_dir()?;
        Ok(match &self.cwd {
            Some(cwd) => current.join(cwd),
            None => current,
        })
    }

    /// Resolve `path` against the query origin.
    pub fn resolve_path(&self, path: &Path) -> std::io::Result<PathBuf> {
        if path.is_absolute() {
            return Ok(path.to_path_buf());
        }
        Ok(self.origin()?.join(path))
    }
}

/// Errors from a repository read.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The query or the credentials cannot be used as given.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No repository at the path, or discovery found none.
    #[error("repository not found at {location}: {reason}")]
    RepositoryNotFound { location: String, reason: String },

    /// The selected branch, tag or HEAD does not exist.
    #[error("reference {refname} not found in {location}")]
    ReferenceNotFound { refname: String, location: String },

    /// Working tree status could not be computed.
    #[error("working tree status unavailable: {0}")]
    StatusUnavailable(String),

    /// Cloning the remote failed.
    #[error("unable to fetch {url}: {message}")]
    Transport { url: String, message: String },

    /// Any other repository read failure.
    #[error(transparent)]
    Git(#[from] GitError),
}

impl From<AuthError> for QueryError {
    fn from(err: AuthError) -> Self {
        QueryError::Configuration(err.to_string())
    }
}

impl From<QueryValidationError> for QueryError {
    fn from(err: QueryValidationError) -> Self {
        QueryError::Configuration(err.to_string())
    }
}

impl From<ConfigError> for QueryError {
    fn from(err: ConfigError) -> Self {
        QueryError::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod context {
        use super::*;

        #[test]
        fn default_values() {
            let ctx = Context::default();
            assert!(ctx.cwd.is_none());
            assert!(!ctx.quiet);
        }

        #[test]
        fn origin_defaults_to_current_dir() {
            let ctx = Context::default();
            assert_eq!(ctx.origin().unwrap(), std::env::current_dir().unwrap());
        }

        #[test]
        fn absolute_cwd_override_wins() {
            let ctx = Context {
                cwd: Some(PathBuf::from("/custom")),
                ..Default::default()
            };
            assert_eq!(ctx.origin().unwrap(), PathBuf::from("/custom"));
        }

        #[test]
        fn relative_paths_join_origin() {
            let ctx = Context {
                cwd: Some(PathBuf::from("/custom")),
                ..Default::default()
            };
            assert_eq!(
                ctx.resolve_path(Path::new("repo")).unwrap(),
                PathBuf::from("/custom/repo")
            );
            assert_eq!(
                ctx.resolve_path(Path::new("/abs")).unwrap(),
                PathBuf::from("/abs")
            );
        }
    }

    mod query_error {
        use super::*;

        #[test]
        fn conflicting_selectors_are_configuration_errors() {
            let err: QueryError = QueryValidationError::ConflictingSelectors {
                branch: "main".into(),
                tag: "v1".into(),
            }
            .into();
            assert!(matches!(err, QueryError::Configuration(_)));
            assert!(err.to_string().contains("main"));
            assert!(err.to_string().contains("v1"));
        }

        #[test]
        fn auth_errors_are_configuration_errors() {
            let err: QueryError = AuthError::EncryptedKey {
                origin: "inline private key".into(),
            }
            .into();
            assert!(matches!(err, QueryError::Configuration(_)));
        }

        #[test]
        fn messages_carry_location() {
            let err = QueryError::ReferenceNotFound {
                refname: "refs/tags/v9".into(),
                location: "/srv/repo".into(),
            };
            assert_eq!(err.to_string(), "reference refs/tags/v9 not found in /srv/repo");
        }
    }
}
