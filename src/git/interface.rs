//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations. Every
//! repository read flows through [`Git`], which returns strong types and
//! normalizes libgit2 errors into typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository at the given path
//! - [`GitError::BareRepo`]: Operation needs a working tree
//! - [`GitError::RefNotFound`]: Requested ref does not exist
//! - [`GitError::Clone`]: Fetching a remote failed
//!
//! # Example
//!
//! ```ignore
//! use repostamp::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("."))?;
//! let head = git.head()?;
//! println!("HEAD is at {}", head.oid());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::transport;
use crate::auth::Auth;
use crate::core::types::{BranchName, Oid, RefName, TagName, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository at the given path.
    #[error("repository does not exist at {path}: {message}")]
    NotARepo {
        /// The path that was opened
        path: PathBuf,
        /// libgit2's explanation
        message: String,
    },

    /// Repository is bare (no working directory).
    #[error("bare repository has no working tree")]
    BareRepo,

    /// Requested ref does not exist.
    #[error("ref not found: {refname}")]
    RefNotFound {
        /// The ref that was not found
        refname: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Cloning or fetching a remote failed.
    #[error("unable to clone {url}: {message}")]
    Clone {
        /// The remote location
        url: String,
        /// The transport error
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound | git2::ErrorCode::UnbornBranch => {
                if context == RefName::HEAD || context.starts_with("refs/") {
                    GitError::RefNotFound {
                        refname: context.to_string(),
                    }
                } else {
                    GitError::ObjectNotFound {
                        oid: context.to_string(),
                    }
                }
            }
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg)
            | TypeError::InvalidBranchName(msg)
            | TypeError::InvalidTagName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// What HEAD points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    /// HEAD is a symbolic ref to a local branch.
    Branch {
        /// Fully-qualified branch ref
        name: RefName,
        /// Commit at the branch tip
        oid: Oid,
    },
    /// HEAD points straight at a commit.
    Detached {
        /// The checked-out commit
        oid: Oid,
    },
}

impl Head {
    /// The commit HEAD resolves to.
    pub fn oid(&self) -> &Oid {
        match self {
            Head::Branch { oid, .. } | Head::Detached { oid } => oid,
        }
    }
}

/// A tag with the commit it peels to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagEntry {
    /// Short tag name
    pub name: TagName,
    /// The tagged commit (annotated tags are peeled)
    pub commit: Oid,
}

/// Summary of working tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    /// Number of staged changes
    pub staged: usize,
    /// Number of unstaged changes to tracked files
    pub unstaged: usize,
    /// Number of untracked files (if requested)
    pub untracked: usize,
    /// Whether there are unresolved conflicts
    pub has_conflicts: bool,
}

impl WorktreeStatus {
    /// Check if the worktree is completely clean.
    ///
    /// Untracked files count as changes; ignored files are never counted.
    pub fn is_clean(&self) -> bool {
        self.staged == 0 && self.unstaged == 0 && self.untracked == 0 && !self.has_conflicts
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2`. The interface is read-only: nothing here writes to a
/// repository the caller owns. [`Git::clone_remote`] only writes into the
/// caller-provided destination directory.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository at exactly `path`.
    ///
    /// `path` may be a working tree root or a git directory. Parent
    /// directories are not searched.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if `path` is not a repository
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::open(path).map_err(|e| GitError::NotARepo {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;

        Ok(Self { repo })
    }

    /// Clone `url` into `into`, fetching all tags.
    ///
    /// When `branch` is given the clone checks it out, so
    /// `refs/heads/<branch>` exists afterwards.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if `branch` does not exist on the remote
    /// - [`GitError::Clone`] for any transport or remote failure
    pub fn clone_remote(
        url: &str,
        into: &Path,
        branch: Option<&BranchName>,
        auth: &Auth,
    ) -> Result<Self, GitError> {
        let mut fetch = git2::FetchOptions::new();
        fetch.remote_callbacks(transport::remote_callbacks(auth));
        fetch.download_tags(git2::AutotagOption::All);

        let mut builder = git2::build::RepoBuilder::new();
        builder.fetch_options(fetch);
        if let Some(branch) = branch {
            builder.branch(branch.as_str());
        }

        tracing::debug!(url, into = %into.display(), branch = ?branch.map(BranchName::as_str), "cloning");

        let repo = builder.clone(url, into).map_err(|e| match branch {
            Some(branch)
                if e.code() == git2::ErrorCode::NotFound
                    && e.class() == git2::ErrorClass::Reference =>
            {
                GitError::RefNotFound {
                    refname: RefName::for_branch(branch).to_string(),
                }
            }
            _ => GitError::Clone {
                url: url.to_string(),
                message: e.message().to_string(),
            },
        })?;

        Ok(Self { repo })
    }

    // =========================================================================
    // Working Tree Status
    // =========================================================================

    /// Get working tree status summary.
    ///
    /// If `include_untracked` is false, untracked files are not counted.
    /// Ignored files are never counted.
    ///
    /// # Errors
    ///
    /// - [`GitError::BareRepo`] if there is no working tree
    pub fn worktree_status(&self, include_untracked: bool) -> Result<WorktreeStatus, GitError> {
        if self.repo.is_bare() {
            return Err(GitError::BareRepo);
        }

        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(include_untracked)
            .recurse_untracked_dirs(include_untracked)
            .include_ignored(false);

        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .map_err(GitError::internal)?;

        let mut result = WorktreeStatus::default();

        for entry in statuses.iter() {
            let status = entry.status();

            if status.is_conflicted() {
                result.has_conflicts = true;
            }

            if status.is_index_new()
                || status.is_index_modified()
                || status.is_index_deleted()
                || status.is_index_renamed()
                || status.is_index_typechange()
            {
                result.staged += 1;
            }

            if status.is_wt_modified()
                || status.is_wt_deleted()
                || status.is_wt_renamed()
                || status.is_wt_typechange()
            {
                result.unstaged += 1;
            }

            if status.is_wt_new() {
                result.untracked += 1;
            }
        }

        Ok(result)
    }

    // =========================================================================
    // Ref Resolution
    // =========================================================================

    /// Resolve a ref to the commit it ends at.
    ///
    /// Symbolic refs and annotated tags are peeled.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if the ref doesn't exist
    pub fn resolve_ref(&self, refname: &RefName) -> Result<Oid, GitError> {
        let reference = self
            .repo
            .find_reference(refname.as_str())
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?;

        let oid = reference
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, refname.as_str()))?
            .id();

        Ok(Oid::new(oid.to_string())?)
    }

    /// Read HEAD.
    ///
    /// # Errors
    ///
    /// - [`GitError::RefNotFound`] if HEAD is unborn (no commits yet)
    pub fn head(&self) -> Result<Head, GitError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitError::from_git2(e, RefName::HEAD))?;

        let commit = head
            .peel_to_commit()
            .map_err(|e| GitError::from_git2(e, RefName::HEAD))?;
        let oid = Oid::new(commit.id().to_string())?;

        if head.is_branch() {
            let name = head.name().ok_or_else(|| GitError::InvalidRefName {
                message: "HEAD points at a branch with a non-UTF-8 name".to_string(),
            })?;
            return Ok(Head::Branch {
                name: RefName::new(name)?,
                oid,
            });
        }

        Ok(Head::Detached { oid })
    }

    // =========================================================================
    // Tags and Ancestry
    // =========================================================================

    /// List all tags that peel to a commit.
    ///
    /// Tags with non-UTF-8 or invalid names, and tags of trees or blobs, are
    /// skipped.
    pub fn list_tags(&self) -> Result<Vec<TagEntry>, GitError> {
        let refs = self
            .repo
            .references_glob("refs/tags/*")
            .map_err(GitError::internal)?;

        let mut entries = Vec::new();
        for reference in refs {
            let reference = reference.map_err(GitError::internal)?;

            let name = match reference.name().and_then(|n| n.strip_prefix("refs/tags/")) {
                Some(n) => n,
                None => continue,
            };
            let name = match TagName::new(name) {
                Ok(n) => n,
                Err(_) => continue,
            };

            let commit = match reference.peel_to_commit() {
                Ok(commit) => commit.id(),
                Err(e) => {
                    tracing::trace!(tag = %name, error = e.message(), "skipping tag without a commit");
                    continue;
                }
            };

            entries.push(TagEntry {
                name,
                commit: Oid::new(commit.to_string())?,
            });
        }

        Ok(entries)
    }

    /// Walk the history of `start`, newest first, and return the first commit
    /// accepted by `matches`.
    ///
    /// The walk includes `start` itself and uses topological order with
    /// commit time as the tie-breaker, so a commit is always visited before
    /// its parents.
    pub fn find_in_history(
        &self,
        start: &Oid,
        mut matches: impl FnMut(&Oid) -> bool,
    ) -> Result<Option<Oid>, GitError> {
        let start_oid = git2::Oid::from_str(start.as_str())
            .map_err(|e| GitError::from_git2(e, start.as_str()))?;

        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;
        revwalk
            .set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)
            .map_err(GitError::internal)?;
        revwalk
            .push(start_oid)
            .map_err(|e| GitError::from_git2(e, start.as_str()))?;

        for id in revwalk {
            let id = id.map_err(GitError::internal)?;
            let oid = Oid::new(id.to_string())?;
            if matches(&oid) {
                return Ok(Some(oid));
            }
        }

        Ok(None)
    }

    // =========================================================================
    // Remote Operations
    // =========================================================================

    /// Get the URL for a remote.
    ///
    /// Returns `None` if the remote doesn't exist.
    pub fn remote_url(&self, name: &str) -> Result<Option<String>, GitError> {
        match self.repo.find_remote(name) {
            Ok(remote) => Ok(remote.url().map(String::from)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::internal(e)),
        }
    }

    /// Get the default remote name.
    ///
    /// Prefers "origin"; otherwise the first remote, or `None` if there are
    /// no remotes.
    pub fn default_remote(&self) -> Result<Option<String>, GitError> {
        let remotes = self.repo.remotes().map_err(GitError::internal)?;

        if remotes.iter().flatten().any(|name| name == "origin") {
            return Ok(Some("origin".to_string()));
        }

        Ok(remotes.iter().flatten().next().map(String::from))
    }

    /// URL of the default remote, if there is one.
    pub fn default_remote_url(&self) -> Result<Option<String>, GitError> {
        match self.default_remote()? {
            Some(name) => self.remote_url(&name),
            None => Ok(None),
        }
    }
}
