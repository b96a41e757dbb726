//! core::query
//!
//! Input and output records of a repository read.
//!
//! # Types
//!
//! - [`RepositoryQuery`] - what the caller asks for (path, url, selector)
//! - [`Selector`] - the validated branch-or-tag choice
//! - [`ResolvedReference`] - the single reference a query settled on
//! - [`RepositoryReport`] - the merged, immutable result
//!
//! # Invariants
//!
//! - A query selects at most one of branch and tag
//! - A report is built once from a resolved reference and never mutated

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{BranchName, Oid, RefName, TagName, TypeError};

/// Errors from validating a query.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryValidationError {
    /// Both a branch and a tag were requested.
    #[error("branch ({branch}) and tag ({tag}) cannot be used together")]
    ConflictingSelectors { branch: String, tag: String },

    /// A selector is not a valid ref name.
    #[error(transparent)]
    InvalidSelector(#[from] TypeError),
}

/// A request to read one repository.
///
/// Empty strings are treated the same as absent values for `path` and
/// `url`, so a caller can pass through unset fields verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryQuery {
    /// Local repository location (work tree root or `.git` directory).
    pub path: Option<PathBuf>,
    /// Remote repository location; takes priority over `path`.
    pub url: Option<String>,
    /// Branch to resolve instead of HEAD.
    pub branch: Option<String>,
    /// Tag to resolve instead of HEAD.
    pub tag: Option<String>,
}

impl RepositoryQuery {
    /// The remote URL, if one was given and is non-empty.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }

    /// The local path, if one was given and is non-empty.
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Validate the selectors and turn them into a [`Selector`].
    ///
    /// The branch/tag conflict is reported before either name is checked,
    /// so two individually invalid names still produce the conflict error.
    ///
    /// # Example
    ///
    /// ```
    /// use repostamp::core::query::{RepositoryQuery, Selector};
    ///
    /// let query = RepositoryQuery {
    ///     tag: Some("v0.1.0".into()),
    ///     ..Default::default()
    /// };
    /// assert!(matches!(query.selector(), Ok(Selector::Tag(_))));
    ///
    /// let both = RepositoryQuery {
    ///     branch: Some("main".into()),
    ///     tag: Some("v0.1.0".into()),
    ///     ..Default::default()
    /// };
    /// assert!(both.selector().is_err());
    /// ```
    pub fn selector(&self) -> Result<Selector, QueryValidationError> {
        match (&self.branch, &self.tag) {
            (Some(branch), Some(tag)) => Err(QueryValidationError::ConflictingSelectors {
                branch: branch.clone(),
                tag: tag.clone(),
            }),
            (Some(branch), None) => Ok(Selector::Branch(BranchName::new(branch.as_str())?)),
            (None, Some(tag)) => Ok(Selector::Tag(TagName::new(tag.as_str())?)),
            (None, None) => Ok(Selector::Head),
        }
    }
}

/// Which reference a query asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// Whatever HEAD points at.
    Head,
    /// A named local branch.
    Branch(BranchName),
    /// A named tag.
    Tag(TagName),
}

impl Selector {
    /// The branch to check out when cloning, if any.
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Selector::Branch(b) => Some(b),
            _ => None,
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Head => write!(f, "HEAD"),
            Selector::Branch(b) => write!(f, "branch {}", b),
            Selector::Tag(t) => write!(f, "tag {}", t),
        }
    }
}

/// What kind of reference was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Branch,
    Tag,
    Detached,
}

/// The single reference a query resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// Fully-qualified name (`refs/heads/x`, `refs/tags/y`, or `HEAD`).
    pub name: RefName,
    /// Branch, tag, or detached HEAD.
    pub kind: RefKind,
    /// The commit the reference ends up at (tags are peeled).
    pub commit: Oid,
}

impl ResolvedReference {
    /// The name without its namespace (`main`, `v1.0.0`, `HEAD`).
    pub fn short_name(&self) -> &str {
        self.name.short_name()
    }

    pub fn is_tag(&self) -> bool {
        self.kind == RefKind::Tag
    }
}

/// Final, immutable result of one repository read.
///
/// Every string field is present; unset values are empty strings so the
/// record has the same shape regardless of which path produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryReport {
    /// Fully-qualified resolved reference name; stable for an unchanged repository.
    pub id: String,
    pub url: String,
    pub branch: String,
    pub tag: String,
    pub commit_sha: String,
    pub relative_path: String,
    pub clean: bool,
}

impl RepositoryReport {
    /// Merge the component results into a report.
    ///
    /// `described` is only consulted when the reference is not itself a tag.
    pub fn build(
        reference: &ResolvedReference,
        described: Option<&TagName>,
        url: Option<&str>,
        relative_path: Option<&str>,
        clean: bool,
    ) -> Self {
        let branch = match reference.kind {
            RefKind::Branch => reference.short_name().to_string(),
            _ => String::new(),
        };
        let tag = match reference.kind {
            RefKind::Tag => reference.short_name().to_string(),
            _ => described.map(|t| t.to_string()).unwrap_or_default(),
        };

        Self {
            id: reference.name.to_string(),
            url: url.unwrap_or_default().to_string(),
            branch,
            tag,
            commit_sha: reference.commit.to_string(),
            relative_path: relative_path.unwrap_or_default().to_string(),
            clean,
        }
    }

    /// Render as `key=value` lines in a fixed field order.
    pub fn to_text(&self) -> String {
        format!(
            "id={}\nurl={}\nbranch={}\ntag={}\ncommit_sha={}\nrelative_path={}\nclean={}\n",
            self.id,
            self.url,
            self.branch,
            self.tag,
            self.commit_sha,
            self.relative_path,
            self.clean
        )
    }
}
