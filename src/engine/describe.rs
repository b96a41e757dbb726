//! engine::describe
//!
//! Find the tag that best describes an untagged commit.
//!
//! The ancestry of the commit is walked newest first, starting with the
//! commit itself. The first commit carrying a tag decides; when it carries
//! several, the lexicographically greatest name wins. No reachable tag is not
//! an error.

use std::collections::HashMap;

use crate::core::query::ResolvedReference;
use crate::core::types::{Oid, TagName};
use crate::git::{Git, GitError, TagEntry};

/// Tags grouped by the commit they point at.
#[derive(Debug, Default)]
pub struct TagIndex {
    by_commit: HashMap<Oid, Vec<TagName>>,
}

impl TagIndex {
    pub fn new(entries: impl IntoIterator<Item = TagEntry>) -> Self {
        let mut by_commit: HashMap<Oid, Vec<TagName>> = HashMap::new();
        for entry in entries {
            by_commit.entry(entry.commit).or_default().push(entry.name);
        }
        Self { by_commit }
    }

    pub fn is_empty(&self) -> bool {
        self.by_commit.is_empty()
    }

    pub fn contains(&self, commit: &Oid) -> bool {
        self.by_commit.contains_key(commit)
    }

    /// The tag chosen for `commit` among those pointing at it.
    pub fn best_for(&self, commit: &Oid) -> Option<&TagName> {
        self.by_commit.get(commit)?.iter().max()
    }
}

/// Describe `reference` with its nearest reachable tag.
///
/// Returns `None` without walking history when the reference is itself a
/// tag or the repository has no tags.
pub fn describe(git: &Git, reference: &ResolvedReference) -> Result<Option<TagName>, GitError> {
    if reference.is_tag() {
        return Ok(None);
    }

    let index = TagIndex::new(git.list_tags()?);
    if index.is_empty() {
        tracing::debug!("no tags to describe with");
        return Ok(None);
    }

    let tagged = git.find_in_history(&reference.commit, |oid| index.contains(oid))?;
    let tag = tagged.as_ref().and_then(|oid| index.best_for(oid)).cloned();

    tracing::debug!(
        commit = %reference.commit,
        tagged_commit = ?tagged.as_ref().map(Oid::as_str),
        tag = ?tag.as_ref().map(TagName::as_str),
        "described commit"
    );

    Ok(tag)
}
