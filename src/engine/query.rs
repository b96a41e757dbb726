//! engine::query
//!
//! The full read pipeline and the remote URL lookup.

use super::locate::{self, LocatedRepo, RepoLocation};
use super::{describe, resolve, status, Context, QueryError};
use crate::auth::Auth;
use crate::core::query::{RepositoryQuery, RepositoryReport};

/// Read one repository and report its state.
///
/// Validation happens before any repository access, so conflicting or
/// malformed selectors fail without touching the filesystem or network.
///
/// # Errors
///
/// See [`QueryError`]; every stage failure aborts the query.
pub fn read_repository(
    ctx: &Context,
    query: &RepositoryQuery,
    auth: &Auth,
) -> Result<RepositoryReport, QueryError> {
    let selector = query.selector()?;

    let span = tracing::debug_span!("read_repository", selector = %selector);
    let _enter = span.enter();

    let located = locate::locate(ctx, query, &selector, auth)?;
    let reference = resolve::resolve(&located.git, &selector, &located.location)?;
    let described = describe::describe(&located.git, &reference)?;
    let clean = status::is_clean(&located.git)?;
    let url = report_url(&located)?;

    let report = RepositoryReport::build(
        &reference,
        described.as_ref(),
        Some(url.as_str()),
        located.relative_path.as_deref(),
        clean,
    );

    tracing::info!(
        id = %report.id,
        commit = %report.commit_sha,
        clean = report.clean,
        "repository read"
    );

    Ok(report)
}

/// The URL to report: the caller's URL for remotes, the default remote's
/// URL for local repositories, or empty.
fn report_url(located: &LocatedRepo) -> Result<String, QueryError> {
    match &located.location {
        RepoLocation::Remote(url) => Ok(url.clone()),
        RepoLocation::Local(_) => Ok(located.git.default_remote_url()?.unwrap_or_default()),
    }
}
