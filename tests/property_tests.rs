//! Property-based tests for selectors, ref names and discovery.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated inputs.

use std::path::Path;
use std::process::Command;

use proptest::prelude::*;
use tempfile::TempDir;

use repostamp::auth::Auth;
use repostamp::core::query::{QueryValidationError, RepositoryQuery, Selector};
use repostamp::core::types::{BranchName, Oid, RefName, TagName};
use repostamp::engine::{read_repository, Context};

/// Strategy for generating valid ref name characters.
fn ref_name_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
        Just('/'),
    ]
}

/// Strategy for generating names that pass ref name validation.
fn valid_ref_name() -> impl Strategy<Value = String> {
    prop::collection::vec(ref_name_char(), 1..40).prop_filter_map(
        "must be a valid ref name",
        |chars| {
            let name: String = chars.into_iter().collect();
            let bad = name.starts_with(['.', '-', '/'])
                || name.ends_with(['/', '.'])
                || name.ends_with(".lock")
                || name.contains("..")
                || name.contains("//")
                || name
                    .split('/')
                    .any(|c| c.starts_with('.') || c.ends_with(".lock"));
            (!bad).then_some(name)
        },
    )
}

/// Strategy for generating valid hex OIDs.
fn valid_oid_string() -> impl Strategy<Value = String> {
    "[0-9a-f]{40}"
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .output()
        .expect("git command failed");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    run_git(dir.path(), &["init", "-b", "main"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);
    run_git(dir.path(), &["config", "user.name", "Test User"]);
    run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
    std::fs::write(dir.path().join("README.md"), "# Test Repo\n").unwrap();
    run_git(dir.path(), &["add", "README.md"]);
    run_git(dir.path(), &["commit", "-m", "Initial commit"]);
    dir
}

proptest! {
    /// Branch and tag together are always rejected, whatever the names.
    #[test]
    fn branch_and_tag_are_exclusive(branch in ".*", tag in ".*") {
        let query = RepositoryQuery {
            branch: Some(branch),
            tag: Some(tag),
            ..Default::default()
        };
        let is_conflict = matches!(
            query.selector(),
            Err(QueryValidationError::ConflictingSelectors { .. })
        );
        prop_assert!(is_conflict);
    }

    /// A valid branch name survives the trip through its full ref name.
    #[test]
    fn branch_ref_short_name_roundtrip(name in valid_ref_name()) {
        let branch = BranchName::new(&name).unwrap();
        let refname = RefName::for_branch(&branch);

        prop_assert_eq!(refname.short_name(), name.as_str());
        prop_assert_eq!(RefName::new(refname.as_str()).unwrap(), refname.clone());
    }

    /// A valid tag name survives the trip through its full ref name.
    #[test]
    fn tag_ref_short_name_roundtrip(name in valid_ref_name()) {
        let tag = TagName::new(&name).unwrap();
        let refname = RefName::for_tag(&tag);

        prop_assert_eq!(refname.short_name(), name.as_str());
    }

    /// A single valid selector always validates to the matching variant.
    #[test]
    fn single_selector_validates(name in valid_ref_name(), as_tag in any::<bool>()) {
        let query = if as_tag {
            RepositoryQuery { tag: Some(name), ..Default::default() }
        } else {
            RepositoryQuery { branch: Some(name), ..Default::default() }
        };
        let selector = query.selector().unwrap();
        prop_assert_eq!(matches!(selector, Selector::Tag(_)), as_tag);
    }

    /// OIDs are normalized to lowercase.
    #[test]
    fn oid_normalized_to_lowercase(oid_str in valid_oid_string()) {
        let oid = Oid::new(oid_str.to_uppercase()).unwrap();
        prop_assert_eq!(oid.as_str(), oid_str.as_str());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    /// Discovery finds the repository at any depth and reports the exact
    /// nested path.
    #[test]
    fn discovery_reports_nested_path(
        segments in prop::collection::vec("[a-z][a-z0-9_-]{0,7}", 0..6)
    ) {
        let repo = init_repo();
        let nested = segments
            .iter()
            .fold(repo.path().to_path_buf(), |dir, seg| dir.join(seg));
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = Context { cwd: Some(nested), ..Default::default() };
        let report = read_repository(&ctx, &RepositoryQuery::default(), &Auth::anonymous()).unwrap();

        prop_assert_eq!(report.relative_path, segments.join("/"));
        prop_assert_eq!(report.id, "refs/heads/main");
    }

    /// Any branch name git accepts resolves back to itself.
    #[test]
    fn created_branches_resolve(name in valid_ref_name()) {
        prop_assume!(name != "main" && !name.starts_with("main/"));

        let repo = init_repo();
        run_git(repo.path(), &["branch", &name]);

        let query = RepositoryQuery {
            path: Some(repo.path().to_path_buf()),
            branch: Some(name.clone()),
            ..Default::default()
        };
        let report = read_repository(&Context::default(), &query, &Auth::anonymous()).unwrap();

        prop_assert_eq!(report.branch, name.clone());
        prop_assert_eq!(report.id, format!("refs/heads/{name}"));
    }
}
