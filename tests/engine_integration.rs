//! Integration tests for the read pipeline.
//!
//! Each test builds a real repository with the git CLI and runs
//! `read_repository` against it, the way a caller of the library would.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use repostamp::auth::Auth;
use repostamp::core::query::{RepositoryQuery, RepositoryReport};
use repostamp::engine::{read_repository, Context, QueryError};

// =============================================================================
// Test Fixtures
// =============================================================================

/// Test fixture that creates a real git repository.
struct TestRepo {
    dir: TempDir,
}

impl TestRepo {
    /// Create a new test repository with an initial commit on main.
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-b", "main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["config", "tag.gpgsign", "false"]);

        let repo = Self { dir };
        repo.commit_file("README.md", "# Test Repo\n", "Initial commit");
        repo
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file and commit it, returning the new HEAD sha.
    fn commit_file(&self, path: &str, content: &str, message: &str) -> String {
        std::fs::write(self.path().join(path), content).unwrap();
        self.git(&["add", path]);
        self.git(&["commit", "-m", message]);
        self.head_sha()
    }

    fn git(&self, args: &[&str]) {
        run_git(self.path(), args);
    }

    fn head_sha(&self) -> String {
        rev_parse(self.path(), "HEAD")
    }

    /// Context whose working directory is `sub` inside the repository.
    fn ctx_at(&self, sub: &str) -> Context {
        Context {
            cwd: Some(self.path().join(sub)),
            ..Default::default()
        }
    }

    /// Query for exactly this repository.
    fn query(&self) -> RepositoryQuery {
        RepositoryQuery {
            path: Some(self.path().to_path_buf()),
            ..Default::default()
        }
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn rev_parse(dir: &Path, rev: &str) -> String {
    let output = Command::new("git")
        .args(["rev-parse", rev])
        .current_dir(dir)
        .output()
        .expect("git rev-parse failed");
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn read(ctx: &Context, query: &RepositoryQuery) -> Result<RepositoryReport, QueryError> {
    read_repository(ctx, query, &Auth::anonymous())
}

fn read_ok(ctx: &Context, query: &RepositoryQuery) -> RepositoryReport {
    read(ctx, query).expect("query failed")
}

// =============================================================================
// Discovery Tests
// =============================================================================

mod discovery {
    use super::*;

    #[test]
    fn at_repository_root() {
        let repo = TestRepo::new();
        let report = read_ok(&repo.ctx_at(""), &RepositoryQuery::default());

        assert_eq!(report.id, "refs/heads/main");
        assert_eq!(report.branch, "main");
        assert_eq!(report.commit_sha, repo.head_sha());
        assert_eq!(report.relative_path, "");
        assert!(report.clean);
    }

    #[test]
    fn nested_directories_report_relative_path() {
        let repo = TestRepo::new();
        let nested = repo.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();

        for (sub, expected) in [("a", "a"), ("a/b", "a/b"), ("a/b/c", "a/b/c")] {
            let report = read_ok(&repo.ctx_at(sub), &RepositoryQuery::default());
            assert_eq!(report.relative_path, expected);
            assert_eq!(report.commit_sha, repo.head_sha());
        }
    }

    #[test]
    fn empty_path_and_url_mean_discovery() {
        let repo = TestRepo::new();
        std::fs::create_dir(repo.path().join("sub")).unwrap();
        let query = RepositoryQuery {
            path: Some(PathBuf::new()),
            url: Some(String::new()),
            ..Default::default()
        };

        let report = read_ok(&repo.ctx_at("sub"), &query);
        assert_eq!(report.relative_path, "sub");
    }

    #[test]
    fn no_repository_up_to_the_root() {
        let dir = TempDir::new().unwrap();
        // a checkout enclosing the temp dir would be found instead
        if dir.path().ancestors().any(|a| a.join(".git").exists()) {
            return;
        }
        let nested = dir.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        let ctx = Context {
            cwd: Some(nested),
            ..Default::default()
        };

        let err = read(&ctx, &RepositoryQuery::default()).unwrap_err();
        assert!(
            matches!(err, QueryError::RepositoryNotFound { .. }),
            "unexpected error: {err:?}"
        );
        assert!(err.to_string().contains("any parent"));
    }

    #[test]
    fn explicit_path_leaves_relative_path_empty() {
        let repo = TestRepo::new();
        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.relative_path, "");
    }

    #[test]
    fn explicit_path_to_non_repository_fails_inside_a_repository() {
        let repo = TestRepo::new();
        std::fs::create_dir(repo.path().join("plain")).unwrap();
        let query = RepositoryQuery {
            path: Some(repo.path().join("plain")),
            ..Default::default()
        };

        let err = read(&repo.ctx_at(""), &query).unwrap_err();
        assert!(
            matches!(err, QueryError::RepositoryNotFound { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn relative_explicit_path_resolves_against_cwd() {
        let repo = TestRepo::new();
        let parent = repo.path().parent().unwrap().to_path_buf();
        let name = repo.path().file_name().unwrap().to_owned();
        let ctx = Context {
            cwd: Some(parent),
            ..Default::default()
        };
        let query = RepositoryQuery {
            path: Some(PathBuf::from(name)),
            ..Default::default()
        };

        assert_eq!(read_ok(&ctx, &query).commit_sha, repo.head_sha());
    }
}

// =============================================================================
// Reference Resolution Tests
// =============================================================================

mod references {
    use super::*;

    #[test]
    fn branch_and_tag_together_fail() {
        let repo = TestRepo::new();
        repo.git(&["tag", "v1"]);
        let query = RepositoryQuery {
            branch: Some("main".into()),
            tag: Some("v1".into()),
            ..repo.query()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::Configuration(_))
        ));
    }

    #[test]
    fn invalid_selector_is_configuration_error() {
        let repo = TestRepo::new();
        let query = RepositoryQuery {
            branch: Some("bad..name".into()),
            ..repo.query()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::Configuration(_))
        ));
    }

    #[test]
    fn branch_round_trip() {
        let repo = TestRepo::new();
        repo.git(&["checkout", "-b", "feature"]);
        let feature = repo.commit_file("f.txt", "f", "feature");
        repo.git(&["checkout", "main"]);

        let query = RepositoryQuery {
            branch: Some("feature".into()),
            ..repo.query()
        };
        let report = read_ok(&Context::default(), &query);

        assert_eq!(report.id, "refs/heads/feature");
        assert_eq!(report.branch, "feature");
        assert_eq!(report.commit_sha, feature);
        assert_eq!(report.tag, "");
    }

    #[test]
    fn tag_round_trip() {
        let repo = TestRepo::new();
        let tagged = repo.head_sha();
        repo.git(&["tag", "v1.0.0"]);
        repo.commit_file("later.txt", "x", "later");

        let query = RepositoryQuery {
            tag: Some("v1.0.0".into()),
            ..repo.query()
        };
        let report = read_ok(&Context::default(), &query);

        assert_eq!(report.id, "refs/tags/v1.0.0");
        assert_eq!(report.tag, "v1.0.0");
        assert_eq!(report.branch, "");
        assert_eq!(report.commit_sha, tagged);
    }

    #[test]
    fn annotated_tag_reports_commit_not_tag_object() {
        let repo = TestRepo::new();
        let tagged = repo.head_sha();
        repo.git(&["tag", "-a", "v3.0.0", "-m", "release"]);

        let query = RepositoryQuery {
            tag: Some("v3.0.0".into()),
            ..repo.query()
        };
        let report = read_ok(&Context::default(), &query);

        assert_eq!(report.commit_sha, tagged);
        assert_ne!(report.commit_sha, rev_parse(repo.path(), "v3.0.0"));
    }

    #[test]
    fn tag_selector_skips_description() {
        let repo = TestRepo::new();
        repo.git(&["tag", "older"]);
        repo.commit_file("b.txt", "b", "second");
        repo.git(&["tag", "zzz-newest"]);

        let query = RepositoryQuery {
            tag: Some("older".into()),
            ..repo.query()
        };
        assert_eq!(read_ok(&Context::default(), &query).tag, "older");
    }

    #[test]
    fn missing_branch() {
        let repo = TestRepo::new();
        let query = RepositoryQuery {
            branch: Some("ghost".into()),
            ..repo.query()
        };

        let err = read(&Context::default(), &query).unwrap_err();
        assert!(
            matches!(&err, QueryError::ReferenceNotFound { refname, .. } if refname == "refs/heads/ghost"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn missing_tag() {
        let repo = TestRepo::new();
        let query = RepositoryQuery {
            tag: Some("v9.9.9".into()),
            ..repo.query()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn detached_head() {
        let repo = TestRepo::new();
        let first = repo.head_sha();
        repo.commit_file("b.txt", "b", "second");
        repo.git(&["checkout", "--detach", &first]);

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.id, "HEAD");
        assert_eq!(report.branch, "");
        assert_eq!(report.commit_sha, first);
    }

    #[test]
    fn empty_repository_has_no_head() {
        let dir = TempDir::new().unwrap();
        run_git(dir.path(), &["init", "-b", "main"]);
        let query = RepositoryQuery {
            path: Some(dir.path().to_path_buf()),
            ..Default::default()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::ReferenceNotFound { .. })
        ));
    }
}

// =============================================================================
// Tag Description Tests
// =============================================================================

mod describe {
    use super::*;

    #[test]
    fn no_tags_leaves_tag_empty() {
        let repo = TestRepo::new();
        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.tag, "");
    }

    #[test]
    fn tag_on_head_describes_branch() {
        let repo = TestRepo::new();
        repo.git(&["tag", "v1.0.0"]);

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.branch, "main");
        assert_eq!(report.tag, "v1.0.0");
    }

    #[test]
    fn nearest_ancestor_tag_wins() {
        let repo = TestRepo::new();
        repo.git(&["tag", "v0.1.0"]);
        repo.commit_file("b.txt", "b", "second");
        repo.git(&["tag", "-a", "v0.2.0", "-m", "annotated"]);
        repo.commit_file("c.txt", "c", "third");

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.tag, "v0.2.0");
        assert_eq!(report.id, "refs/heads/main");
    }

    #[test]
    fn greatest_name_wins_on_shared_commit() {
        let repo = TestRepo::new();
        repo.git(&["tag", "v1.0.0"]);
        repo.git(&["tag", "v1.0.1"]);
        repo.git(&["tag", "alpha"]);
        repo.commit_file("b.txt", "b", "second");

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.tag, "v1.0.1");
    }

    #[test]
    fn tags_on_other_branches_are_unreachable() {
        let repo = TestRepo::new();
        repo.git(&["checkout", "-b", "side"]);
        repo.commit_file("side.txt", "s", "side");
        repo.git(&["tag", "side-tag"]);
        repo.git(&["checkout", "main"]);

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.tag, "");
    }
}

// =============================================================================
// Status Tests
// =============================================================================

mod status {
    use super::*;

    #[test]
    fn clean_then_dirty_with_same_sha() {
        let repo = TestRepo::new();
        let before = read_ok(&Context::default(), &repo.query());
        assert!(before.clean);

        std::fs::write(repo.path().join("untracked.txt"), "new").unwrap();
        let after = read_ok(&Context::default(), &repo.query());
        assert!(!after.clean);
        assert_eq!(after.commit_sha, before.commit_sha);
    }

    #[test]
    fn modified_tracked_file_is_dirty() {
        let repo = TestRepo::new();
        std::fs::write(repo.path().join("README.md"), "changed\n").unwrap();
        assert!(!read_ok(&Context::default(), &repo.query()).clean);
    }

    #[test]
    fn ignored_file_stays_clean() {
        let repo = TestRepo::new();
        repo.commit_file(".gitignore", "target/\n", "ignore");
        std::fs::create_dir(repo.path().join("target")).unwrap();
        std::fs::write(repo.path().join("target/out"), "bin").unwrap();

        assert!(read_ok(&Context::default(), &repo.query()).clean);
    }

    #[test]
    fn bare_repository_status_unavailable() {
        let repo = TestRepo::new();
        let bare = TempDir::new().unwrap();
        run_git(
            bare.path(),
            &["clone", "--bare", repo.path().to_str().unwrap(), "bare.git"],
        );
        let query = RepositoryQuery {
            path: Some(bare.path().join("bare.git")),
            ..Default::default()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::StatusUnavailable(_))
        ));
    }
}

// =============================================================================
// URL Tests
// =============================================================================

mod urls {
    use super::*;

    #[test]
    fn local_repository_reports_origin_url() {
        let repo = TestRepo::new();
        repo.git(&["remote", "add", "origin", "https://example.com/team/app.git"]);

        let report = read_ok(&Context::default(), &repo.query());
        assert_eq!(report.url, "https://example.com/team/app.git");
    }

    #[test]
    fn local_repository_without_remotes_has_empty_url() {
        let repo = TestRepo::new();
        assert_eq!(read_ok(&Context::default(), &repo.query()).url, "");
    }

    #[test]
    fn remote_with_tag() {
        let source = TestRepo::new();
        let tagged = source.head_sha();
        source.git(&["tag", "-a", "v1.2.0", "-m", "release"]);
        source.commit_file("next.txt", "n", "next");

        let url = source.path().display().to_string();
        let query = RepositoryQuery {
            url: Some(url.clone()),
            tag: Some("v1.2.0".into()),
            ..Default::default()
        };
        let report = read_ok(&Context::default(), &query);

        assert_eq!(report.url, url);
        assert_eq!(report.id, "refs/tags/v1.2.0");
        assert_eq!(report.tag, "v1.2.0");
        assert_eq!(report.branch, "");
        assert_eq!(report.commit_sha, tagged);
        assert_eq!(report.relative_path, "");
        assert!(report.clean);
    }

    #[test]
    fn remote_with_branch() {
        let source = TestRepo::new();
        source.git(&["checkout", "-b", "release"]);
        let release = source.commit_file("r.txt", "r", "release");
        source.git(&["checkout", "main"]);

        let query = RepositoryQuery {
            url: Some(format!("file://{}", source.path().display())),
            branch: Some("release".into()),
            ..Default::default()
        };
        let report = read_ok(&Context::default(), &query);

        assert_eq!(report.id, "refs/heads/release");
        assert_eq!(report.branch, "release");
        assert_eq!(report.commit_sha, release);
    }

    #[test]
    fn url_takes_priority_over_path() {
        let source = TestRepo::new();
        let elsewhere = TempDir::new().unwrap();
        let query = RepositoryQuery {
            url: Some(source.path().display().to_string()),
            path: Some(elsewhere.path().to_path_buf()),
            ..Default::default()
        };

        assert_eq!(
            read_ok(&Context::default(), &query).commit_sha,
            source.head_sha()
        );
    }

    #[test]
    fn remote_missing_branch() {
        let source = TestRepo::new();
        let query = RepositoryQuery {
            url: Some(source.path().display().to_string()),
            branch: Some("nope".into()),
            ..Default::default()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::ReferenceNotFound { .. })
        ));
    }

    #[test]
    fn unreachable_remote_is_transport_error() {
        let gone = TempDir::new().unwrap();
        let query = RepositoryQuery {
            url: Some(format!("file://{}", gone.path().join("missing").display())),
            ..Default::default()
        };

        assert!(matches!(
            read(&Context::default(), &query),
            Err(QueryError::Transport { .. })
        ));
    }
}
