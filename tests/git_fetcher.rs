//! Git fetcher tests against local repositories
//!
//! Clone tests need the `git` binary; they no-op on machines without it,
//! mirroring how daemon-dependent tests guard on engine availability.

use berth::source::{GitSourceFetcher, SourceFetcher, UNKNOWN_REVISION};
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .current_dir(dir)
        .args(args)
        .status()
        .expect("failed to run git");
    assert!(status.success(), "git {:?} failed", args);
}

/// Create a local repository with one commit on the given branch
fn fixture_repo(branch: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "test"]);
    std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
    git(dir.path(), &["add", "."]);
    git(dir.path(), &["commit", "--quiet", "-m", "initial"]);
    git(dir.path(), &["branch", "-M", branch]);
    dir
}

#[tokio::test]
async fn test_clone_from_primary_branch() {
    if !git_available() {
        return;
    }

    let repo = fixture_repo("main");
    let scratch = TempDir::new().unwrap();
    let fetcher = GitSourceFetcher::new(scratch.path());

    let workspace = fetcher
        .fetch(repo.path().to_str().unwrap(), "primary")
        .await
        .unwrap();

    assert!(workspace.join("index.html").exists());
}

#[tokio::test]
async fn test_clone_falls_back_to_master_branch() {
    if !git_available() {
        return;
    }

    // Repository whose only branch is the fallback name; the primary clone
    // attempt fails and the fetch must still succeed.
    let repo = fixture_repo("master");
    let scratch = TempDir::new().unwrap();
    let fetcher = GitSourceFetcher::new(scratch.path());

    let workspace = fetcher
        .fetch(repo.path().to_str().unwrap(), "fallback")
        .await
        .unwrap();

    assert!(workspace.join("index.html").exists());

    let revision = fetcher.current_revision(&workspace).await;
    assert_ne!(revision, UNKNOWN_REVISION);
    assert_eq!(revision.len(), 40);
}

#[tokio::test]
async fn test_refetch_replaces_previous_workspace() {
    if !git_available() {
        return;
    }

    let repo = fixture_repo("main");
    let scratch = TempDir::new().unwrap();
    let fetcher = GitSourceFetcher::new(scratch.path());

    let workspace = fetcher
        .fetch(repo.path().to_str().unwrap(), "proj")
        .await
        .unwrap();
    std::fs::write(workspace.join("stale.txt"), "leftover").unwrap();

    let workspace = fetcher
        .fetch(repo.path().to_str().unwrap(), "proj")
        .await
        .unwrap();
    assert!(
        !workspace.join("stale.txt").exists(),
        "prior workspace contents leaked into the fresh clone"
    );
}

#[tokio::test]
async fn test_cleanup_after_fetch_removes_workspace() {
    if !git_available() {
        return;
    }

    let repo = fixture_repo("main");
    let scratch = TempDir::new().unwrap();
    let fetcher = GitSourceFetcher::new(scratch.path());

    let workspace = fetcher
        .fetch(repo.path().to_str().unwrap(), "proj")
        .await
        .unwrap();
    assert!(workspace.exists());

    fetcher.cleanup("proj").await;
    assert!(!workspace.exists());

    fetcher.cleanup("proj").await;
}
