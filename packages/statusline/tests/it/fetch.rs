//! Rate-limited fetch of the upstream branch

use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::{Statusline, TestRepo};

/// An origin and a clone of it, with one origin commit the clone has not fetched.
fn stale_clone() -> (TestRepo, TestRepo) {
    let origin = TestRepo::init("origin");
    origin.commit_file("a.txt", "a\n");
    let clone = TestRepo::clone_from(&origin, "work");
    origin.commit_file("b.txt", "b\n");
    (origin, clone)
}

#[test]
fn test_fetch_disabled_by_default() {
    let (_origin, clone) = stale_clone();

    let run = Statusline::new(clone.path())
        .cwd_payload(clone.path())
        .run();

    pretty_assert_eq!(run.line(), "work on ⎇ main");
}

#[test]
fn test_fetch_with_zero_interval() {
    let (_origin, clone) = stale_clone();

    let run = Statusline::new(clone.path())
        .cwd_payload(clone.path())
        .env("STATUSLINE_FETCH", "1")
        .env("STATUSLINE_FETCH_INTERVAL", "0")
        .run();

    pretty_assert_eq!(run.line(), "work on ⎇ main ↓1");
}

#[test]
fn test_recent_fetch_is_not_repeated() {
    let (origin, clone) = stale_clone();

    // Record a fetch in the upstream reflog, then let origin move on.
    clone.git(&["fetch", "--quiet"]);
    origin.commit_file("c.txt", "c\n");

    let run = Statusline::new(clone.path())
        .cwd_payload(clone.path())
        .env("STATUSLINE_FETCH", "1")
        .env("STATUSLINE_FETCH_INTERVAL", "30")
        .run();

    pretty_assert_eq!(run.line(), "work on ⎇ main ↓1");
}

#[test]
fn test_fetch_without_upstream_is_harmless() {
    let repo = TestRepo::init("local");
    repo.commit_file("a.txt", "a\n");

    let run = Statusline::new(repo.path())
        .cwd_payload(repo.path())
        .arg("--fetch")
        .arg("--fetch-interval")
        .arg("0")
        .run();

    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.line(), "local on ⎇ main");
}
