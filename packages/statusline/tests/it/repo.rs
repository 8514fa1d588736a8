//! Rendering of real repositories

use pretty_assertions::assert_eq as pretty_assert_eq;

use crate::{Statusline, TestRepo};

#[test]
fn test_non_git_directory() {
    let tmp = tempfile::tempdir().expect("create temp dir");
    let dir = tmp.path().join("plain");
    std::fs::create_dir(&dir).expect("create dir");

    let run = Statusline::new(tmp.path()).cwd_payload(&dir).run();

    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.line(), "plain");
}

#[test]
fn test_clean_repository() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("README.md", "hello\n");

    let run = Statusline::new(repo.path()).cwd_payload(repo.path()).run();

    pretty_assert_eq!(run.exit_code, 0, "stderr: {}", run.stderr);
    pretty_assert_eq!(run.line(), "myrepo on ⎇ main");
}

#[test]
fn test_unborn_branch() {
    let repo = TestRepo::init("fresh");

    let run = Statusline::new(repo.path()).cwd_payload(repo.path()).run();

    pretty_assert_eq!(run.line(), "fresh on ⎇ main");
}

#[test]
fn test_subdirectory_uses_repository_name() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("src/lib.rs", "// lib\n");

    let subdir = repo.path().join("src");
    let run = Statusline::new(&subdir).cwd_payload(&subdir).run();

    pretty_assert_eq!(run.line(), "myrepo on ⎇ main");
}

#[test]
fn test_icon_colors() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("tracked.txt", "one\n");

    let colored = || {
        Statusline::new(repo.path())
            .cwd_payload(repo.path())
            .env("STATUSLINE_NO_COLOR", "0")
            .run()
    };

    pretty_assert_eq!(
        colored().line(),
        "myrepo on \x1b[1;38;5;82m⎇\x1b[0m main",
        "clean repository is green"
    );

    repo.write("tracked.txt", "two\n");
    pretty_assert_eq!(
        colored().line(),
        "myrepo on \x1b[1;38;5;220m⎇\x1b[0m main",
        "tracked change is yellow"
    );

    repo.write("new.txt", "untracked\n");
    pretty_assert_eq!(
        colored().line(),
        "myrepo on \x1b[1;38;5;196m⎇\x1b[0m main",
        "untracked file is red"
    );
}

#[test]
fn test_staged_change_is_tracked() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("a.txt", "a\n");
    repo.write("b.txt", "b\n");
    repo.git(&["add", "b.txt"]);

    let run = Statusline::new(repo.path())
        .cwd_payload(repo.path())
        .env("STATUSLINE_NO_COLOR", "false")
        .run();

    assert!(
        run.line().contains("\x1b[1;38;5;220m⎇"),
        "expected yellow icon, got: {:?}",
        run.line()
    );
}

#[test]
fn test_detached_head() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("a.txt", "a\n");
    repo.commit_file("b.txt", "b\n");
    repo.git(&["checkout", "--quiet", "--detach", "HEAD~1"]);
    let sha = repo.git(&["rev-parse", "--short", "HEAD"]);

    let run = Statusline::new(repo.path()).cwd_payload(repo.path()).run();

    pretty_assert_eq!(run.line(), format!("myrepo on ⎇ detached@{sha}"));
}

#[test]
fn test_ahead_and_behind() {
    let origin = TestRepo::init("origin");
    origin.commit_file("a.txt", "a\n");

    let clone = TestRepo::clone_from(&origin, "work");
    clone.commit_file("b.txt", "b\n");
    clone.commit_file("c.txt", "c\n");

    origin.commit_file("d.txt", "d\n");
    clone.git(&["fetch", "--quiet"]);

    let run = Statusline::new(clone.path()).cwd_payload(clone.path()).run();

    pretty_assert_eq!(run.line(), "work on ⎇ main ↑2 ↓1");
}

#[test]
fn test_long_branch_is_truncated() {
    let repo = TestRepo::init("myrepo");
    repo.commit_file("a.txt", "a\n");
    repo.git(&["checkout", "--quiet", "-b", "feature/a-rather-long-branch-name"]);

    let run = Statusline::new(repo.path())
        .cwd_payload(repo.path())
        .arg("--max-branch-len")
        .arg("12")
        .run();

    pretty_assert_eq!(run.line(), "myrepo on ⎇ feature/a...");
}
