//! Build script for statusline that generates version information.
//!
//! - `STATUSLINE_VERSION` comes from `git describe --always --tags --dirty`.
//! - `STATUSLINE_BUILD` is the short commit hash of the checkout.
//!
//! Outside of a git checkout (e.g. a packaged source tarball) these fall back
//! to the crate version and `local` respectively.

use std::env;
use std::process::Command;

fn main() {
    let version = git_describe().unwrap_or_else(|error| {
        println!("cargo:warning=using package version: {error}");
        env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| String::from("dev"))
    });
    let build = short_commit().unwrap_or_else(|_| String::from("local"));

    println!("cargo:rustc-env=STATUSLINE_VERSION={version}");
    println!("cargo:rustc-env=STATUSLINE_BUILD={build}");
}

fn run(prog: &str, argv: &[&str]) -> Result<String, String> {
    let output = Command::new(prog)
        .args(argv)
        .output()
        .map_err(|e| format!("failed to execute {prog} {argv:?}: {e}"))?;
    if !output.status.success() {
        return Err(format!("{prog} {argv:?} exited with {}", output.status));
    }

    String::from_utf8(output.stdout)
        .map_err(|e| format!("non-UTF-8 output from {prog} {argv:?}: {e}"))
        .map(|stdout| stdout.trim().to_string())
        .and_then(|stdout| match stdout.is_empty() {
            true => Err(format!("{prog} {argv:?} produced no output")),
            false => Ok(stdout),
        })
}

fn git_describe() -> Result<String, String> {
    run("git", &["describe", "--always", "--tags", "--dirty=-dirty"])
}

fn short_commit() -> Result<String, String> {
    run("git", &["rev-parse", "--short", "HEAD"])
}
