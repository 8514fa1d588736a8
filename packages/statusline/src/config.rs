//! Runtime configuration, read from flags or `STATUSLINE_*` environment variables.

use std::str::FromStr;
use std::time::Duration;

use clap::{Args, builder::FalseyValueParser};
use tap::Pipe;
use tracing::debug;

use crate::{fetch, git::Git, render::Style, repo::Options};

/// Default timeout for a single git invocation, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 300;

/// Default maximum branch name length before truncation.
pub const DEFAULT_MAX_BRANCH_LEN: usize = 48;

#[derive(Args, Clone, Debug, Default)]
pub struct Config {
    /// Print plain text without ANSI color codes.
    #[arg(long, env = "STATUSLINE_NO_COLOR", value_parser = FalseyValueParser::new())]
    pub no_color: bool,

    /// Fetch the upstream branch when the last fetch is older than the fetch interval.
    #[arg(long, env = "STATUSLINE_FETCH", value_parser = FalseyValueParser::new())]
    pub fetch: bool,

    /// Minutes between fetches; `0` fetches on every run.
    ///
    /// Values that are not a non-negative whole number of minutes fall back
    /// to the default of 30.
    #[arg(
        long,
        env = "STATUSLINE_FETCH_INTERVAL",
        value_name = "MINUTES",
        allow_hyphen_values = true
    )]
    pub fetch_interval: Option<String>,

    /// Timeout in milliseconds for each git invocation (default 300).
    #[arg(
        long,
        env = "STATUSLINE_TIMEOUT_MS",
        value_name = "MS",
        allow_hyphen_values = true
    )]
    pub timeout_ms: Option<String>,

    /// Branch names longer than this are truncated with `...` (default 48).
    #[arg(
        long,
        env = "STATUSLINE_MAX_BRANCH_LEN",
        value_name = "CHARS",
        allow_hyphen_values = true
    )]
    pub max_branch_len: Option<String>,
}

impl Config {
    /// The effective fetch interval.
    pub fn fetch_interval(&self) -> Duration {
        fetch::parse_interval(self.fetch_interval.as_deref())
    }

    /// The effective per-invocation git timeout.
    pub fn timeout(&self) -> Duration {
        parse_or_default("timeout-ms", self.timeout_ms.as_deref(), DEFAULT_TIMEOUT_MS)
            .pipe(Duration::from_millis)
    }

    /// The effective branch truncation length.
    pub fn max_branch_len(&self) -> usize {
        parse_or_default(
            "max-branch-len",
            self.max_branch_len.as_deref(),
            DEFAULT_MAX_BRANCH_LEN,
        )
    }

    /// Options for collecting repository state.
    pub fn options(&self) -> Options {
        Options {
            git: Git::new(self.timeout()),
            fetch_interval: self.fetch.then(|| self.fetch_interval()),
        }
    }

    /// Options for rendering the status line.
    pub fn style(&self) -> Style {
        Style {
            color: !self.no_color,
            max_branch_len: self.max_branch_len(),
        }
    }
}

/// Parse a numeric setting, keeping `default` when it is missing or invalid.
///
/// A bad value in the environment must not stop the status line from rendering.
fn parse_or_default<T: FromStr + Copy>(name: &str, value: Option<&str>, default: T) -> T {
    let Some(value) = value.map(str::trim) else {
        return default;
    };
    match value.parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            debug!(%name, %value, "invalid setting, using default");
            default
        }
    }
}
