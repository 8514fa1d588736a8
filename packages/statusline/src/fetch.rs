//! Rate-limited `git fetch` of the upstream branch.
//!
//! No state is kept between runs: the time of the last fetch is read back
//! from the reflog of the remote-tracking ref every time.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing::{debug, instrument};

use crate::git::Git;

/// Fetch interval used when none is configured or the configured value is invalid.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Parse a fetch interval given in whole minutes.
///
/// `0` means fetch on every run. Missing, negative, fractional, or otherwise
/// unparsable values use [`DEFAULT_INTERVAL`].
pub fn parse_interval(minutes: Option<&str>) -> Duration {
    minutes
        .map(str::trim)
        .and_then(|minutes| minutes.parse::<u64>().ok())
        .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
        .unwrap_or(DEFAULT_INTERVAL)
}

/// Fetch the upstream of the current branch in `root` if the last fetch is
/// at least `interval` old.
///
/// Failures are logged and otherwise ignored.
#[instrument(skip(git))]
pub fn maybe_fetch(git: &Git, root: &Path, interval: Duration) {
    let upstream = match git.upstream(root) {
        Ok(upstream) => upstream,
        Err(error) => {
            debug!(?error, "no upstream, skipping fetch");
            return;
        }
    };

    let Some((remote, branch)) = split_upstream(&upstream) else {
        debug!(%upstream, "upstream is not a remote branch, skipping fetch");
        return;
    };

    let reflog = git
        .last_reflog_entry(root, &upstream)
        .unwrap_or_else(|error| {
            debug!(?error, "read upstream reflog");
            String::new()
        });
    if !should_fetch_from_reflog(&reflog, interval, SystemTime::now()) {
        debug!(%upstream, "fetched recently, skipping fetch");
        return;
    }

    match git.fetch(root, remote, branch) {
        Ok(()) => debug!(%remote, %branch, "fetched upstream"),
        Err(error) => debug!(?error, "fetch upstream"),
    }
}

/// Split an upstream such as `origin/feature/x` into `("origin", "feature/x")`.
pub fn split_upstream(upstream: &str) -> Option<(&str, &str)> {
    upstream
        .split_once('/')
        .filter(|(remote, branch)| !remote.is_empty() && !branch.is_empty())
}

/// Decide whether to fetch given the most recent reflog entry of the upstream ref.
///
/// Fetches unless the entry records a fetch less than `interval` before `now`.
/// A zero interval always fetches.
pub fn should_fetch_from_reflog(reflog: &str, interval: Duration, now: SystemTime) -> bool {
    if interval.is_zero() {
        return true;
    }

    let Some(last_fetch) = last_fetch(reflog) else {
        return true;
    };

    match now.duration_since(last_fetch) {
        Ok(elapsed) => elapsed >= interval,
        // The last fetch is in the future; treat it as fresh.
        Err(_) => false,
    }
}

/// Time of the fetch recorded by a `reflog show --date=unix` line, if it is one.
///
/// Lines look like `abc1234 origin/main@{1700000000}: fetch: fast-forward`.
fn last_fetch(reflog: &str) -> Option<SystemTime> {
    let line = reflog.lines().next()?.trim();
    let (_sha, rest) = line.split_once(' ')?;
    let (selector, message) = rest.split_once(": ")?;
    if !message.contains("fetch") && !message.contains("pull") {
        return None;
    }

    let timestamp = selector
        .rsplit_once("@{")?
        .1
        .strip_suffix('}')?
        .parse::<u64>()
        .ok()?;
    UNIX_EPOCH.checked_add(Duration::from_secs(timestamp))
}
