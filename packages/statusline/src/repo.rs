//! Collection of repository state for a working directory.

use std::path::Path;
use std::time::Duration;

use bon::Builder;
use tracing::{debug, instrument};

use crate::{fetch, git::Git, status::PorcelainStatus};

/// Branch label used when git reports no branch name.
pub const NO_BRANCH: &str = "no-branch";

/// The `branch.head` value git reports for a detached `HEAD`.
const DETACHED: &str = "(detached)";

/// Everything the status line shows about a directory.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct RepoInfo {
    /// Name of the repository root, or of the directory outside a repository.
    #[builder(into)]
    pub project: String,

    /// Branch name, `detached@<sha>`, or [`NO_BRANCH`].
    #[builder(into, default)]
    pub branch: String,

    /// Commits ahead of the upstream.
    #[builder(default)]
    pub ahead: u32,

    /// Commits behind the upstream.
    #[builder(default)]
    pub behind: u32,

    /// Whether tracked files have changes.
    #[builder(default)]
    pub has_tracked: bool,

    /// Whether untracked files exist.
    #[builder(default)]
    pub has_untracked: bool,

    /// Whether the directory is inside a git repository.
    #[builder(default)]
    pub is_git: bool,
}

/// How repository state is collected.
#[derive(Debug, Clone)]
pub struct Options {
    /// Runner for git invocations.
    pub git: Git,

    /// Fetch the upstream when the last fetch is older than this. `None`
    /// disables fetching.
    pub fetch_interval: Option<Duration>,
}

/// Collect the state of the repository containing `cwd`.
///
/// Never fails: anything git cannot tell us is left at its default so that
/// something can still be rendered.
#[instrument(skip(options))]
pub fn collect(cwd: &Path, options: &Options) -> RepoInfo {
    let git = &options.git;

    let root = match git.toplevel(cwd) {
        Ok(root) => root,
        Err(error) => {
            debug!(?error, "not a git repository");
            return RepoInfo::builder().project(project_name(cwd)).build();
        }
    };
    let root = Path::new(&root);

    if let Some(interval) = options.fetch_interval {
        fetch::maybe_fetch(git, root, interval);
    }

    let output = git.status(root).unwrap_or_else(|error| {
        debug!(?error, "read status");
        String::new()
    });
    let status = PorcelainStatus::parse(&output);

    let branch = match status.branch.as_deref() {
        None | Some("") => String::from(NO_BRANCH),
        Some(DETACHED) => match git.short_head(root) {
            Ok(sha) => format!("detached@{sha}"),
            Err(error) => {
                debug!(?error, "read detached head");
                String::from(DETACHED)
            }
        },
        Some(branch) => branch.to_string(),
    };

    RepoInfo::builder()
        .project(project_name(root))
        .branch(branch)
        .ahead(status.ahead)
        .behind(status.behind)
        .has_tracked(status.has_tracked)
        .has_untracked(status.has_untracked)
        .is_git(true)
        .build()
}

/// The last component of `path`, or the whole path when it has none (e.g. `/`).
pub fn project_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or(path.as_os_str())
        .to_string_lossy()
        .into_owned()
}
