//! Working directory resolution from the JSON payload on stdin.
//!
//! Editors such as Claude Code pipe a JSON object describing the session to
//! the status line command. Only the working directory is used; every other
//! field is ignored.

use std::env;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument};

/// The subset of the stdin payload this tool reads.
#[derive(Debug, Default, Deserialize)]
pub struct Payload {
    /// The current working directory.
    #[serde(default)]
    pub cwd: Option<String>,

    /// Workspace information, sent by newer Claude Code versions.
    ///
    /// A malformed `workspace` is dropped without discarding the rest of the payload.
    #[serde(default, deserialize_with = "lenient")]
    pub workspace: Option<Workspace>,
}

/// The `workspace` object of the payload.
#[derive(Debug, Default, Deserialize)]
pub struct Workspace {
    /// The directory the session is currently in.
    #[serde(default, deserialize_with = "lenient")]
    pub current_dir: Option<String>,
}

/// Deserialize an optional field, treating a value of the wrong shape as absent.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value)
        .inspect_err(|error| debug!(?error, "ignore malformed payload field"))
        .ok())
}

impl Payload {
    /// The working directory named by the payload, if any.
    pub fn working_dir(&self) -> Option<PathBuf> {
        let workspace_dir = self
            .workspace
            .as_ref()
            .and_then(|workspace| workspace.current_dir.as_deref());

        [self.cwd.as_deref(), workspace_dir]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|dir| !dir.is_empty())
            .map(PathBuf::from)
    }
}

/// Read the working directory from a JSON payload.
///
/// Returns `None` for empty or unparsable input, or a payload that names no
/// directory.
pub fn read_cwd(mut reader: impl Read) -> Option<PathBuf> {
    let mut content = String::new();
    if let Err(error) = reader.read_to_string(&mut content) {
        debug!(?error, "read payload");
        return None;
    }
    if content.trim().is_empty() {
        return None;
    }

    match serde_json::from_str::<Payload>(&content) {
        Ok(payload) => payload.working_dir(),
        Err(error) => {
            debug!(?error, "parse payload");
            None
        }
    }
}

/// The directory to report on: the payload's directory if stdin carries one,
/// otherwise the process working directory.
///
/// Stdin is not read when it is a terminal, so running the command by hand
/// does not block waiting for input.
#[instrument]
pub fn resolve_cwd() -> PathBuf {
    let stdin = io::stdin();
    let from_payload = if stdin.is_terminal() {
        None
    } else {
        read_cwd(stdin.lock())
    };

    from_payload
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
