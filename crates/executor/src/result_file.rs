use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wlan_sweep_shared::config::AGGREGATE_MARKER;

#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("Malformed result file {}: {reason}", path.display())]
    MalformedResult { path: PathBuf, reason: String },
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to launch simulator {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// State of a result file as seen before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    Absent,
    /// Present with at most one line: the simulator has not finished writing it.
    Incomplete,
    Usable,
}

impl FileState {
    pub fn is_usable(self) -> bool {
        self == FileState::Usable
    }
}

/// Reads `path`, mapping "not found" to `None`.
async fn read_optional(path: &Path) -> Result<Option<String>, ExecutorError> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ExecutorError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn state_of(content: Option<&str>) -> FileState {
    match content {
        None => FileState::Absent,
        Some(text) if text.lines().count() <= 1 => FileState::Incomplete,
        Some(_) => FileState::Usable,
    }
}

pub async fn probe(path: &Path) -> Result<FileState, ExecutorError> {
    let content = read_optional(path).await?;
    Ok(state_of(content.as_deref()))
}

/// Reads the aggregate value of a result file.
///
/// Returns `Ok(None)` when the file is absent or incomplete, and
/// [`ExecutorError::MalformedResult`] when it is usable but carries no
/// parsable aggregate line.
pub async fn read_aggregate(path: &Path) -> Result<Option<f64>, ExecutorError> {
    let Some(content) = read_optional(path).await? else {
        return Ok(None);
    };
    if !state_of(Some(&content)).is_usable() {
        return Ok(None);
    }
    parse_aggregate(&content)
        .map(Some)
        .map_err(|reason| ExecutorError::MalformedResult {
            path: path.to_path_buf(),
            reason,
        })
}

/// Extracts the value of the first `average from all:` line.
pub fn parse_aggregate(content: &str) -> Result<f64, String> {
    let line = content
        .lines()
        .find(|line| line.starts_with(AGGREGATE_MARKER))
        .ok_or_else(|| format!("no '{}' line", AGGREGATE_MARKER))?;
    let raw = line[AGGREGATE_MARKER.len()..].trim();
    raw.parse::<f64>()
        .map_err(|e| format!("bad aggregate value '{}': {}", raw, e))
}
