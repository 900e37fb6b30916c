use std::path::PathBuf;

use thiserror::Error;

pub mod apt;
pub mod dry_run;

pub use apt::AptSourceFetcher;
pub use dry_run::DryRunFetcher;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create {path}: {source}")]
    Destination {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{command} exited with status {code:?}")]
    Failed { command: String, code: Option<i32> },
}

impl FetchError {
    pub fn code(&self) -> Option<i32> {
        match self {
            FetchError::Failed { code, .. } => *code,
            _ => None,
        }
    }
}

/// Materializes a source group's artifacts on disk.
pub trait Fetcher {
    fn materialize(&self, group: &str, version: Option<&str>) -> Result<(), FetchError>;
}

/// `name` or `name=version`, the form `apt-get source` accepts.
pub fn source_spec(group: &str, version: Option<&str>) -> String {
    match version {
        Some(version) if !version.is_empty() => format!("{group}={version}"),
        _ => group.to_string(),
    }
}
