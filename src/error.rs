use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::metadata::MetadataError;

#[derive(Debug, Error)]
pub enum AptdepsError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    #[error("failed to fetch source package '{group}': {source}")]
    Fetch {
        group: String,
        #[source]
        source: FetchError,
    },
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("interrupted")]
    Interrupted,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AptdepsError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AptdepsError::Fetch { source, .. } => match source.code() {
                Some(code) if code != 0 => code,
                _ => 1,
            },
            AptdepsError::InvalidArguments(_) => 2,
            AptdepsError::Interrupted => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, AptdepsError>;
