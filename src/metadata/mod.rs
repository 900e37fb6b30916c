use std::path::PathBuf;

use thiserror::Error;

use crate::config::MetadataConfig;

pub mod apt;
pub mod control;
pub mod memory;
pub mod packages_file;
pub mod traits;

pub use traits::{MetadataProvider, UnitMetadata};

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("unable to find info for package '{0}'")]
    UnitNotFound(String),
    #[error("failed to run {command}: {source}")]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed control data at line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderKind {
    AptCache(Vec<String>),
    PackagesFile(PathBuf),
}

impl ProviderKind {
    pub fn from_config(config: &MetadataConfig) -> Self {
        match config.packages_file.as_ref() {
            Some(path) => ProviderKind::PackagesFile(path.clone()),
            None => ProviderKind::AptCache(config.command.clone()),
        }
    }
}

pub fn provider_for(kind: &ProviderKind) -> Result<Box<dyn MetadataProvider>, MetadataError> {
    match kind {
        ProviderKind::AptCache(command) => {
            Ok(Box::new(apt::AptCacheProvider::new(command.clone())))
        }
        ProviderKind::PackagesFile(path) => {
            Ok(Box::new(packages_file::PackagesFileProvider::load(path)?))
        }
    }
}
