pub mod resolve;
pub mod settings;

pub use settings::{FetchConfig, MetadataConfig, RenderConfig, Settings};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
