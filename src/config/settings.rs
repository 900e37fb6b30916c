use std::path::PathBuf;

use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

/// Where unit metadata comes from and which control fields feed the graph.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_command")]
    pub command: Vec<String>,
    #[serde(default = "default_dependency_fields")]
    pub fields: Vec<String>,
    #[serde(default)]
    pub packages_file: Option<PathBuf>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            command: default_metadata_command(),
            fields: default_dependency_fields(),
            packages_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_fetch_command")]
    pub command: Vec<String>,
    #[serde(default = "default_fetch_dest")]
    pub dest: PathBuf,
    #[serde(default)]
    pub pin_versions: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            command: default_fetch_command(),
            dest: default_fetch_dest(),
            pin_versions: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_indent")]
    pub indent: String,
    #[serde(default = "default_branch")]
    pub branch: String,
    #[serde(default = "default_flat_indent")]
    pub flat_indent: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            branch: default_branch(),
            flat_indent: default_flat_indent(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.metadata.command.is_empty() {
            return Err(ConfigError::Invalid {
                key: "metadata.command",
                reason: "command must not be empty".to_string(),
            });
        }
        if self.metadata.fields.is_empty() {
            return Err(ConfigError::Invalid {
                key: "metadata.fields",
                reason: "at least one dependency field is required".to_string(),
            });
        }
        if self.fetch.command.is_empty() {
            return Err(ConfigError::Invalid {
                key: "fetch.command",
                reason: "command must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn default_metadata_command() -> Vec<String> {
    vec!["apt-cache".to_string(), "show".to_string()]
}

fn default_dependency_fields() -> Vec<String> {
    vec!["Depends".to_string()]
}

fn default_fetch_command() -> Vec<String> {
    vec!["apt-get".to_string(), "source".to_string()]
}

fn default_fetch_dest() -> PathBuf {
    PathBuf::from(".")
}

fn default_indent() -> String {
    "| ".to_string()
}

fn default_branch() -> String {
    "|-".to_string()
}

fn default_flat_indent() -> String {
    "  ".to_string()
}
