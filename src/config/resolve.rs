use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::{ConfigError, Settings};

pub const CONFIG_FILE_NAME: &str = ".aptdeps.toml";

/// Loads settings from an explicit path, `APTDEPS_CONFIG`, or the nearest
/// `.aptdeps.toml` above `start`, in that order. Missing discovery falls back
/// to defaults; a missing explicit path is an error.
pub fn load_settings_with_override(
    start: impl AsRef<Path>,
    config_path: Option<PathBuf>,
) -> Result<Settings, ConfigError> {
    let path = match config_path {
        Some(path) => Some(path),
        None => match env::var("APTDEPS_CONFIG") {
            Ok(path) if !path.is_empty() => Some(PathBuf::from(path)),
            _ => None,
        },
    };

    let mut settings = match path {
        Some(path) => load_settings_file(&path)?,
        None => match find_config_from(start.as_ref()) {
            Some(found) => load_settings_file(&found)?,
            None => {
                debug!("no config file found, using defaults");
                Settings::default()
            }
        },
    };

    apply_env_overrides(&mut settings);
    settings.validate()?;
    Ok(settings)
}

pub fn load_settings_file(path: &Path) -> Result<Settings, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
    }

    debug!(path = %path.display(), "loading config");
    let contents = std::fs::read_to_string(path)?;
    toml::from_str(&contents).map_err(|source| ConfigError::Toml {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(path) = env::var("APTDEPS_PACKAGES_FILE") {
        if !path.is_empty() {
            settings.metadata.packages_file = Some(PathBuf::from(path));
        }
    }
    if let Ok(dest) = env::var("APTDEPS_FETCH_DEST") {
        if !dest.is_empty() {
            settings.fetch.dest = PathBuf::from(dest);
        }
    }
}

fn find_config_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}
