use std::process::Command;

use tracing::debug;

use crate::metadata::control::parse_first_stanza;
use crate::metadata::traits::{MetadataProvider, UnitMetadata};
use crate::metadata::MetadataError;

/// Queries the local package cache by running `apt-cache show <unit>` (or a
/// configured replacement) and reading the first stanza it prints.
pub struct AptCacheProvider {
    command: Vec<String>,
}

impl AptCacheProvider {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn command_line(&self, unit: &str) -> String {
        let mut parts = self.command.clone();
        parts.push(unit.to_string());
        parts.join(" ")
    }
}

impl Default for AptCacheProvider {
    fn default() -> Self {
        Self::new(vec!["apt-cache".to_string(), "show".to_string()])
    }
}

impl MetadataProvider for AptCacheProvider {
    fn id(&self) -> &'static str {
        "apt-cache"
    }

    fn lookup(&self, unit: &str) -> Result<UnitMetadata, MetadataError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| MetadataError::UnitNotFound(unit.to_string()))?;

        debug!(command = %self.command_line(unit), "querying package metadata");
        let output = Command::new(program)
            .args(args)
            .arg(unit)
            .output()
            .map_err(|source| MetadataError::Command {
                command: self.command_line(unit),
                source,
            })?;

        if !output.status.success() {
            debug!(
                unit,
                status = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "metadata command failed"
            );
            return Err(MetadataError::UnitNotFound(unit.to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match parse_first_stanza(&stdout)? {
            Some(stanza) => Ok(UnitMetadata::new(unit, stanza)),
            None => Err(MetadataError::UnitNotFound(unit.to_string())),
        }
    }
}
