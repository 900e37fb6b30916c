use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::metadata::control::{parse_stanzas, ControlStanza};
use crate::metadata::traits::{MetadataProvider, UnitMetadata};
use crate::metadata::MetadataError;

/// Serves metadata from a `Packages` index file instead of the live cache.
/// When a package appears more than once, the first stanza wins, matching
/// what `apt-cache show` reports first.
#[derive(Debug, Default)]
pub struct PackagesFileProvider {
    stanzas: HashMap<String, ControlStanza>,
}

impl PackagesFileProvider {
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let content = std::fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let provider = Self::parse(&content)?;
        debug!(
            path = %path.display(),
            units = provider.len(),
            "loaded packages index"
        );
        Ok(provider)
    }

    pub fn parse(content: &str) -> Result<Self, MetadataError> {
        let mut stanzas = HashMap::new();
        for stanza in parse_stanzas(content)? {
            let name = match stanza.get("Package") {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => continue,
            };
            stanzas.entry(name).or_insert(stanza);
        }
        Ok(Self { stanzas })
    }

    pub fn len(&self) -> usize {
        self.stanzas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stanzas.is_empty()
    }
}

impl MetadataProvider for PackagesFileProvider {
    fn id(&self) -> &'static str {
        "packages-file"
    }

    fn lookup(&self, unit: &str) -> Result<UnitMetadata, MetadataError> {
        self.stanzas
            .get(unit)
            .map(|stanza| UnitMetadata::new(unit, stanza.clone()))
            .ok_or_else(|| MetadataError::UnitNotFound(unit.to_string()))
    }
}
