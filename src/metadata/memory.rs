use std::collections::HashMap;
use std::sync::Mutex;

use crate::metadata::control::parse_first_stanza;
use crate::metadata::traits::{MetadataProvider, UnitMetadata};
use crate::metadata::MetadataError;

/// In-memory provider for embedding and tests. Records every lookup so
/// callers can check how often the provider was consulted.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    units: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_unit(self, name: &str, depends: &str) -> Self {
        self.with_control(name, &format!("Package: {name}\nDepends: {depends}\n"))
    }

    pub fn with_source_unit(self, name: &str, source: &str, depends: &str) -> Self {
        self.with_control(
            name,
            &format!("Package: {name}\nSource: {source}\nDepends: {depends}\n"),
        )
    }

    /// Registers raw control data for `name`.
    pub fn with_control(mut self, name: &str, control: &str) -> Self {
        self.units.insert(name.to_string(), control.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups
            .lock()
            .map(|lookups| lookups.clone())
            .unwrap_or_default()
    }

    pub fn lookup_count(&self, unit: &str) -> usize {
        self.lookups().iter().filter(|name| *name == unit).count()
    }
}

impl MetadataProvider for MemoryProvider {
    fn id(&self) -> &'static str {
        "memory"
    }

    fn lookup(&self, unit: &str) -> Result<UnitMetadata, MetadataError> {
        if let Ok(mut lookups) = self.lookups.lock() {
            lookups.push(unit.to_string());
        }
        let control = self
            .units
            .get(unit)
            .ok_or_else(|| MetadataError::UnitNotFound(unit.to_string()))?;
        let stanza = parse_first_stanza(control)?
            .ok_or_else(|| MetadataError::UnitNotFound(unit.to_string()))?;
        Ok(UnitMetadata::new(unit, stanza))
    }
}
