use std::sync::Mutex;

use tracing::info;

use crate::core::unit::SourceTarget;
use crate::fetch::{source_spec, FetchError, Fetcher};

/// Records what would be fetched without touching the network or disk.
#[derive(Debug, Default)]
pub struct DryRunFetcher {
    requested: Mutex<Vec<SourceTarget>>,
}

impl DryRunFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<SourceTarget> {
        self.requested
            .lock()
            .map(|requested| requested.clone())
            .unwrap_or_default()
    }
}

impl Fetcher for DryRunFetcher {
    fn materialize(&self, group: &str, version: Option<&str>) -> Result<(), FetchError> {
        info!("would fetch source package {}", source_spec(group, version));
        if let Ok(mut requested) = self.requested.lock() {
            requested.push(SourceTarget {
                name: group.to_string(),
                version: version.map(str::to_string),
            });
        }
        Ok(())
    }
}
