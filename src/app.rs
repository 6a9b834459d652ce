use serde::Serialize;

use crate::config::{RegistryConfig, UpdateOptions};
use crate::error::LpsnError;
use crate::lpsn::PageFetcher;
use crate::registry::Registry;
use crate::store::RegistryStore;
use crate::update::{TaxonUpdater, UpdateReport};

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub registry_path: String,
    pub registry_source: String,
    pub registry_rows: usize,
    pub update: Option<UpdateReport>,
}

pub struct App<F: PageFetcher> {
    config: RegistryConfig,
    fetcher: F,
}

impl<F: PageFetcher> App<F> {
    pub fn new(config: RegistryConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Loads (or builds) the registry, then updates the input table if one
    /// was given.
    pub fn run(&self, update: Option<&UpdateOptions>) -> Result<RunSummary, LpsnError> {
        let (registry, source) = RegistryStore::new(&self.config).load(&self.fetcher)?;
        let update = update
            .map(|options| self.update(&registry, options))
            .transpose()?;

        Ok(RunSummary {
            registry_path: self.config.registry_path.display().to_string(),
            registry_source: source.as_str().to_string(),
            registry_rows: registry.len(),
            update,
        })
    }

    pub fn update(
        &self,
        registry: &Registry,
        options: &UpdateOptions,
    ) -> Result<UpdateReport, LpsnError> {
        TaxonUpdater::new(registry).update(options)
    }
}
