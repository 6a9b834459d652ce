use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::Builder;
use tracing::{info, warn};

use crate::config::RegistryConfig;
use crate::error::LpsnError;
use crate::lpsn::PageFetcher;
use crate::registry::{Registry, RegistryBuilder};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySource {
    Loaded,
    Built,
    /// Every listing page failed; nothing was persisted.
    Unsaved,
}

impl RegistrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrySource::Loaded => "loaded",
            RegistrySource::Built => "built",
            RegistrySource::Unsaved => "unsaved",
        }
    }
}

/// Persisted registry file. An existing file always wins over a fresh scrape;
/// refreshing means deleting it. A scrape where no page had content is
/// returned but not saved, so the next run tries again.
pub struct RegistryStore<'a> {
    config: &'a RegistryConfig,
}

impl<'a> RegistryStore<'a> {
    pub fn new(config: &'a RegistryConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> &Path {
        &self.config.registry_path
    }

    pub fn load<F: PageFetcher>(&self, fetcher: F) -> Result<(Registry, RegistrySource), LpsnError> {
        let path = self.path();
        if path.exists() {
            let table = Table::read_csv(path)?;
            let registry = Registry::from_table(&table, path)?;
            info!(path = %path.display(), rows = registry.len(), "loaded genus registry");
            return Ok((registry, RegistrySource::Loaded));
        }

        let (registry, pages) =
            RegistryBuilder::new(self.config, fetcher).build_with_page_count()?;
        if pages == 0 {
            warn!(path = %path.display(), "no genus page could be fetched; registry not saved");
            return Ok((registry, RegistrySource::Unsaved));
        }
        registry.to_table().write_csv(path)?;
        info!(path = %path.display(), "saved genus registry");
        Ok((registry, RegistrySource::Built))
    }
}

/// Writes through a temp file in the target directory, then renames.
pub fn write_bytes_atomic(path: &Path, content: &[u8]) -> Result<(), LpsnError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|err| LpsnError::Filesystem(err.to_string()))?;
    let mut temp = Builder::new()
        .prefix(".lpsn-genus")
        .tempfile_in(parent)
        .map_err(|err| LpsnError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| LpsnError::Filesystem(err.to_string()))?;
    temp.persist(path)
        .map_err(|err| LpsnError::Filesystem(format!("persist {}: {err}", path.display())))?;
    Ok(())
}
