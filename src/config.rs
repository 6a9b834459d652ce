use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::LpsnError;

pub const DEFAULT_CONFIG_FILE: &str = "lpsn-genus.json";
pub const DEFAULT_CACHE_DIR: &str = "lpsnCache";
pub const DEFAULT_BASE_URL: &str = "https://lpsn.dsmz.de";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAP_FILE: &str = "map_taxon_lpsn.csv";

/// On-disk config. Every field is optional; CLI flags win over it.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub cache_dir: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Where the registry lives and how its pages are fetched.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub registry_path: PathBuf,
    pub cache_dir: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
}

impl RegistryConfig {
    pub fn new(registry_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// URL of the genus listing page for one initial letter.
    pub fn listing_url(&self, letter: char) -> String {
        format!("{}/genus?page={letter}", self.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub infile: PathBuf,
    pub outfile: PathBuf,
    /// Destination of the joined audit table, when requested.
    pub map_file: Option<PathBuf>,
}

impl UpdateOptions {
    pub fn new(infile: impl Into<PathBuf>) -> Self {
        let infile = infile.into();
        Self {
            outfile: default_outfile(&infile),
            infile,
            map_file: None,
        }
    }

    pub fn notfound_path(&self) -> PathBuf {
        notfound_path(&self.infile)
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// An explicit path must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Config, LpsnError> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| LpsnError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| LpsnError::ConfigParse(err.to_string()))
    }

    pub fn resolve(
        config: Config,
        registry: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        timeout_secs: Option<u64>,
        today: NaiveDate,
    ) -> RegistryConfig {
        let registry_path = registry
            .or_else(|| config.registry.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(default_registry_file_name(today)));

        let mut resolved = RegistryConfig::new(registry_path);
        if let Some(dir) = cache_dir.or_else(|| config.cache_dir.map(PathBuf::from)) {
            resolved.cache_dir = dir;
        }
        if let Some(base_url) = config.base_url {
            resolved.base_url = base_url;
        }
        if let Some(secs) = timeout_secs.or(config.timeout_secs) {
            resolved.timeout = Duration::from_secs(secs);
        }
        resolved
    }
}

pub fn default_registry_file_name(date: NaiveDate) -> String {
    format!("LPSN-GenusList-{}.csv", date.format("%Y%m%d"))
}

pub fn default_outfile(infile: &Path) -> PathBuf {
    sibling_with_suffix(infile, "-lpsn.csv")
}

pub fn notfound_path(infile: &Path) -> PathBuf {
    sibling_with_suffix(infile, "-lpsn-notfind.csv")
}

fn sibling_with_suffix(infile: &Path, suffix: &str) -> PathBuf {
    let mut stem = infile.with_extension("").into_os_string();
    stem.push(suffix);
    PathBuf::from(stem)
}
