use std::fs;
use std::path::PathBuf;

use md5::{Digest, Md5};
use tracing::{debug, warn};

use crate::error::LpsnError;
use crate::lpsn::PageFetcher;
use crate::store::write_bytes_atomic;

/// Permanent read-through cache of fetched pages, one file per URL.
///
/// Entries are never refreshed. A stale page goes away only when its file
/// is deleted by hand.
pub struct PageCache<F: PageFetcher> {
    dir: PathBuf,
    fetcher: F,
}

impl<F: PageFetcher> PageCache<F> {
    pub fn new(dir: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
        }
    }

    pub fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.html", url_hash(url)))
    }

    /// Returns the cached body, or fetches and stores it.
    ///
    /// A failed fetch is logged and yields `Ok(None)`; nothing is written.
    /// Only local filesystem problems surface as errors.
    pub fn fetch_or_read(&self, url: &str) -> Result<Option<String>, LpsnError> {
        fs::create_dir_all(&self.dir).map_err(|err| {
            LpsnError::Filesystem(format!("create {}: {err}", self.dir.display()))
        })?;

        let path = self.entry_path(url);
        if path.exists() {
            debug!(url, path = %path.display(), "cache hit");
            let text = fs::read_to_string(&path)
                .map_err(|err| LpsnError::Filesystem(format!("read {}: {err}", path.display())))?;
            return Ok(Some(text));
        }

        debug!(url, "cache miss");
        match self.fetcher.get(url) {
            Ok(text) => {
                write_bytes_atomic(&path, text.as_bytes())?;
                Ok(Some(text))
            }
            Err(err) => {
                warn!(url, error = %err, "failure to fetch web content");
                Ok(None)
            }
        }
    }
}

pub fn url_hash(url: &str) -> String {
    format!("{:x}", Md5::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_hash_is_md5_hex() {
        assert_eq!(url_hash(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(url_hash("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
