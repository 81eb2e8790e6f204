use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;

use crate::assets::{DEFAULT_ASSET_DIR, DEFAULT_ASSET_URLS};
use crate::domain::SheetUrl;
use crate::error::SyncError;

pub const DEFAULT_URL_FILE: &str = ".google_sheets_url";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Reads the sheet export URL from `path`, or `.google_sheets_url` in the
    /// current directory.
    pub fn resolve(path: Option<&str>) -> Result<SheetUrl, SyncError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_URL_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(SyncError::MissingConfig(config_path));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| SyncError::ConfigRead(config_path.clone()))?;
        content.trim().parse()
    }
}

#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub out_dir: Utf8PathBuf,
    pub urls: Vec<String>,
}

impl AssetConfig {
    /// Empty `urls` falls back to the built-in list.
    pub fn resolve(out_dir: Option<Utf8PathBuf>, urls: Vec<String>) -> Self {
        let urls = if urls.is_empty() {
            DEFAULT_ASSET_URLS.iter().map(|url| url.to_string()).collect()
        } else {
            urls
        };
        Self {
            out_dir: out_dir.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ASSET_DIR)),
            urls,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::resolve(None, Vec::new())
    }
}
