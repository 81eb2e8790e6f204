use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use reqwest::Url;
use reqwest::blocking::Client;
use serde::Serialize;

use crate::error::SyncError;
use crate::fetch::default_headers;

pub const DEFAULT_ASSET_DIR: &str = "recipes/ext";

pub const DEFAULT_ASSET_URLS: &[&str] =
    &["https://cdn.jsdelivr.net/npm/tablesort@5/dist/tablesort.min.js"];

pub trait AssetClient: Send + Sync {
    fn download(&self, url: &str, destination: &Path) -> Result<(), SyncError>;
}

#[derive(Clone)]
pub struct AssetHttpClient {
    client: Client,
}

impl AssetHttpClient {
    pub fn new() -> Result<Self, SyncError> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| SyncError::AssetHttp(err.to_string()))?;
        Ok(Self { client })
    }
}

impl AssetClient for AssetHttpClient {
    fn download(&self, url: &str, destination: &Path) -> Result<(), SyncError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|err| SyncError::AssetHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "asset request failed".to_string());
            return Err(SyncError::AssetStatus { status, message });
        }
        let mut file =
            File::create(destination).map_err(|err| SyncError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| SyncError::Filesystem(err.to_string()))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadedAsset {
    pub url: String,
    pub path: String,
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
pub fn asset_file_name(url: &str) -> Result<String, SyncError> {
    let parsed = Url::parse(url).map_err(|_| SyncError::InvalidAssetUrl(url.to_string()))?;
    parsed
        .path_segments()
        .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
        .map(|segment| segment.to_string())
        .ok_or_else(|| SyncError::InvalidAssetUrl(url.to_string()))
}

/// Downloads every URL in order into `out_dir`, replacing same-named files.
pub fn download_assets<C: AssetClient + ?Sized>(
    client: &C,
    urls: &[String],
    out_dir: &Utf8Path,
) -> Result<Vec<DownloadedAsset>, SyncError> {
    fs::create_dir_all(out_dir.as_std_path())
        .map_err(|err| SyncError::Filesystem(format!("create {out_dir}: {err}")))?;

    let mut downloaded = Vec::with_capacity(urls.len());
    for url in urls {
        let path: Utf8PathBuf = out_dir.join(asset_file_name(url)?);
        client.download(url, path.as_std_path())?;
        tracing::info!(%url, %path, "asset downloaded");
        downloaded.push(DownloadedAsset {
            url: url.clone(),
            path: path.to_string(),
        });
    }
    Ok(downloaded)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn file_name_is_last_segment() {
        assert_eq!(
            asset_file_name("https://cdn.jsdelivr.net/npm/tablesort@5/dist/tablesort.min.js")
                .unwrap(),
            "tablesort.min.js"
        );
        assert_eq!(
            asset_file_name("https://example.org/css/site.css?v=3").unwrap(),
            "site.css"
        );
    }

    #[test]
    fn file_name_requires_a_segment() {
        assert_matches!(
            asset_file_name("https://example.org/"),
            Err(SyncError::InvalidAssetUrl(_))
        );
        assert_matches!(
            asset_file_name("not a url"),
            Err(SyncError::InvalidAssetUrl(_))
        );
    }
}
