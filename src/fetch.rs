use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::domain::SheetUrl;
use crate::error::SyncError;

pub trait SheetClient: Send + Sync {
    fn fetch_text(&self, url: &SheetUrl) -> Result<String, SyncError>;
}

#[derive(Clone)]
pub struct SheetHttpClient {
    client: Client,
}

impl SheetHttpClient {
    pub fn new() -> Result<Self, SyncError> {
        let client = Client::builder()
            .default_headers(default_headers())
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| SyncError::SheetHttp(err.to_string()))?;
        Ok(Self { client })
    }

    fn handle_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, SyncError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let message = response
            .text()
            .unwrap_or_else(|_| "sheet request failed".to_string());
        Err(SyncError::SheetStatus { status, message })
    }
}

impl SheetClient for SheetHttpClient {
    fn fetch_text(&self, url: &SheetUrl) -> Result<String, SyncError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .map_err(|err| SyncError::SheetHttp(err.to_string()))?;
        let response = Self::handle_status(response)?;
        let bytes = response
            .bytes()
            .map_err(|err| SyncError::SheetHttp(err.to_string()))?;
        tracing::info!(url = %url, bytes = bytes.len(), "fetched sheet export");
        String::from_utf8(bytes.to_vec()).map_err(|err| SyncError::Decode(err.to_string()))
    }
}

pub(crate) fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("recipe-sync/", env!("CARGO_PKG_VERSION"))),
    );
    headers
}
