use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum SyncError {
    #[error("missing sheet URL file {0}")]
    #[diagnostic(help("put the spreadsheet TSV export URL in that file, or pass --url-file"))]
    MissingConfig(PathBuf),

    #[error("failed to read sheet URL file at {0}")]
    ConfigRead(PathBuf),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("sheet request failed: {0}")]
    SheetHttp(String),

    #[error("sheet returned status {status}: {message}")]
    SheetStatus { status: u16, message: String },

    #[error("sheet body is not valid UTF-8: {0}")]
    Decode(String),

    #[error("asset request failed: {0}")]
    AssetHttp(String),

    #[error("asset returned status {status}: {message}")]
    AssetStatus { status: u16, message: String },

    #[error("asset URL has no file name: {0}")]
    InvalidAssetUrl(String),

    #[error("failed to parse recipe store: {0}")]
    StoreParse(String),

    #[error("recipe store is not a JSON array")]
    StoreShape,

    #[error("filesystem error: {0}")]
    Filesystem(String),
}
