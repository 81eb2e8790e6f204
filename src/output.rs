use std::io::{self, Write};

use serde::Serialize;

use crate::app::{AssetsResult, ImportResult};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Human,
    Json,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_import(result: &ImportResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_assets(result: &AssetsResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

pub fn import_summary(result: &ImportResult) -> String {
    format!(
        "imported {} recipes into {} ({} total, {} rows skipped)",
        result.outcome.appended, result.store_path, result.outcome.total, result.skipped_rows
    )
}

pub fn assets_summary(result: &AssetsResult) -> String {
    format!(
        "downloaded {} assets into {}",
        result.assets.len(),
        result.out_dir
    )
}
