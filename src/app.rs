use serde::Serialize;

use crate::assets::{AssetClient, DownloadedAsset, download_assets};
use crate::config::AssetConfig;
use crate::domain::SheetUrl;
use crate::error::SyncError;
use crate::fetch::SheetClient;
use crate::sheet::parse_sheet;
use crate::store::{AppendOutcome, RecipeStore};

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub source: String,
    pub store_path: String,
    pub skipped_rows: usize,
    #[serde(flatten)]
    pub outcome: AppendOutcome,
    pub finished_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetsResult {
    pub out_dir: String,
    pub assets: Vec<DownloadedAsset>,
    pub finished_at: String,
}

#[derive(Clone)]
pub struct App<S: SheetClient, A: AssetClient> {
    store: RecipeStore,
    sheet: S,
    assets: A,
}

impl<S: SheetClient, A: AssetClient> App<S, A> {
    pub fn new(store: RecipeStore, sheet: S, assets: A) -> Self {
        Self {
            store,
            sheet,
            assets,
        }
    }

    pub fn store(&self) -> &RecipeStore {
        &self.store
    }

    /// Fetches the sheet once, parses every row and appends the recipes to
    /// the store.
    pub fn import(&self, url: &SheetUrl) -> Result<ImportResult, SyncError> {
        let text = self.sheet.fetch_text(url)?;
        let parsed = parse_sheet(&text);
        tracing::info!(
            recipes = parsed.recipes.len(),
            skipped = parsed.skipped_rows,
            "parsed sheet"
        );
        let outcome = self.store.append(&parsed.recipes)?;

        Ok(ImportResult {
            source: url.to_string(),
            store_path: self.store.path().to_string(),
            skipped_rows: parsed.skipped_rows,
            outcome,
            finished_at: iso_timestamp(),
        })
    }

    pub fn fetch_assets(&self, config: &AssetConfig) -> Result<AssetsResult, SyncError> {
        let assets = download_assets(&self.assets, &config.urls, &config.out_dir)?;
        Ok(AssetsResult {
            out_dir: config.out_dir.to_string(),
            assets,
            finished_at: iso_timestamp(),
        })
    }
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
