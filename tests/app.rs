use std::path::Path;
use std::sync::Mutex;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use recipe_sync::app::App;
use recipe_sync::assets::AssetClient;
use recipe_sync::config::AssetConfig;
use recipe_sync::domain::SheetUrl;
use recipe_sync::error::SyncError;
use recipe_sync::fetch::SheetClient;
use recipe_sync::store::RecipeStore;

struct MockSheet {
    body: String,
    calls: Mutex<usize>,
}

impl MockSheet {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: Mutex::new(0),
        }
    }
}

impl SheetClient for MockSheet {
    fn fetch_text(&self, _url: &SheetUrl) -> Result<String, SyncError> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.body.clone())
    }
}

struct FailingSheet;

impl SheetClient for FailingSheet {
    fn fetch_text(&self, _url: &SheetUrl) -> Result<String, SyncError> {
        Err(SyncError::SheetStatus {
            status: 404,
            message: "not found".to_string(),
        })
    }
}

#[derive(Default)]
struct RecordingAssets {
    requested: Mutex<Vec<String>>,
}

impl AssetClient for RecordingAssets {
    fn download(&self, url: &str, destination: &Path) -> Result<(), SyncError> {
        self.requested.lock().unwrap().push(url.to_string());
        std::fs::write(destination, url).map_err(|err| SyncError::Filesystem(err.to_string()))
    }
}

fn sheet_url() -> SheetUrl {
    "https://docs.google.com/spreadsheets/d/abc/export?format=tsv"
        .parse()
        .unwrap()
}

fn temp_store(dir: &tempfile::TempDir) -> RecipeStore {
    RecipeStore::new(Utf8PathBuf::from_path_buf(dir.path().join("recipes.json")).unwrap())
}

#[test]
fn import_twice_appends_twice() {
    let temp = tempfile::tempdir().unwrap();
    let body = "ts\tSoupe\tEau 1l\tBouillir\nbroken row\nts\tGâteau de semoule\tSemoule 200g\tCuire\n";
    let app = App::new(
        temp_store(&temp),
        MockSheet::new(body),
        RecordingAssets::default(),
    );

    let first = app.import(&sheet_url()).unwrap();
    assert_eq!(first.outcome.appended, 2);
    assert_eq!(first.outcome.total, 2);
    assert_eq!(first.skipped_rows, 1);

    let second = app.import(&sheet_url()).unwrap();
    assert_eq!(second.outcome.existing, 2);
    assert_eq!(second.outcome.total, 4);

    let entries = app.store().load().unwrap();
    assert_eq!(entries[0]["title"], "Soupe");
    assert_eq!(entries[2]["title"], "Soupe");
    assert_eq!(entries[3]["duration"], 120);
}

#[test]
fn fetch_failure_leaves_store_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let app = App::new(temp_store(&temp), FailingSheet, RecordingAssets::default());

    let err = app.import(&sheet_url()).unwrap_err();
    assert_matches!(err, SyncError::SheetStatus { status: 404, .. });
    assert!(!app.store().path().as_std_path().exists());
}

#[test]
fn assets_are_written_in_order_under_out_dir() {
    let temp = tempfile::tempdir().unwrap();
    let out_dir = Utf8PathBuf::from_path_buf(temp.path().join("recipes").join("ext")).unwrap();
    let config = AssetConfig::resolve(
        Some(out_dir.clone()),
        vec![
            "https://example.org/js/tablesort.min.js".to_string(),
            "https://example.org/css/site.css".to_string(),
        ],
    );
    let app = App::new(
        temp_store(&temp),
        MockSheet::new(""),
        RecordingAssets::default(),
    );

    let result = app.fetch_assets(&config).unwrap();
    assert_eq!(result.assets.len(), 2);
    assert_eq!(result.assets[0].path, out_dir.join("tablesort.min.js").to_string());

    let written = std::fs::read_to_string(out_dir.join("site.css").as_std_path()).unwrap();
    assert_eq!(written, "https://example.org/css/site.css");
}
