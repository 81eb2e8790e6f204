use std::fs;
use std::io::{ErrorKind, Write};

use camino::{Utf8Path, Utf8PathBuf};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::domain::Recipe;
use crate::error::SyncError;

pub const DEFAULT_STORE_PATH: &str = "recipes.json";

/// The JSON array of every recipe imported so far.
///
/// Entries already on disk are kept as raw JSON values so an append never
/// rewrites them, whatever shape they have.
#[derive(Debug, Clone)]
pub struct RecipeStore {
    path: Utf8PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AppendOutcome {
    pub existing: usize,
    pub appended: usize,
    pub total: usize,
}

impl RecipeStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// A missing file is an empty store.
    pub fn load(&self) -> Result<Vec<Value>, SyncError> {
        let content = match fs::read_to_string(self.path.as_std_path()) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(SyncError::Filesystem(format!(
                    "read {}: {err}",
                    self.path
                )));
            }
        };
        let value: Value =
            serde_json::from_str(&content).map_err(|err| SyncError::StoreParse(err.to_string()))?;
        match value {
            Value::Array(entries) => Ok(entries),
            _ => Err(SyncError::StoreShape),
        }
    }

    pub fn append(&self, recipes: &[Recipe]) -> Result<AppendOutcome, SyncError> {
        let mut entries = self.load()?;
        let existing = entries.len();
        for recipe in recipes {
            let value = serde_json::to_value(recipe)
                .map_err(|err| SyncError::StoreParse(err.to_string()))?;
            entries.push(value);
        }

        let content = render_store(&entries)?;
        write_atomic(&self.path, content.as_bytes())?;
        tracing::info!(
            path = %self.path,
            existing,
            appended = recipes.len(),
            "recipe store written"
        );

        Ok(AppendOutcome {
            existing,
            appended: recipes.len(),
            total: entries.len(),
        })
    }
}

/// On-disk text of the store: 4-space indents, non-ASCII kept as is, no
/// trailing newline.
pub fn render_store(entries: &[Value]) -> Result<String, SyncError> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    entries
        .serialize(&mut serializer)
        .map_err(|err| SyncError::StoreParse(err.to_string()))?;
    String::from_utf8(buf).map_err(|err| SyncError::StoreParse(err.to_string()))
}

/// Writes through a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), SyncError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    fs::create_dir_all(parent.as_std_path())
        .map_err(|err| SyncError::Filesystem(err.to_string()))?;
    let mut temp = tempfile::Builder::new()
        .prefix(".recipe-sync")
        .tempfile_in(parent.as_std_path())
        .map_err(|err| SyncError::Filesystem(err.to_string()))?;
    temp.write_all(content)
        .map_err(|err| SyncError::Filesystem(err.to_string()))?;
    if let Some(permissions) = store_permissions(path)? {
        temp.as_file()
            .set_permissions(permissions)
            .map_err(|err| SyncError::Filesystem(err.to_string()))?;
    }
    temp.persist(path.as_std_path())
        .map_err(|err| SyncError::Filesystem(err.to_string()))?;
    Ok(())
}

/// Mode of the file being replaced, or 0644 for a new one; temp files are
/// created owner-only.
fn store_permissions(path: &Utf8Path) -> Result<Option<fs::Permissions>, SyncError> {
    match fs::metadata(path.as_std_path()) {
        Ok(metadata) => Ok(Some(metadata.permissions())),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(new_file_permissions()),
        Err(err) => Err(SyncError::Filesystem(format!("stat {path}: {err}"))),
    }
}

#[cfg(unix)]
fn new_file_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;

    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions() -> Option<fs::Permissions> {
    None
}
