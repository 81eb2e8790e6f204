use std::fmt;
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// Absolute http(s) URL of the spreadsheet TSV export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetUrl(Url);

impl SheetUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SheetUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SheetUrl {
    type Err = SyncError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let url = Url::parse(value.trim()).map_err(|_| SyncError::InvalidUrl(value.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SyncError::InvalidUrl(value.to_string()));
        }
        Ok(Self(url))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
}

impl Ingredient {
    /// Splits on the first space: `"Lait 500 ml"` is `Lait` / `500 ml`.
    pub fn from_line(line: &str) -> Option<Self> {
        let (name, quantity) = line.split_once(' ')?;
        Some(Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: Option<String>,
    pub ingredients: Option<Vec<Ingredient>>,
    pub steps: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub people: Option<u32>,
}

/// Fixed fields the sheet has no columns for, keyed by a title substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipePatch {
    pub title_contains: &'static str,
    /// Minutes.
    pub duration: u32,
    pub amount: u32,
    pub people: u32,
}

pub const RECIPE_PATCHES: &[RecipePatch] = &[RecipePatch {
    title_contains: "Gâteau de semoule",
    duration: 120,
    amount: 1,
    people: 4,
}];

impl RecipePatch {
    pub fn lookup(title: &str) -> Option<&'static RecipePatch> {
        RECIPE_PATCHES
            .iter()
            .find(|patch| title.contains(patch.title_contains))
    }

    pub fn apply(&self, recipe: &mut Recipe) {
        recipe.duration = Some(self.duration);
        recipe.amount = Some(self.amount);
        recipe.people = Some(self.people);
    }
}
