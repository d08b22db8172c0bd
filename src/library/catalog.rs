//! Catalog of indexed content.
//!
//! The catalog is the in-memory form of `index.json`: a flat list of records
//! that the player browses as a folder tree.

use std::borrow::Cow;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use super::content::{ContentFile, ContentType, Engine};

/// Catalog of all indexed content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    /// Records in index order
    pub records: Vec<IndexRecord>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from an index file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read index: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse index JSON: {}", path.display()))
    }

    /// Pretty-printed JSON, two-space indent, non-ASCII kept as-is
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize index")
    }

    /// Write the catalog to `path`, replacing any existing file.
    ///
    /// The JSON goes to a temp file next to the target and is renamed into
    /// place, so readers never observe a half-written index.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

        let target = path.to_path_buf();
        tokio::task::spawn_blocking(move || write_atomic(&parent, &target, json.as_bytes()))
            .await
            .context("Index writer task failed")?
    }

    /// Append a record
    pub fn push(&mut self, record: IndexRecord) {
        self.records.push(record);
    }

    /// Folders and items visible at a path prefix.
    ///
    /// Records below the prefix contribute their next path segment as a
    /// folder; records directly at the prefix are items.
    pub fn browse<S: AsRef<str>>(&self, prefix: &[S]) -> Listing<'_> {
        let mut listing = Listing::default();

        for record in &self.records {
            if !record.is_under(prefix) {
                continue;
            }

            if let Some(folder) = record.path.get(prefix.len()) {
                if !listing.folders.contains(folder) {
                    listing.folders.push(folder.clone());
                }
            } else {
                listing.items.push(record);
            }
        }

        listing
    }

    /// Search records by query (case-insensitive substring match)
    pub fn search(&self, query: &str) -> Vec<&IndexRecord> {
        let query_lower = query.to_lowercase();

        self.records
            .iter()
            .filter(|record| {
                record.title_text().to_lowercase().contains(&query_lower)
                    || record
                        .description_text()
                        .to_lowercase()
                        .contains(&query_lower)
                    || record
                        .path
                        .iter()
                        .any(|p| p.to_lowercase().contains(&query_lower))
            })
            .collect()
    }

    /// Filter records by content type
    pub fn filter_by_type(&self, content_type: ContentType) -> Vec<&IndexRecord> {
        self.records
            .iter()
            .filter(|record| record.content_type == content_type)
            .collect()
    }

    /// Filter records by engine
    pub fn filter_by_engine(&self, engine: Engine) -> Vec<&IndexRecord> {
        self.records
            .iter()
            .filter(|record| record.engine == engine)
            .collect()
    }

    /// Get the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn write_atomic(dir: &Path, target: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("Failed to write index: {}", target.display()))?;
    tmp.persist(target)
        .with_context(|| format!("Failed to write index: {}", target.display()))?;
    Ok(())
}

/// One entry of the index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    /// Directory segments below the content root
    pub path: Vec<String>,

    #[serde(rename = "type")]
    pub content_type: ContentType,

    /// Copied as-is from the content file
    pub title: Value,

    pub description: Value,

    /// Engine that plays this content
    pub engine: Engine,

    /// File location relative to the content root, `/`-separated
    pub file: String,
}

impl IndexRecord {
    /// Build a record from a parsed content file
    pub fn new(path: Vec<String>, file: impl Into<String>, content: ContentFile) -> Self {
        Self {
            path,
            content_type: content.content_type,
            engine: content.engine(),
            title: content.title,
            description: content.description,
            file: file.into(),
        }
    }

    /// Title for display; null is empty, other non-strings render as JSON
    pub fn title_text(&self) -> Cow<'_, str> {
        value_text(&self.title)
    }

    pub fn description_text(&self) -> Cow<'_, str> {
        value_text(&self.description)
    }

    /// Whether this record lives at or below `prefix`
    pub fn is_under<S: AsRef<str>>(&self, prefix: &[S]) -> bool {
        prefix.len() <= self.path.len()
            && prefix
                .iter()
                .zip(&self.path)
                .all(|(p, segment)| p.as_ref() == segment)
    }
}

fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// What the player shows at one folder
#[derive(Debug, Default)]
pub struct Listing<'a> {
    /// Sub-folders, in first-seen order
    pub folders: Vec<String>,

    /// Content directly in this folder
    pub items: Vec<&'a IndexRecord>,
}
