//! Index builder.
//!
//! A single sequential pass: scan the root, load every content file, resolve
//! its engine, and write the aggregated catalog once at the end. Any failure
//! aborts before the write, so a broken tree never replaces a good index.

use std::path::{Path, PathBuf};

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, info, instrument};

use super::scanner::Scanner;
use crate::config::ResolvedConfig;
use crate::library::{Catalog, ContentFile, IndexRecord};

/// Errors that abort an indexing run
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("Content root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Unknown content type '{content_type}' in {}", .file.display())]
    UnknownType { file: PathBuf, content_type: String },

    #[error("Malformed content file {}: {reason}", .file.display())]
    MalformedContent { file: PathBuf, reason: String },

    #[error("Invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Number of records written
    pub records: usize,

    /// Where the index was written
    pub output: PathBuf,
}

/// Builds `index.json` for a content root
#[derive(Debug, Clone)]
pub struct Indexer {
    root: PathBuf,
    output: PathBuf,
    exclude_patterns: Vec<String>,
}

impl Indexer {
    pub fn new(root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            output: output.into(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Indexer for `root`, writing to `<root>/index.json`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output = root.join("index.json");
        Self::new(root, output)
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(config.root.clone(), config.output.clone())
            .with_excludes(config.exclude_patterns.clone())
    }

    /// Additional glob patterns (root-relative) to leave out of the index
    pub fn with_excludes(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Scan and index every content file without writing anything
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn build(&self) -> Result<Catalog, IndexError> {
        let files = Scanner::new(&self.root)
            .with_excludes(self.exclude_patterns.as_slice())?
            .excluding(&self.output)
            .scan()?;

        info!(files = files.len(), "Indexing content files");

        let mut catalog = Catalog::new();
        for file in files {
            debug!(file = %file.relative, segments = ?file.segments, "Indexing");

            let content = ContentFile::load(&file.path).await?;
            catalog.push(IndexRecord::new(file.segments, file.relative, content));
        }

        Ok(catalog)
    }

    /// Build the index and write it to the output location
    pub async fn run(&self) -> Result<BuildReport> {
        let catalog = self.build().await?;
        catalog.save(&self.output).await?;

        info!(
            records = catalog.len(),
            output = %self.output.display(),
            "Index written"
        );

        Ok(BuildReport {
            records: catalog.len(),
            output: self.output.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_for_root_output_location() {
        let indexer = Indexer::for_root("content");
        assert_eq!(indexer.root(), Path::new("content"));
        assert_eq!(indexer.output(), Path::new("content/index.json"));
    }

    #[test]
    fn test_error_messages_name_the_file() {
        let err = IndexError::UnknownType {
            file: PathBuf::from("content/a/x.json"),
            content_type: "quiz".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown content type 'quiz' in content/a/x.json"
        );
    }

    #[tokio::test]
    async fn test_build_empty_root() {
        let temp = TempDir::new().unwrap();
        let catalog = Indexer::for_root(temp.path()).build().await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_build_rejects_non_utf8_content() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("broken.json"), [0xff, 0xfe, 0x00]).unwrap();

        let result = Indexer::for_root(temp.path()).build().await;
        assert!(matches!(result, Err(IndexError::MalformedContent { .. })));
    }
}
