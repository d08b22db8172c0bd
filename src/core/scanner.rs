//! Content file discovery.
//!
//! Walks the content root for `*.json` files, dropping previously written
//! index files and anything matching a configured exclude pattern.

use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};

use super::indexer::IndexError;

/// Marker for index files; any path containing it is never indexed
pub const INDEX_MARKER: &str = "index.json";

/// A discovered content file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedFile {
    /// Path as found on disk (root-prefixed)
    pub path: PathBuf,

    /// Directory segments between the root and the file
    pub segments: Vec<String>,

    /// Root-relative location, `/`-separated
    pub relative: String,
}

/// Finds content files below a root directory
pub struct Scanner {
    root: PathBuf,
    exclude_patterns: Vec<Pattern>,
    excluded_paths: Vec<PathBuf>,
}

impl Scanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            exclude_patterns: Vec::new(),
            excluded_paths: Vec::new(),
        }
    }

    /// Skip files whose root-relative path matches any of these globs
    pub fn with_excludes<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self, IndexError> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled = Pattern::new(pattern).map_err(|source| IndexError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            self.exclude_patterns.push(compiled);
        }
        Ok(self)
    }

    /// Never return this exact file (used for the output location)
    pub fn excluding(mut self, path: impl AsRef<Path>) -> Self {
        self.excluded_paths.push(comparable(path.as_ref()));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scan for content files, sorted by path
    pub fn scan(&self) -> Result<Vec<ScannedFile>, IndexError> {
        if !self.root.is_dir() {
            return Err(IndexError::RootNotFound(self.root.clone()));
        }

        let pattern = format!(
            "{}/**/*.json",
            Pattern::escape(&self.root.to_string_lossy())
        );
        // Hidden directories and files are only matched by a literal dot
        let options = MatchOptions {
            require_literal_leading_dot: true,
            ..MatchOptions::new()
        };
        let entries =
            glob::glob_with(&pattern, options).map_err(|source| IndexError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                IndexError::Io {
                    path,
                    source: std::io::Error::from(e),
                }
            })?;

            if !path.is_file() {
                continue;
            }

            let Some(file) = self.describe(&path) else {
                continue;
            };

            if self.is_excluded(&file) {
                continue;
            }

            files.push(file);
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn describe(&self, path: &Path) -> Option<ScannedFile> {
        let relative = normalize(path)
            .strip_prefix(normalize(&self.root))
            .ok()?
            .to_path_buf();

        let segments = relative
            .parent()
            .map(|dir| {
                dir.components()
                    .filter_map(|c| match c {
                        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        Some(ScannedFile {
            path: path.to_path_buf(),
            segments,
            relative,
        })
    }

    fn is_excluded(&self, file: &ScannedFile) -> bool {
        if file.relative.contains(INDEX_MARKER) {
            return true;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(&file.relative)) {
            return true;
        }

        !self.excluded_paths.is_empty() && self.excluded_paths.contains(&comparable(&file.path))
    }
}

/// Drop `.` components so `./content` and `content` compare equal
fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn comparable(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}
