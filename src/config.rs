//! Configuration for content-index paths.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags (--root, --output)
//! 2. Environment variables (CONTENT_INDEX_ROOT, CONTENT_INDEX_OUTPUT)
//! 3. Config file (.content-index/config.yaml)
//! 4. Defaults (content/, content/index.json)
//!
//! Config file discovery:
//! - Searches current directory and parents for .content-index/config.yaml
//! - Paths in config file are relative to the directory holding .content-index/

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Directory that holds the config file
pub const CONFIG_DIR: &str = ".content-index";

pub const ENV_ROOT: &str = "CONTENT_INDEX_ROOT";
pub const ENV_OUTPUT: &str = "CONTENT_INDEX_OUTPUT";

/// Default content root, relative to the working directory
pub const DEFAULT_ROOT: &str = "content";

/// Default index file name inside the root
pub const DEFAULT_INDEX_FILE: &str = "index.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Content root (relative to the project directory)
    pub root: Option<String>,
    /// Index file location (relative to the project directory)
    pub output: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanConfig {
    /// Root-relative glob patterns to leave out of the index
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Path values read from the environment
#[derive(Debug, Clone, Default)]
struct EnvPaths {
    root: Option<PathBuf>,
    output: Option<PathBuf>,
}

impl EnvPaths {
    fn from_env() -> Self {
        Self {
            root: std::env::var_os(ENV_ROOT).map(PathBuf::from),
            output: std::env::var_os(ENV_OUTPUT).map(PathBuf::from),
        }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Content root to scan
    pub root: PathBuf,
    /// Index file to write
    pub output: PathBuf,
    /// Extra exclude patterns from the config file
    pub exclude_patterns: Vec<String>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_DIR).join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the project directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge all sources into the final configuration
fn resolve(
    overrides: &Overrides,
    env: &EnvPaths,
    file: Option<(&Path, &ConfigFile)>,
) -> ResolvedConfig {
    // Project directory is the parent of .content-index/
    let base_dir = file
        .and_then(|(path, _)| path.parent())
        .and_then(|p| p.parent())
        .unwrap_or(Path::new("."));
    let paths = file.map(|(_, config)| &config.paths);

    let root = overrides
        .root
        .clone()
        .or_else(|| env.root.clone())
        .or_else(|| {
            paths
                .and_then(|p| p.root.as_deref())
                .map(|r| resolve_path(base_dir, r))
        })
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));

    let output = overrides
        .output
        .clone()
        .or_else(|| env.output.clone())
        .or_else(|| {
            paths
                .and_then(|p| p.output.as_deref())
                .map(|o| resolve_path(base_dir, o))
        })
        .unwrap_or_else(|| root.join(DEFAULT_INDEX_FILE));

    let exclude_patterns = file
        .map(|(_, config)| config.scan.exclude.clone())
        .unwrap_or_default();

    ResolvedConfig {
        root,
        output,
        exclude_patterns,
        config_file: file.map(|(path, _)| path.to_path_buf()),
    }
}

/// Load configuration from all sources
pub fn load_config(overrides: &Overrides) -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd, overrides)
}

/// Load configuration, searching for the config file from `start`
pub fn load_config_from(start: &Path, overrides: &Overrides) -> Result<ResolvedConfig> {
    let config_path = find_config_file(start);
    let config = config_path.as_deref().map(load_config_file).transpose()?;

    let file = config_path.as_deref().zip(config.as_ref());
    Ok(resolve(overrides, &EnvPaths::from_env(), file))
}
