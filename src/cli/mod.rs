//! Command-line interface for content-index.
//!
//! Provides commands for building the index, checking a content tree
//! without writing, and browsing or searching an existing index.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::{self, Overrides, ResolvedConfig};
use crate::core::Indexer;
use crate::library::{Catalog, ContentType, IndexRecord};

/// content-index - Builds the routing index for a content tree
#[derive(Parser, Debug)]
#[command(name = "content-index")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Content root to scan (default: content)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Index file to write (default: <root>/index.json)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Defaults to `build` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the content root and write the index
    Build,

    /// Scan and validate the content root without writing the index
    Check,

    /// Browse the index one folder at a time
    List {
        /// Folder to show, segments separated by '/' (e.g. "TI/network")
        #[arg(short, long)]
        path: Option<String>,

        /// Only show content of this type
        #[arg(short = 't', long, value_enum)]
        content_type: Option<TypeArg>,
    },

    /// Search titles, descriptions and folders in the index
    Search {
        /// Search query
        query: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Content type for CLI (maps to ContentType)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Match,
    Flow,
    Classification,
}

impl From<TypeArg> for ContentType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Match => ContentType::Match,
            TypeArg::Flow => ContentType::Flow,
            TypeArg::Classification => ContentType::Classification,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let overrides = Overrides {
            root: self.root,
            output: self.output,
        };
        let config = config::load_config(&overrides)?;

        match self.command.unwrap_or(Commands::Build) {
            Commands::Build => build_index(&config).await,
            Commands::Check => check_content(&config).await,
            Commands::List { path, content_type } => {
                list_index(&config, path.as_deref(), content_type).await
            }
            Commands::Search { query } => search_index(&config, &query).await,
            Commands::Config => show_config(&config),
        }
    }
}

/// Build and write the index
async fn build_index(config: &ResolvedConfig) -> Result<()> {
    let report = Indexer::from_config(config).run().await?;

    eprintln!(
        "[Indexed {} content files into {}]",
        report.records,
        report.output.display()
    );

    Ok(())
}

/// Index the content tree without writing
async fn check_content(config: &ResolvedConfig) -> Result<()> {
    let catalog = Indexer::from_config(config).build().await?;

    println!("{} content files OK", catalog.len());
    for engine_type in [
        ContentType::Match,
        ContentType::Flow,
        ContentType::Classification,
    ] {
        println!(
            "  {:<16} {}",
            engine_type.engine().to_string(),
            catalog.filter_by_type(engine_type).len()
        );
    }

    Ok(())
}

/// Load the index written by a previous build
async fn load_index(config: &ResolvedConfig) -> Result<Catalog> {
    if !config.output.exists() {
        anyhow::bail!(
            "Index not found at {}. Run 'content-index build' first.",
            config.output.display()
        );
    }

    Catalog::load(&config.output)
        .await
        .with_context(|| format!("Failed to load index: {}", config.output.display()))
}

/// Show folders and content at one path of the index
async fn list_index(
    config: &ResolvedConfig,
    path: Option<&str>,
    content_type: Option<TypeArg>,
) -> Result<()> {
    let catalog = load_index(config).await?;

    let prefix: Vec<&str> = path
        .map(|p| p.split('/').filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();
    let listing = catalog.browse(prefix.as_slice());
    let wanted = content_type.map(ContentType::from);

    if prefix.is_empty() {
        println!("{}", config.root.display());
    } else {
        println!("{}", prefix.join(" / "));
    }
    println!("{}", "-".repeat(60));

    for folder in &listing.folders {
        println!("  {}/", folder);
    }

    let items: Vec<&IndexRecord> = listing
        .items
        .into_iter()
        .filter(|r| wanted.map_or(true, |t| r.content_type == t))
        .collect();

    for record in &items {
        print_record(record);
    }

    if listing.folders.is_empty() && items.is_empty() {
        println!("  (empty)");
    }

    Ok(())
}

/// Search the index
async fn search_index(config: &ResolvedConfig, query: &str) -> Result<()> {
    let catalog = load_index(config).await?;
    let results = catalog.search(query);

    if results.is_empty() {
        println!("No content matching '{}'", query);
        return Ok(());
    }

    for record in results {
        print_record(record);
    }

    Ok(())
}

fn print_record(record: &IndexRecord) {
    println!(
        "  {:<24} {:<22} {}",
        record.title_text(),
        record.engine.to_string(),
        record.file
    );
    let description = record.description_text();
    if !description.is_empty() {
        println!("      {}", description);
    }
}

/// Show resolved configuration
fn show_config(config: &ResolvedConfig) -> Result<()> {
    println!(
        "Config file: {}",
        config
            .config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none)".to_string())
    );
    println!("Root:        {}", config.root.display());
    println!("Output:      {}", config.output.display());
    if config.exclude_patterns.is_empty() {
        println!("Exclude:     (none)");
    } else {
        println!("Exclude:     {}", config.exclude_patterns.join(", "));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_means_build() {
        let cli = Cli::try_parse_from(["content-index"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.root.is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["content-index", "check", "--root", "lessons"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
        assert_eq!(cli.root, Some(PathBuf::from("lessons")));
    }

    #[test]
    fn test_list_arguments() {
        let cli = Cli::try_parse_from([
            "content-index",
            "list",
            "--path",
            "TI/network",
            "-t",
            "classification",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::List { path, content_type }) => {
                assert_eq!(path.as_deref(), Some("TI/network"));
                assert_eq!(
                    content_type.map(ContentType::from),
                    Some(ContentType::Classification)
                );
            }
            other => panic!("Expected list command, got {:?}", other),
        }
    }
}
