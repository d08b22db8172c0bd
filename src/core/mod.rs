//! Core indexing logic.
//!
//! This module contains:
//! - Scanner: Content file discovery and exclusion
//! - Indexer: Builds and writes the index

pub mod indexer;
pub mod scanner;

// Re-export commonly used types
pub use indexer::{BuildReport, IndexError, Indexer};
pub use scanner::{ScannedFile, Scanner, INDEX_MARKER};
