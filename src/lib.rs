//! content-index - Routing index for a tree of JSON content files
//!
//! Walks a content root, reads the `type`, `title` and `description` of every
//! content file, resolves the engine that plays each type, and writes the
//! whole set as one `index.json` that the player browses.
//!
//! # Modules
//!
//! - `core`: Scanning and index building (Scanner, Indexer)
//! - `library`: Content model and the index catalog
//! - `config`: Layered path configuration
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Rebuild content/index.json
//! content-index
//!
//! # Validate a tree without writing
//! content-index check --root lessons
//!
//! # Browse the index like the menu does
//! content-index list --path TI/network
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod library;

// Re-export main types at crate root for convenience
pub use core::{BuildReport, IndexError, Indexer, Scanner};
pub use library::{Catalog, ContentFile, ContentType, Engine, IndexRecord};
