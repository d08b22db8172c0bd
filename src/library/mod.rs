//! Content library and its index.
//!
//! The library is a plain directory tree of JSON content files. The index
//! sits at the top of the tree and lists every file with the engine that
//! plays it.
//!
//! # Storage Layout
//!
//! ```text
//! content/
//! ├── index.json                # Generated index of all content
//! └── <folder>/.../
//!     └── <name>.json           # { "type", "title", "description", ... }
//! ```

pub mod catalog;
pub mod content;

pub use catalog::{Catalog, IndexRecord, Listing};
pub use content::{ContentFile, ContentType, Engine};
