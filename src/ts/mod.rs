//! Tree-sitter host layer for Rust sources.
//!
//! Parses Rust with the grammar bundled in `ast-grep-language` and locates
//! mutation targets with tree-sitter queries. Nodes found here are handed to
//! [`crate::adapter::TreeSitterAdapter`] for path resolution.

pub mod errors;
pub mod parser;
pub mod query;

pub use errors::TreeSitterError;
pub use parser::{ParsedSource, RustParser};
pub use query::{queries, QueryEngine, QueryMatch};
