//! Node Mutation: syntax-tree driven source rewriting.
//!
//! Edits are expressed against syntax nodes (insert, replace, delete, wrap,
//! re-indent) and compiled down to byte-span replacements over one immutable
//! source snapshot. Overlapping edits are detected and either dropped or
//! reported, and the survivors are spliced back to front.
//!
//! # Architecture
//!
//! - [`Adapter`] resolves nodes and dotted paths (`arguments.-1`,
//!   `retries_value`, ...) into byte ranges and source text. [`TreeSitterAdapter`]
//!   works on tree-sitter Rust trees; [`SpanAdapter`] on plain byte ranges.
//! - [`Mutation`] collects actions through its builders and runs them with
//!   [`Mutation::process`] (rewrite) or [`Mutation::test`] (report).
//! - [`Strategy`] decides what happens on overlap: keep running without the
//!   conflicting actions, or fail the call.
//!
//! # Example
//!
//! ```no_run
//! use node_mutation::ts::{queries, QueryEngine, RustParser};
//! use node_mutation::Mutation;
//!
//! let mut parser = RustParser::new()?;
//! let parsed = parser.parse_with_source("fn old_name(a: i32) {}")?;
//! let adapter = parsed.adapter();
//! let engine = QueryEngine::new(&queries::function_by_name("old_name"))?;
//!
//! let mut mutation = Mutation::new(&adapter);
//! for func in engine.captures(&parsed, "function") {
//!     mutation.replace(&func, &["name"], "new_name")?;
//! }
//! let result = mutation.process()?;
//! assert_eq!(result.new_source.as_deref(), Some("fn new_name(a: i32) {}"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod action;
pub mod adapter;
pub mod config;
pub mod conflict;
pub mod error;
pub mod mutation;
pub mod path;
pub mod range;
pub mod result;
pub mod rewrite;
pub mod strategy;
pub mod ts;

pub use action::{Action, ActionKind, Edit, GroupAction, InsertOptions, InsertPosition};
pub use adapter::{Adapter, AdapterKind, SpanAdapter, TreeSitterAdapter, Value};
pub use config::{load_from_path, load_from_str, ConfigError, MutationConfig};
pub use error::MutationError;
pub use mutation::Mutation;
pub use path::{Path, PathToken, Template};
pub use range::{Location, Range};
pub use result::MutationResult;
pub use strategy::Strategy;
