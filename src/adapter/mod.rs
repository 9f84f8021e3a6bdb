//! Host-grammar adapters.
//!
//! The mutation core never inspects syntax nodes directly. Everything it needs
//! (byte ranges, source slices, named children) goes through [`Adapter`], which
//! is implemented once per host parser.

pub mod span;
pub mod tree_sitter;

pub use self::span::SpanAdapter;
pub use self::tree_sitter::TreeSitterAdapter;

use crate::error::MutationError;
use crate::path::{self, Path, Template};
use crate::range::{Location, Range};

/// Known adapter implementations, as named in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    TreeSitterRust,
    Span,
}

impl AdapterKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "tree-sitter-rust" => Some(AdapterKind::TreeSitterRust),
            "span" => Some(AdapterKind::Span),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdapterKind::TreeSitterRust => "tree-sitter-rust",
            AdapterKind::Span => "span",
        }
    }
}

/// Result of resolving one path token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value<N> {
    /// A single syntax node.
    Node(N),
    /// An ordered run of sibling nodes.
    Sequence(Vec<N>),
    /// Synthetic text computed from a node.
    Text(String),
    Number(i64),
    Bool(bool),
    /// A child the grammar allows but this node does not have.
    Absent,
}

impl<N> Value<N> {
    /// Human-readable name of the value kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Node(_) => "node",
            Value::Sequence(_) => "sequence",
            Value::Text(_) => "text",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Absent => "absent value",
        }
    }
}

/// Resolves nodes and dotted paths into ranges, source slices and values.
///
/// Implementors provide the four required methods; every other method has a
/// default built on them and on the generic path resolver.
pub trait Adapter {
    type Node: Clone;

    fn kind(&self) -> AdapterKind;

    /// The full source buffer the nodes were parsed from.
    fn file_source(&self) -> &str;

    fn node_range(&self, node: &Self::Node) -> Range;

    /// Resolve one named token (attribute or virtual accessor) against `node`.
    ///
    /// Unknown names must fail with [`MutationError::SelectorNotSupported`].
    fn child(&self, node: &Self::Node, name: &str) -> Result<Value<Self::Node>, MutationError>;

    /// Text substituted for a node inside a `{{...}}` placeholder.
    fn node_text(&self, node: &Self::Node) -> String {
        self.get_source(node).to_string()
    }

    fn get_source(&self, node: &Self::Node) -> &str {
        self.node_range(node)
            .slice(self.file_source())
            .unwrap_or_default()
    }

    /// Source spanning the first through the last node of a sequence.
    fn sequence_source(&self, nodes: &[Self::Node]) -> &str {
        match self.sequence_range(nodes) {
            Some(range) => range.slice(self.file_source()).unwrap_or_default(),
            None => "",
        }
    }

    fn sequence_range(&self, nodes: &[Self::Node]) -> Option<Range> {
        let first = nodes.first()?;
        let last = nodes.last()?;
        Some(self.node_range(first).cover(&self.node_range(last)))
    }

    /// Range of the child reached by `path`, `None` when it is legitimately absent.
    fn child_node_range(
        &self,
        node: &Self::Node,
        path: &str,
    ) -> Result<Option<Range>, MutationError> {
        let path: Path = path.parse()?;
        path::resolve_range(self, node, &path)
    }

    fn get_start(&self, node: &Self::Node, child_path: Option<&str>) -> Result<usize, MutationError> {
        Ok(self.target_range(node, child_path)?.start)
    }

    fn get_end(&self, node: &Self::Node, child_path: Option<&str>) -> Result<usize, MutationError> {
        Ok(self.target_range(node, child_path)?.end)
    }

    fn get_start_loc(
        &self,
        node: &Self::Node,
        child_path: Option<&str>,
    ) -> Result<Location, MutationError> {
        let start = self.get_start(node, child_path)?;
        Ok(Location::of_offset(self.file_source(), start))
    }

    fn get_end_loc(
        &self,
        node: &Self::Node,
        child_path: Option<&str>,
    ) -> Result<Location, MutationError> {
        let end = self.get_end(node, child_path)?;
        Ok(Location::of_offset(self.file_source(), end))
    }

    /// Range of `node`, or of its child at `child_path` when one is given.
    fn target_range(
        &self,
        node: &Self::Node,
        child_path: Option<&str>,
    ) -> Result<Range, MutationError> {
        match child_path {
            None => Ok(self.node_range(node)),
            Some(path) => self.child_node_range(node, path)?.ok_or_else(|| {
                MutationError::selector_not_supported(path, self.get_source(node))
            }),
        }
    }

    /// Substitute every `{{path}}` placeholder in `template` with child source.
    fn rewritten_source(&self, node: &Self::Node, template: &str) -> Result<String, MutationError> {
        Template::cached(template)?.render(self, node)
    }
}
