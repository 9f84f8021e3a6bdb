//! Dotted path expressions and `{{...}}` templates.
//!
//! A path such as `arguments.-1.receiver` is parsed once into typed tokens and
//! then walked against a node through an [`Adapter`]. Index tokens select from
//! ordered sequences (negative indices count from the end); named tokens are
//! handed to the adapter, except for the few accessors every sequence supports.

pub mod template;

pub use template::{cache_size, clear_cache, Segment, Template};

use crate::adapter::{Adapter, Value};
use crate::error::MutationError;
use crate::range::Range;
use std::fmt;
use std::str::FromStr;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    Index(i64),
    Name(String),
}

impl fmt::Display for PathToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathToken::Index(idx) => write!(f, "{idx}"),
            PathToken::Name(name) => f.write_str(name),
        }
    }
}

/// A parsed, non-empty dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    raw: String,
    tokens: Vec<PathToken>,
}

impl Path {
    pub fn tokens(&self) -> &[PathToken] {
        &self.tokens
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Path {
    type Err = MutationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(invalid_path(raw, "path is empty"));
        }

        let mut tokens = Vec::new();
        for part in raw.split('.') {
            if part.is_empty() {
                return Err(invalid_path(raw, "empty segment"));
            }
            if let Ok(idx) = part.parse::<i64>() {
                tokens.push(PathToken::Index(idx));
                continue;
            }
            let valid = part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '?' || c == '!');
            if !valid {
                return Err(invalid_path(raw, format!("unexpected character in '{part}'")));
            }
            tokens.push(PathToken::Name(part.to_string()));
        }

        Ok(Path {
            raw: raw.to_string(),
            tokens,
        })
    }
}

fn invalid_path(raw: &str, reason: impl Into<String>) -> MutationError {
    MutationError::InvalidPath {
        path: raw.to_string(),
        reason: reason.into(),
    }
}

/// Walk `path` from `node`, returning whatever the last token yields.
pub fn resolve<A>(adapter: &A, node: &A::Node, path: &Path) -> Result<Value<A::Node>, MutationError>
where
    A: Adapter + ?Sized,
{
    let mut current = Value::Node(node.clone());
    for token in path.tokens() {
        current = step(adapter, current, token)?;
    }
    Ok(current)
}

/// Resolve `path` to a byte range.
///
/// Sequences span their first through last element. Absent children and empty
/// sequences yield `None`; scalar results cannot be located and are rejected.
pub fn resolve_range<A>(
    adapter: &A,
    node: &A::Node,
    path: &Path,
) -> Result<Option<Range>, MutationError>
where
    A: Adapter + ?Sized,
{
    match resolve(adapter, node, path)? {
        Value::Node(child) => Ok(Some(adapter.node_range(&child))),
        Value::Sequence(children) => Ok(adapter.sequence_range(&children)),
        Value::Absent => Ok(None),
        Value::Text(_) | Value::Number(_) | Value::Bool(_) => Err(
            MutationError::selector_not_supported(path.as_str(), adapter.get_source(node)),
        ),
    }
}

fn step<A>(
    adapter: &A,
    current: Value<A::Node>,
    token: &PathToken,
) -> Result<Value<A::Node>, MutationError>
where
    A: Adapter + ?Sized,
{
    match (current, token) {
        (Value::Node(node), PathToken::Name(name)) => adapter.child(&node, name),
        (Value::Sequence(nodes), PathToken::Index(idx)) => {
            let len = nodes.len() as i64;
            let pos = if *idx < 0 { len + idx } else { *idx };
            if pos < 0 || pos >= len {
                return Err(MutationError::selector_not_supported(
                    token.to_string(),
                    adapter.sequence_source(&nodes),
                ));
            }
            Ok(Value::Node(nodes[pos as usize].clone()))
        }
        (Value::Sequence(nodes), PathToken::Name(name)) => sequence_accessor(adapter, nodes, name),
        (Value::Node(node), PathToken::Index(_)) => Err(MutationError::selector_not_supported(
            token.to_string(),
            adapter.get_source(&node),
        )),
        (Value::Text(text), _) => Err(MutationError::selector_not_supported(
            token.to_string(),
            &text,
        )),
        (other, _) => Err(MutationError::selector_not_supported(
            token.to_string(),
            other.kind_name(),
        )),
    }
}

fn sequence_accessor<A>(
    adapter: &A,
    nodes: Vec<A::Node>,
    name: &str,
) -> Result<Value<A::Node>, MutationError>
where
    A: Adapter + ?Sized,
{
    match name {
        "first" | "last" => {
            let node = if name == "first" {
                nodes.first()
            } else {
                nodes.last()
            };
            Ok(node.cloned().map_or(Value::Absent, Value::Node))
        }
        "length" => Ok(Value::Number(nodes.len() as i64)),
        "is_empty" => Ok(Value::Bool(nodes.is_empty())),
        _ => Err(MutationError::selector_not_supported(
            name,
            adapter.sequence_source(&nodes),
        )),
    }
}
