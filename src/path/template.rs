//! `{{path}}` templates.
//!
//! Templates are parsed once into literal and placeholder segments. Parsed
//! templates are cached per thread, capped at 256 entries; when the cap is
//! reached the cache is cleared and rebuilt on demand.

use crate::adapter::{Adapter, Value};
use crate::error::MutationError;
use crate::path::{self, Path};
use crate::range::Location;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

const MAX_CACHE_ENTRIES: usize = 256;

thread_local! {
    static TEMPLATE_CACHE: RefCell<HashMap<String, Rc<Template>>> =
        RefCell::new(HashMap::new());
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Placeholder(Path),
}

/// A parsed template: literal text interleaved with `{{path}}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    pub fn parse(template: &str) -> Result<Self, MutationError> {
        let mut segments = Vec::new();
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(MutationError::InvalidTemplate {
                    template: template.to_string(),
                    reason: format!("unterminated placeholder at byte {}", template.len() - rest.len() + open),
                });
            };
            let path: Path = after_open[..close].parse()?;
            segments.push(Segment::Placeholder(path));
            rest = &after_open[close + 2..];
        }

        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Get a parsed template from the thread-local cache, or parse and cache it.
    pub fn cached(template: &str) -> Result<Rc<Template>, MutationError> {
        TEMPLATE_CACHE.with(|cache| {
            let mut cache = cache.borrow_mut();
            if let Some(parsed) = cache.get(template) {
                return Ok(Rc::clone(parsed));
            }
            if cache.len() >= MAX_CACHE_ENTRIES {
                cache.clear();
            }
            let parsed = Rc::new(Template::parse(template)?);
            cache.insert(template.to_string(), Rc::clone(&parsed));
            Ok(parsed)
        })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// True when the template has no placeholders.
    pub fn is_literal(&self) -> bool {
        self.segments
            .iter()
            .all(|segment| matches!(segment, Segment::Literal(_)))
    }

    /// Substitute every placeholder with the text its path resolves to from `node`.
    pub fn render<A>(&self, adapter: &A, node: &A::Node) -> Result<String, MutationError>
    where
        A: Adapter + ?Sized,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(path) => {
                    let value = path::resolve(adapter, node, path)?;
                    out.push_str(&value_text(adapter, path, value)?);
                }
            }
        }
        Ok(out)
    }
}

fn value_text<A>(adapter: &A, path: &Path, value: Value<A::Node>) -> Result<String, MutationError>
where
    A: Adapter + ?Sized,
{
    match value {
        Value::Node(node) => Ok(adapter.node_text(&node)),
        Value::Sequence(nodes) => Ok(sequence_text(adapter, &nodes)),
        Value::Text(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        Value::Absent => Ok(String::new()),
        other @ Value::Bool(_) => Err(MutationError::TemplateEvaluation {
            path: path.to_string(),
            kind: other.kind_name(),
        }),
    }
}

/// Source spanning a sequence.
///
/// When the elements are laid out one per line, lines after the first lose up
/// to the first element's column of leading whitespace.
fn sequence_text<A>(adapter: &A, nodes: &[A::Node]) -> String
where
    A: Adapter + ?Sized,
{
    let source = adapter.sequence_source(nodes);
    let line_count = source.lines().count();
    if line_count <= 1 || line_count != nodes.len() {
        return source.to_string();
    }

    let column = match adapter.sequence_range(nodes) {
        Some(range) => Location::of_offset(adapter.file_source(), range.start).column,
        None => return source.to_string(),
    };

    let mut out = String::with_capacity(source.len());
    for (idx, line) in source.split('\n').enumerate() {
        if idx > 0 {
            out.push('\n');
            out.push_str(strip_indent(line, column));
        } else {
            out.push_str(line);
        }
    }
    out
}

fn strip_indent(line: &str, column: usize) -> &str {
    let leading = line
        .bytes()
        .take(column)
        .take_while(|b| *b == b' ' || *b == b'\t')
        .count();
    &line[leading..]
}

/// Clear the template cache (mainly for testing).
pub fn clear_cache() {
    TEMPLATE_CACHE.with(|cache| {
        cache.borrow_mut().clear();
    });
}

pub fn cache_size() -> usize {
    TEMPLATE_CACHE.with(|cache| cache.borrow().len())
}
