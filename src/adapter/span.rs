use crate::adapter::{Adapter, AdapterKind, Value};
use crate::error::MutationError;
use crate::range::Range;

/// Adapter whose "nodes" are plain byte ranges over a source.
///
/// Useful when spans come from somewhere other than a syntax tree (compiler
/// diagnostics, text search). Span nodes have no named children, so only
/// whole-node actions and placeholder-free templates apply to them.
#[derive(Debug, Clone, Copy)]
pub struct SpanAdapter<'s> {
    source: &'s str,
}

impl<'s> SpanAdapter<'s> {
    pub fn new(source: &'s str) -> Self {
        Self { source }
    }
}

impl Adapter for SpanAdapter<'_> {
    type Node = Range;

    fn kind(&self) -> AdapterKind {
        AdapterKind::Span
    }

    fn file_source(&self) -> &str {
        self.source
    }

    fn node_range(&self, node: &Range) -> Range {
        *node
    }

    fn child(&self, node: &Range, name: &str) -> Result<Value<Range>, MutationError> {
        Err(MutationError::selector_not_supported(
            name,
            self.get_source(node),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_source_and_locations() {
        let source = "class Foobar\n  def foo; end\nend\n";
        let adapter = SpanAdapter::new(source);
        let node = Range::new(15, 27);

        assert_eq!(adapter.get_source(&node), "def foo; end");
        let loc = adapter.get_start_loc(&node, None).unwrap();
        assert_eq!((loc.line, loc.column), (2, 2));
        let loc = adapter.get_end_loc(&node, None).unwrap();
        assert_eq!((loc.line, loc.column), (2, 14));
    }

    #[test]
    fn span_has_no_children() {
        let adapter = SpanAdapter::new("foo.bar");
        let err = adapter
            .child_node_range(&Range::new(0, 7), "receiver")
            .unwrap_err();
        assert!(matches!(err, MutationError::SelectorNotSupported { .. }));
    }

    #[test]
    fn plain_templates_render_verbatim() {
        let adapter = SpanAdapter::new("foo.bar");
        let rendered = adapter
            .rewritten_source(&Range::new(0, 7), "baz.qux")
            .unwrap();
        assert_eq!(rendered, "baz.qux");
    }
}
