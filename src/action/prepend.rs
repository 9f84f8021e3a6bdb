use crate::action::append::body_statement;
use crate::action::{column_of, ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Adds a statement at the top of a block-like node, right after its opening line.
pub struct PrependAction<'n, N> {
    node: &'n N,
    code: &'n str,
}

impl<'n, N> PrependAction<'n, N> {
    pub fn new(node: &'n N, code: &'n str) -> Self {
        Self { node, code }
    }
}

impl<A> CalculateAction<A> for PrependAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Prepend
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        let range = cx.adapter.node_range(self.node);
        let source = cx.adapter.get_source(self.node);
        let offset = match source.find('\n') {
            Some(first_line_len) => range.start + first_line_len + 1,
            None => range.end,
        };
        Ok(Range::point(offset))
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        let code = cx.adapter.rewritten_source(self.node, self.code)?;
        let start = cx.adapter.node_range(self.node).start;
        let indent = " ".repeat(column_of(cx.source(), start) + cx.tab_width);
        Ok(Some(body_statement(&code, &indent)))
    }
}
