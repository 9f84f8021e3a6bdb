use crate::action::{indent_line, ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Re-indents a node in place by `level` tab widths.
pub struct IndentAction<'n, N> {
    node: &'n N,
    level: usize,
}

impl<'n, N> IndentAction<'n, N> {
    pub fn new(node: &'n N, level: usize) -> Self {
        Self { node, level }
    }
}

impl<A> CalculateAction<A> for IndentAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Indent
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        Ok(cx.adapter.node_range(self.node))
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        let indent = " ".repeat(cx.tab_width * self.level);
        let code = cx
            .adapter
            .get_source(self.node)
            .split_inclusive('\n')
            .map(|line| indent_line(&indent, line))
            .collect();
        Ok(Some(code))
    }
}
