use crate::action::{column_of, indent_line, split_lines, ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Replaces the whole node. Lines after the first are indented to the node's
/// original column.
pub struct ReplaceWithAction<'n, N> {
    node: &'n N,
    code: &'n str,
}

impl<'n, N> ReplaceWithAction<'n, N> {
    pub fn new(node: &'n N, code: &'n str) -> Self {
        Self { node, code }
    }
}

impl<A> CalculateAction<A> for ReplaceWithAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::ReplaceWith
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        Ok(cx.adapter.node_range(self.node))
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        let code = cx.adapter.rewritten_source(self.node, self.code)?;
        if !code.contains('\n') {
            return Ok(Some(code));
        }

        let start = cx.adapter.node_range(self.node).start;
        let indent = " ".repeat(column_of(cx.source(), start));
        let lines: Vec<String> = split_lines(&code)
            .into_iter()
            .enumerate()
            .map(|(idx, line)| {
                if idx == 0 {
                    line.to_string()
                } else {
                    indent_line(&indent, line)
                }
            })
            .collect();
        Ok(Some(lines.join("\n")))
    }
}
