use crate::action::{column_of, indent_line, split_lines, ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Adds a statement at the bottom of a block-like node, just before the line
/// holding its closing delimiter.
pub struct AppendAction<'n, N> {
    node: &'n N,
    code: &'n str,
}

impl<'n, N> AppendAction<'n, N> {
    pub fn new(node: &'n N, code: &'n str) -> Self {
        Self { node, code }
    }
}

impl<A> CalculateAction<A> for AppendAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Append
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        let range = cx.adapter.node_range(self.node);
        let source = cx.adapter.get_source(self.node);
        let last_line = source.rsplit('\n').next().unwrap_or_default();
        Ok(Range::point(range.end - last_line.len()))
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        let code = cx.adapter.rewritten_source(self.node, self.code)?;
        let start = cx.adapter.node_range(self.node).start;
        let indent = " ".repeat(column_of(cx.source(), start) + cx.tab_width);
        Ok(Some(body_statement(&code, &indent)))
    }
}

/// Code for one statement placed on its own line(s) inside a body.
///
/// Multi-line code is separated from the existing statements by a blank line.
pub(crate) fn body_statement(code: &str, indent: &str) -> String {
    let lines = split_lines(code);
    if lines.len() > 1 {
        let body: Vec<String> = lines.iter().map(|line| indent_line(indent, line)).collect();
        format!("\n{}\n", body.join("\n"))
    } else {
        format!("{indent}{code}\n")
    }
}
