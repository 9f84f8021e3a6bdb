use crate::action::{consume_trailing_spaces, widen_for_comma, ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Deletes the span covering the selected children.
///
/// Absent children are skipped; at least one selector must resolve.
pub struct DeleteAction<'n, N> {
    node: &'n N,
    selectors: &'n [&'n str],
    and_comma: bool,
}

impl<'n, N> DeleteAction<'n, N> {
    pub fn new(node: &'n N, selectors: &'n [&'n str], and_comma: bool) -> Self {
        Self {
            node,
            selectors,
            and_comma,
        }
    }
}

impl<A> CalculateAction<A> for DeleteAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Delete
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        let mut span: Option<Range> = None;
        for selector in self.selectors {
            if let Some(range) = cx.adapter.child_node_range(self.node, selector)? {
                span = Some(span.map_or(range, |s| s.cover(&range)));
            }
        }
        let span = span.ok_or_else(|| {
            MutationError::selector_not_supported(
                self.selectors.join(", "),
                cx.adapter.get_source(self.node),
            )
        })?;

        let span = if self.and_comma {
            widen_for_comma(cx.source(), span)
        } else {
            span
        };
        Ok(consume_trailing_spaces(cx.source(), span))
    }

    fn new_code(&self, _cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        Ok(Some(String::new()))
    }
}
