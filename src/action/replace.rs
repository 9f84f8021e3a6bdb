use crate::action::{ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Replaces the span covering one or more child paths with rendered code.
pub struct ReplaceAction<'n, N> {
    node: &'n N,
    selectors: &'n [&'n str],
    code: &'n str,
}

impl<'n, N> ReplaceAction<'n, N> {
    pub fn new(node: &'n N, selectors: &'n [&'n str], code: &'n str) -> Self {
        Self {
            node,
            selectors,
            code,
        }
    }
}

/// Span covering every selector.
///
/// Fails on an empty selector list and on any selector that resolves to
/// nothing.
pub(crate) fn selectors_span<A>(
    adapter: &A,
    node: &A::Node,
    selectors: &[&str],
) -> Result<Range, MutationError>
where
    A: Adapter + ?Sized,
{
    let mut span: Option<Range> = None;
    for selector in selectors {
        let range = adapter.target_range(node, Some(selector))?;
        span = Some(span.map_or(range, |s| s.cover(&range)));
    }
    span.ok_or_else(|| MutationError::selector_not_supported("", adapter.get_source(node)))
}

impl<A> CalculateAction<A> for ReplaceAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Replace
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        selectors_span(cx.adapter, self.node, self.selectors)
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        cx.adapter.rewritten_source(self.node, self.code).map(Some)
    }
}
