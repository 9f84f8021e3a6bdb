use crate::action::{ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Claims the node's range without changing any text.
pub struct NoopAction<'n, N> {
    node: &'n N,
}

impl<'n, N> NoopAction<'n, N> {
    pub fn new(node: &'n N) -> Self {
        Self { node }
    }
}

impl<A> CalculateAction<A> for NoopAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Noop
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        Ok(cx.adapter.node_range(self.node))
    }

    fn new_code(&self, _cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        Ok(None)
    }
}
