use crate::action::{ActionContext, ActionKind, CalculateAction};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;

/// Which edge of the target receives the inserted code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertPosition {
    Beginning,
    #[default]
    End,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOptions {
    pub at: InsertPosition,
    /// Child path to insert relative to, instead of the node itself.
    pub to: Option<String>,
    /// Add a `", "` separator on the side facing the target.
    pub and_comma: bool,
}

impl InsertOptions {
    pub fn at_beginning() -> Self {
        Self {
            at: InsertPosition::Beginning,
            ..Self::default()
        }
    }

    pub fn at_end() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn to(mut self, path: impl Into<String>) -> Self {
        self.to = Some(path.into());
        self
    }

    #[must_use]
    pub fn and_comma(mut self) -> Self {
        self.and_comma = true;
        self
    }
}

/// Zero-width insertion at the beginning or end of a node or child.
pub struct InsertAction<'n, N> {
    node: &'n N,
    code: &'n str,
    options: InsertOptions,
}

impl<'n, N> InsertAction<'n, N> {
    pub fn new(node: &'n N, code: &'n str, options: InsertOptions) -> Self {
        Self {
            node,
            code,
            options,
        }
    }
}

impl<A> CalculateAction<A> for InsertAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Insert
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        let target = cx
            .adapter
            .target_range(self.node, self.options.to.as_deref())?;
        let offset = match self.options.at {
            InsertPosition::Beginning => target.start,
            InsertPosition::End => target.end,
        };
        Ok(Range::point(offset))
    }

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        let code = cx.adapter.rewritten_source(self.node, self.code)?;
        let code = match (self.options.and_comma, self.options.at) {
            (false, _) => code,
            (true, InsertPosition::End) => format!(", {code}"),
            (true, InsertPosition::Beginning) => format!("{code}, "),
        };
        Ok(Some(code))
    }
}
