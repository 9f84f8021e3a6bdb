//! Pending edits and the rules that compute their byte ranges.
//!
//! Every builder on [`crate::Mutation`] constructs one of the action structs
//! in this module, asks it for its range and replacement text through
//! [`CalculateAction::process`], and stores the resulting [`Action`]. From
//! then on an action is plain data: a kind, a [`Range`] and optional new code.

pub mod append;
pub mod delete;
pub mod group;
pub mod indent;
pub mod insert;
pub mod noop;
pub mod prepend;
pub mod remove;
pub mod replace;
pub mod replace_with;

pub use append::AppendAction;
pub use delete::DeleteAction;
pub use group::GroupAction;
pub use indent::IndentAction;
pub use insert::{InsertAction, InsertOptions, InsertPosition};
pub use noop::NoopAction;
pub use prepend::PrependAction;
pub use remove::RemoveAction;
pub use replace::ReplaceAction;
pub use replace_with::ReplaceWithAction;

use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::Range;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Insert,
    Append,
    Prepend,
    Replace,
    ReplaceWith,
    Delete,
    Remove,
    Indent,
    Noop,
    Group,
}

/// A single byte-span replacement.
///
/// `range` is public so a transform hook can correct positions; the kind and
/// replacement text are fixed once computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edit {
    kind: ActionKind,
    #[serde(flatten)]
    pub range: Range,
    new_code: Option<String>,
}

impl Edit {
    pub fn new(kind: ActionKind, range: impl Into<Range>, new_code: Option<String>) -> Self {
        Self {
            kind,
            range: range.into(),
            new_code,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Replacement text; `None` means the span is left untouched.
    pub fn new_code(&self) -> Option<&str> {
        self.new_code.as_deref()
    }
}

/// A registered action: either a leaf edit or a group of actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Action {
    Edit(Edit),
    Group(GroupAction),
}

impl Action {
    pub fn range(&self) -> Range {
        match self {
            Action::Edit(edit) => edit.range,
            Action::Group(group) => group.range(),
        }
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Edit(edit) => edit.kind,
            Action::Group(_) => ActionKind::Group,
        }
    }

    /// Groups never splice text themselves.
    pub fn new_code(&self) -> Option<&str> {
        match self {
            Action::Edit(edit) => edit.new_code(),
            Action::Group(_) => None,
        }
    }
}

impl From<Edit> for Action {
    fn from(edit: Edit) -> Self {
        Action::Edit(edit)
    }
}

impl From<GroupAction> for Action {
    fn from(group: GroupAction) -> Self {
        Action::Group(group)
    }
}

/// What an action needs while computing its position and code.
pub struct ActionContext<'a, A: Adapter + ?Sized> {
    pub adapter: &'a A,
    pub tab_width: usize,
}

impl<'a, A: Adapter + ?Sized> ActionContext<'a, A> {
    pub fn new(adapter: &'a A, tab_width: usize) -> Self {
        Self { adapter, tab_width }
    }

    fn source(&self) -> &'a str {
        self.adapter.file_source()
    }
}

/// Range and replacement-text rules for one action variant.
pub trait CalculateAction<A: Adapter + ?Sized> {
    fn kind(&self) -> ActionKind;

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError>;

    fn new_code(&self, cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError>;

    /// Compute range and code once and freeze them into an [`Action`].
    fn process(&self, cx: &ActionContext<'_, A>) -> Result<Action, MutationError> {
        let range = self.calculate_position(cx)?;
        let new_code = self.new_code(cx)?;
        Ok(Action::Edit(Edit::new(self.kind(), range, new_code)))
    }
}

/// Split on `\n`, dropping trailing empty lines.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Prefix `indent` to `line` unless the line is blank.
pub(crate) fn indent_line(indent: &str, line: &str) -> String {
    if line.trim().is_empty() {
        line.to_string()
    } else {
        format!("{indent}{line}")
    }
}

/// Column of byte `offset`.
pub(crate) fn column_of(source: &str, offset: usize) -> usize {
    crate::range::Location::of_offset(source, offset).column
}

/// Extend `range` over one adjacent comma.
///
/// A trailing comma (after spaces) wins; otherwise the range is extended
/// backwards through whitespace to a leading comma.
pub(crate) fn widen_for_comma(source: &str, range: Range) -> Range {
    let bytes = source.as_bytes();

    let mut end = range.end;
    while bytes.get(end) == Some(&b' ') {
        end += 1;
    }
    if bytes.get(end) == Some(&b',') {
        return Range::new(range.start, end + 1);
    }

    let mut start = range.start;
    while start > 0 && matches!(bytes[start - 1], b' ' | b'\t' | b'\n' | b'\r') {
        start -= 1;
    }
    if start > 0 && bytes[start - 1] == b',' {
        return Range::new(start - 1, range.end);
    }

    range
}

/// Extend `range` over the spaces that follow it.
pub(crate) fn consume_trailing_spaces(source: &str, range: Range) -> Range {
    let bytes = source.as_bytes();
    let mut end = range.end;
    while bytes.get(end) == Some(&b' ') {
        end += 1;
    }
    Range::new(range.start, end)
}
