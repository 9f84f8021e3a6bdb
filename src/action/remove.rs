use crate::action::{
    consume_trailing_spaces, split_lines, widen_for_comma, ActionContext, ActionKind,
    CalculateAction,
};
use crate::adapter::Adapter;
use crate::error::MutationError;
use crate::range::{Location, Range};

/// Removes the whole node.
///
/// When the node is alone on its line, the line itself goes too, and if it
/// sat between two blank lines one of them is swallowed as well.
pub struct RemoveAction<'n, N> {
    node: &'n N,
    and_comma: bool,
}

impl<'n, N> RemoveAction<'n, N> {
    pub fn new(node: &'n N, and_comma: bool) -> Self {
        Self { node, and_comma }
    }
}

impl<A> CalculateAction<A> for RemoveAction<'_, A::Node>
where
    A: Adapter + ?Sized,
{
    fn kind(&self) -> ActionKind {
        ActionKind::Remove
    }

    fn calculate_position(&self, cx: &ActionContext<'_, A>) -> Result<Range, MutationError> {
        let source = cx.source();
        let node_range = cx.adapter.node_range(self.node);

        let mut range = node_range;
        if self.and_comma {
            range = widen_for_comma(source, range);
        }
        range = consume_trailing_spaces(source, range);

        if takes_whole_line(source, range) {
            range = remove_newline(source, range);
            range = squeeze_lines(source, node_range, range);
        }
        Ok(range)
    }

    fn new_code(&self, _cx: &ActionContext<'_, A>) -> Result<Option<String>, MutationError> {
        Ok(Some(String::new()))
    }
}

fn line_bounds(source: &str, range: Range) -> (usize, usize) {
    let line_start = source[..range.start].rfind('\n').map_or(0, |idx| idx + 1);
    let line_end = source[range.end..]
        .find('\n')
        .map_or(source.len(), |idx| range.end + idx);
    (line_start, line_end)
}

fn takes_whole_line(source: &str, range: Range) -> bool {
    let (line_start, line_end) = line_bounds(source, range);
    source[line_start..range.start].trim().is_empty() && source[range.end..line_end].trim().is_empty()
}

/// Widen to the start of the first line and past the newline ending the last.
/// On the final line without a newline, the preceding newline is taken instead.
fn remove_newline(source: &str, range: Range) -> Range {
    let (line_start, line_end) = line_bounds(source, range);
    if line_end < source.len() {
        Range::new(line_start, line_end + 1)
    } else if line_start > 0 {
        Range::new(line_start - 1, line_end)
    } else {
        Range::new(line_start, line_end)
    }
}

fn squeeze_lines(source: &str, node_range: Range, range: Range) -> Range {
    let lines = split_lines(source);
    let begin_line = Location::of_offset(source, node_range.start).line;
    let end_line = Location::of_offset(source, node_range.end).line;

    let before_is_blank = begin_line == 1 || lines.get(begin_line - 2) == Some(&"");
    let after_is_blank = lines.get(end_line) == Some(&"");

    if lines.len() > 1
        && before_is_blank
        && after_is_blank
        && source.as_bytes().get(range.end) == Some(&b'\n')
    {
        Range::new(range.start, range.end + 1)
    } else {
        range
    }
}
