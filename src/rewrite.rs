//! Back-to-front application of accepted edits to a source snapshot.

use crate::action::Edit;
use crate::error::MutationError;

/// Apply `edits` to `source` and return the new text.
///
/// All ranges are validated against the original source before anything is
/// spliced. Edits are applied in descending `(start, end)` order so that
/// splicing never shifts an offset that is still pending; edits sharing a
/// position keep their relative order, so the earlier one ends up first.
/// Edits without new code (noops) are skipped. Overlapping edits are
/// rejected rather than spliced into each other.
pub fn apply(source: &str, edits: &[Edit]) -> Result<String, MutationError> {
    for edit in edits {
        validate(source, edit)?;
    }

    let mut ordered: Vec<&Edit> = edits
        .iter()
        .filter(|edit| edit.new_code().is_some())
        .collect();
    ordered.sort_by_key(|edit| (edit.start(), edit.end()));
    if let Some(pair) = ordered.windows(2).find(|pair| pair[0].end() > pair[1].start()) {
        return Err(MutationError::OverlappingEdits {
            first: pair[0].range,
            second: pair[1].range,
        });
    }

    let mut output = source.to_string();
    for edit in ordered.into_iter().rev() {
        if let Some(code) = edit.new_code() {
            output.replace_range(edit.start()..edit.end(), code);
        }
    }

    Ok(output)
}

fn validate(source: &str, edit: &Edit) -> Result<(), MutationError> {
    let range = edit.range;
    let in_bounds = !range.is_inverted() && range.end <= source.len();
    if !in_bounds || !source.is_char_boundary(range.start) || !source.is_char_boundary(range.end) {
        return Err(MutationError::InvalidRange {
            start: range.start,
            end: range.end,
            len: source.len(),
        });
    }
    Ok(())
}
