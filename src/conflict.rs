//! Overlap detection between registered actions.
//!
//! Actions are sorted by `(start, end)` and scanned right to left, keeping the
//! rightmost action and every earlier one that ends at or before the start of
//! the last kept action. Rewriting also runs right to left, so the kept set
//! can be spliced without offsets ever shifting under a pending action.

use crate::action::Action;
use crate::range::Range;
use crate::strategy::Strategy;

/// Stable sort by `(start, end)`.
pub fn sort_actions(actions: &mut [Action]) {
    actions.sort_by_key(|action| (action.start(), action.end()));
}

/// Indices (ascending) of actions in `sorted` that conflict with a later one.
///
/// A group whose own edits overlap can never be applied and is always
/// reported as conflicting.
pub fn find_conflicts(sorted: &[Action], strategy: Strategy) -> Vec<usize> {
    let mut conflicts = Vec::new();
    let mut current: Option<Range> = None;

    for idx in (0..sorted.len()).rev() {
        let candidate = sorted[idx].range();

        if overlaps_internally(&sorted[idx]) {
            tracing::trace!(group = %candidate, "group contains overlapping edits");
            conflicts.push(idx);
            continue;
        }

        if let Some(kept) = current {
            let same_position =
                kept.is_empty() && candidate.is_empty() && kept.start == candidate.start;
            let overlapped = kept.start < candidate.end;

            if overlapped || (same_position && !strategy.allows_insert_at_same_position()) {
                tracing::trace!(
                    conflicting = %candidate,
                    kept = %kept,
                    "action conflicts with a later action"
                );
                conflicts.push(idx);
                continue;
            }
        }
        current = Some(candidate);
    }

    conflicts.reverse();
    conflicts
}

/// Whether two text-producing edits inside a group overlap.
///
/// Noops are ignored since they never splice. Zero-width edits may touch
/// their neighbours.
fn overlaps_internally(action: &Action) -> bool {
    let Action::Group(group) = action else {
        return false;
    };

    let mut ranges = Vec::new();
    splicing_ranges(group.actions(), &mut ranges);
    ranges.sort_by_key(|range| (range.start, range.end));
    ranges.windows(2).any(|pair| pair[0].end > pair[1].start)
}

fn splicing_ranges(actions: &[Action], ranges: &mut Vec<Range>) {
    for action in actions {
        match action {
            Action::Edit(edit) if edit.new_code().is_some() => ranges.push(edit.range),
            Action::Edit(_) => {}
            Action::Group(group) => splicing_ranges(group.actions(), ranges),
        }
    }
}

/// Split sorted actions into `(accepted, conflicting)`, both in sorted order.
pub fn partition(sorted: Vec<Action>, strategy: Strategy) -> (Vec<Action>, Vec<Action>) {
    let conflicts = find_conflicts(&sorted, strategy);
    if conflicts.is_empty() {
        return (sorted, Vec::new());
    }

    let mut accepted = Vec::with_capacity(sorted.len() - conflicts.len());
    let mut conflicting = Vec::with_capacity(conflicts.len());
    let mut pending = conflicts.iter().peekable();
    for (idx, action) in sorted.into_iter().enumerate() {
        if pending.next_if(|&&conflict| conflict == idx).is_some() {
            conflicting.push(action);
        } else {
            accepted.push(action);
        }
    }
    (accepted, conflicting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, Edit, GroupAction};

    fn action(start: usize, end: usize) -> Action {
        Action::Edit(Edit::new(
            ActionKind::Replace,
            Range::new(start, end),
            Some(String::new()),
        ))
    }

    #[test]
    fn empty_and_single() {
        assert!(find_conflicts(&[], Strategy::default()).is_empty());
        assert!(find_conflicts(&[action(0, 3)], Strategy::default()).is_empty());
    }

    #[test]
    fn adjacent_ranges_do_not_conflict() {
        let sorted = vec![action(0, 3), action(3, 6), action(6, 6), action(6, 9)];
        assert!(find_conflicts(&sorted, Strategy::default()).is_empty());
    }

    #[test]
    fn overlap_drops_the_earlier_action() {
        let sorted = vec![action(6, 12), action(6, 12), action(12, 12)];
        assert_eq!(find_conflicts(&sorted, Strategy::default()), vec![0]);
    }

    #[test]
    fn wide_action_shadows_several() {
        let sorted = vec![action(0, 20), action(2, 4), action(5, 8), action(10, 12)];
        assert_eq!(find_conflicts(&sorted, Strategy::default()), vec![0]);
        let sorted = vec![action(2, 4), action(3, 20), action(5, 8)];
        assert_eq!(find_conflicts(&sorted, Strategy::default()), vec![1]);
    }

    #[test]
    fn same_position_inserts() {
        let sorted = vec![action(5, 5), action(5, 5)];
        assert_eq!(find_conflicts(&sorted, Strategy::KEEP_RUNNING), vec![0]);
        let strategy = Strategy::KEEP_RUNNING | Strategy::ALLOW_INSERT_AT_SAME_POSITION;
        assert!(find_conflicts(&sorted, strategy).is_empty());
    }

    #[test]
    fn partition_keeps_order() {
        let sorted = vec![action(0, 5), action(2, 3), action(4, 8), action(9, 10)];
        let (accepted, conflicting) = partition(sorted, Strategy::default());
        let accepted: Vec<_> = accepted.iter().map(Action::range).collect();
        let conflicting: Vec<_> = conflicting.iter().map(Action::range).collect();
        assert_eq!(accepted, vec![Range::new(2, 3), Range::new(4, 8), Range::new(9, 10)]);
        assert_eq!(conflicting, vec![Range::new(0, 5)]);
    }

    #[test]
    fn group_with_overlapping_edits_conflicts() {
        let broken = Action::Group(GroupAction::new(vec![action(4, 8), action(2, 6)]));
        let sorted = vec![action(0, 1), broken, action(10, 12)];
        assert_eq!(find_conflicts(&sorted, Strategy::default()), vec![1]);
    }

    #[test]
    fn group_noops_and_touching_edits_are_fine() {
        let noop = Action::Edit(Edit::new(ActionKind::Noop, 2..6, None));
        let group = Action::Group(GroupAction::new(vec![
            Action::Edit(Edit::new(ActionKind::Insert, 0..0, Some("(".to_string()))),
            action(0, 8),
            noop,
            Action::Edit(Edit::new(ActionKind::Insert, 8..8, Some(")".to_string()))),
        ]));
        assert!(find_conflicts(&[group], Strategy::default()).is_empty());
    }

    #[test]
    fn dropped_group_does_not_shadow_earlier_actions() {
        let broken = Action::Group(GroupAction::new(vec![action(10, 14), action(12, 16)]));
        let sorted = vec![action(0, 4), action(8, 12), broken];
        assert_eq!(find_conflicts(&sorted, Strategy::default()), vec![2]);
    }
}
