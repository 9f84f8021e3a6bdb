use crate::action::{Action, Edit};
use crate::range::Range;
use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Composite action binding its children into one conflict-detection unit.
///
/// The range always spans the (recursively) contained edits; it is recomputed
/// whenever the children change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAction {
    range: Range,
    actions: Vec<Action>,
}

impl GroupAction {
    pub fn new(actions: Vec<Action>) -> Self {
        let range = span_of(&actions);
        Self { range, actions }
    }

    pub fn range(&self) -> Range {
        self.range
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<Action> {
        self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl Serialize for GroupAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GroupAction", 4)?;
        state.serialize_field("kind", "group")?;
        state.serialize_field("start", &self.range.start)?;
        state.serialize_field("end", &self.range.end)?;
        state.serialize_field("actions", &self.actions)?;
        state.end()
    }
}

fn span_of(actions: &[Action]) -> Range {
    actions
        .iter()
        .map(Action::range)
        .reduce(|acc, range| acc.cover(&range))
        .unwrap_or_default()
}

/// Collapse single-child groups into their child and drop empty groups.
pub fn optimize(actions: Vec<Action>) -> Vec<Action> {
    actions.into_iter().filter_map(optimize_one).collect()
}

fn optimize_one(action: Action) -> Option<Action> {
    match action {
        Action::Edit(edit) => Some(Action::Edit(edit)),
        Action::Group(group) => {
            let mut children = optimize(group.actions);
            match children.len() {
                0 => None,
                1 => children.pop(),
                _ => Some(Action::Group(GroupAction::new(children))),
            }
        }
    }
}

/// Leaf edits in depth-first order.
pub fn flatten(actions: Vec<Action>) -> Vec<Edit> {
    let mut edits = Vec::new();
    flatten_into(actions, &mut edits);
    edits
}

fn flatten_into(actions: Vec<Action>, edits: &mut Vec<Edit>) {
    for action in actions {
        match action {
            Action::Edit(edit) => edits.push(edit),
            Action::Group(group) => flatten_into(group.actions, edits),
        }
    }
}

/// Run `hook` over a flattened copy of the tree, then copy the edited ranges
/// back in depth-first order and recompute group spans.
///
/// Only ranges are read back; the hook cannot add, remove or retarget edits.
pub fn apply_transform<F>(actions: &mut [Action], hook: F)
where
    F: FnOnce(&mut [Edit]),
{
    let mut edits = flatten(actions.to_vec());
    hook(&mut edits);
    let mut ranges = edits.into_iter().map(|edit| edit.range);
    write_back(actions, &mut ranges);
}

fn write_back(actions: &mut [Action], ranges: &mut impl Iterator<Item = Range>) {
    for action in actions {
        match action {
            Action::Edit(edit) => {
                if let Some(range) = ranges.next() {
                    edit.range = range;
                }
            }
            Action::Group(group) => {
                write_back(&mut group.actions, ranges);
                group.range = span_of(&group.actions);
            }
        }
    }
}

/// Stable sort by `(start, end)` at every level of the tree.
pub fn sort(actions: &mut [Action]) {
    for action in actions.iter_mut() {
        if let Action::Group(group) = action {
            sort(&mut group.actions);
        }
    }
    crate::conflict::sort_actions(actions);
}
