//! Property tests for conflict resolution and back-to-front rewriting.

use node_mutation::{
    InsertOptions, MutationConfig, MutationError, Mutation, Range, SpanAdapter, Strategy,
};
use proptest::prelude::*;

const SOURCE: &str = "abcdefghijklmnopqrstuvwxyz0123456789ABCD";

/// Pair up sorted distinct offsets into non-empty, non-overlapping ranges.
fn disjoint(points: &[usize]) -> Vec<Range> {
    points
        .chunks_exact(2)
        .map(|pair| Range::new(pair[0], pair[1]))
        .collect()
}

/// Apply replacements left to right, shifting later offsets by the size delta.
fn apply_ascending(source: &str, edits: &[(Range, String)]) -> String {
    let mut out = source.to_string();
    let mut delta: isize = 0;
    for (range, code) in edits {
        let start = (range.start as isize + delta) as usize;
        let end = (range.end as isize + delta) as usize;
        out.replace_range(start..end, code);
        delta += code.len() as isize - range.len() as isize;
    }
    out
}

fn ordered(a: usize, b: usize) -> Range {
    Range::new(a.min(b), a.max(b))
}

fn register(mutation: &mut Mutation<'_, SpanAdapter<'_>>, ranges: &[(usize, usize)]) {
    for (idx, &(a, b)) in ranges.iter().enumerate() {
        mutation
            .replace_with(&ordered(a, b), &format!("x{idx}"))
            .unwrap();
    }
}

fn throw_error() -> MutationConfig {
    MutationConfig::default().with_strategy(Strategy::THROW_ERROR)
}

proptest! {
    #[test]
    fn prop_disjoint_ranges_never_conflict(
        points in proptest::collection::btree_set(0..=SOURCE.len(), 0..12),
    ) {
        let points: Vec<usize> = points.into_iter().collect();
        let ranges = disjoint(&points);
        let adapter = SpanAdapter::new(SOURCE);

        let mut mutation = Mutation::new(&adapter);
        for (idx, range) in ranges.iter().enumerate() {
            mutation.replace_with(range, &format!("<{idx}>")).unwrap();
        }
        let result = mutation.test().unwrap();

        prop_assert!(!result.conflicted);
        prop_assert_eq!(result.affected, !ranges.is_empty());
        prop_assert_eq!(result.actions.map(|a| a.len()), Some(ranges.len()));
    }

    #[test]
    fn prop_back_to_front_matches_shifted_front_to_back(
        points in proptest::collection::btree_set(0..=SOURCE.len(), 2..16),
        codes in proptest::collection::vec("[a-z]{0,4}", 8),
    ) {
        let points: Vec<usize> = points.into_iter().collect();
        let edits: Vec<(Range, String)> = disjoint(&points)
            .into_iter()
            .zip(codes)
            .collect();
        let adapter = SpanAdapter::new(SOURCE);

        // Registration order must not matter.
        let mut mutation = Mutation::new(&adapter);
        for (range, code) in edits.iter().rev() {
            mutation.replace_with(range, code).unwrap();
        }
        let result = mutation.process().unwrap();

        prop_assert!(!result.conflicted);
        prop_assert_eq!(result.new_source, Some(apply_ascending(SOURCE, &edits)));
    }

    #[test]
    fn prop_strategies_agree_on_conflict_set(
        ranges in proptest::collection::vec((0..=SOURCE.len(), 0..=SOURCE.len()), 1..10),
    ) {
        let adapter = SpanAdapter::new(SOURCE);

        let mut keep = Mutation::new(&adapter);
        register(&mut keep, &ranges);
        let kept = keep.test().unwrap();
        let accepted = kept.actions.clone().unwrap();

        let mut strict = Mutation::with_config(&adapter, throw_error()).unwrap();
        register(&mut strict, &ranges);
        let dropped = ranges.len() - accepted.len();
        match strict.test() {
            Ok(result) => {
                prop_assert!(!kept.conflicted);
                prop_assert_eq!(result.actions, Some(accepted));
            }
            Err(MutationError::Conflict { count }) => {
                prop_assert!(kept.conflicted);
                prop_assert_eq!(count, dropped);
            }
            Err(other) => prop_assert!(false, "unexpected error: {}", other),
        }
    }

    #[test]
    fn prop_single_child_group_is_transparent(
        a in 0..=SOURCE.len(),
        b in 0..=SOURCE.len(),
        code in "[a-z]{0,6}",
    ) {
        let adapter = SpanAdapter::new(SOURCE);
        let range = ordered(a, b);

        let mut grouped = Mutation::new(&adapter);
        grouped.group(|m| m.replace_with(&range, &code)).unwrap();
        let mut plain = Mutation::new(&adapter);
        plain.replace_with(&range, &code).unwrap();

        prop_assert_eq!(grouped.process().unwrap(), plain.process().unwrap());
    }

    #[test]
    fn prop_same_position_inserts(
        offset in 0..=SOURCE.len(),
        first in "[a-z]{1,3}",
        second in "[A-Z]{1,3}",
    ) {
        let adapter = SpanAdapter::new(SOURCE);
        let at = Range::point(offset);
        let expect = |code: &str| {
            let mut out = SOURCE.to_string();
            out.insert_str(offset, code);
            out
        };

        let mut mutation = Mutation::new(&adapter);
        mutation.insert(&at, &first, InsertOptions::at_beginning()).unwrap();
        mutation.insert(&at, &second, InsertOptions::at_beginning()).unwrap();
        let result = mutation.process().unwrap();
        prop_assert!(result.conflicted);
        prop_assert_eq!(result.new_source, Some(expect(&second)));

        let config = MutationConfig::default()
            .with_strategy(Strategy::KEEP_RUNNING | Strategy::ALLOW_INSERT_AT_SAME_POSITION);
        let mut mutation = Mutation::with_config(&adapter, config).unwrap();
        mutation.insert(&at, &first, InsertOptions::at_beginning()).unwrap();
        mutation.insert(&at, &second, InsertOptions::at_beginning()).unwrap();
        let result = mutation.process().unwrap();
        prop_assert!(!result.conflicted);
        prop_assert_eq!(result.new_source, Some(expect(&format!("{first}{second}"))));
    }
}
