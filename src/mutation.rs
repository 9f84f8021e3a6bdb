use crate::action::{
    group, Action, ActionContext, AppendAction, CalculateAction, DeleteAction, Edit, GroupAction,
    IndentAction, InsertAction, InsertOptions, NoopAction, PrependAction, RemoveAction,
    ReplaceAction, ReplaceWithAction,
};
use crate::adapter::Adapter;
use crate::config::MutationConfig;
use crate::conflict;
use crate::error::MutationError;
use crate::result::MutationResult;
use crate::rewrite;

type TransformHook<'a> = Box<dyn FnMut(&mut [Edit]) + 'a>;

/// Collects actions over one source snapshot and applies them in one pass.
///
/// Builders compute each action's range immediately, so selector errors
/// surface at the call that caused them. [`Mutation::process`] and
/// [`Mutation::test`] consume the mutation:
///
/// 1. single-child groups are collapsed and empty groups dropped;
/// 2. the transform hook, if any, adjusts ranges on the flattened edits;
/// 3. actions are sorted and top-level actions that overlap a later one are
///    dropped (or the call fails under `THROW_ERROR`);
/// 4. `process` splices the surviving edits back to front, `test` returns the
///    surviving action tree.
pub struct Mutation<'a, A: Adapter + ?Sized> {
    adapter: &'a A,
    config: MutationConfig,
    actions: Vec<Action>,
    group_stack: Vec<Vec<Action>>,
    transform: Option<TransformHook<'a>>,
}

impl<'a, A: Adapter + ?Sized> Mutation<'a, A> {
    pub fn new(adapter: &'a A) -> Self {
        Self {
            adapter,
            config: MutationConfig::default(),
            actions: Vec::new(),
            group_stack: Vec::new(),
            transform: None,
        }
    }

    pub fn with_config(adapter: &'a A, config: MutationConfig) -> Result<Self, MutationError> {
        let mut mutation = Self::new(adapter);
        mutation.configure(config)?;
        Ok(mutation)
    }

    /// Replace the settings. Fails if `config` is pinned to another adapter.
    pub fn configure(&mut self, config: MutationConfig) -> Result<(), MutationError> {
        config.check_adapter(self.adapter.kind())?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &MutationConfig {
        &self.config
    }

    pub fn source(&self) -> &str {
        self.adapter.file_source()
    }

    /// Top-level actions registered so far.
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Install a hook that may correct edit ranges before conflict resolution.
    pub fn set_transform<F>(&mut self, hook: F)
    where
        F: FnMut(&mut [Edit]) + 'a,
    {
        self.transform = Some(Box::new(hook));
    }

    /// Register an already computed action, e.g. a span found outside the tree.
    pub fn push_action(&mut self, action: impl Into<Action>) {
        self.sink().push(action.into());
    }

    pub fn append(&mut self, node: &A::Node, code: &str) -> Result<(), MutationError> {
        self.register(AppendAction::new(node, code))
    }

    pub fn prepend(&mut self, node: &A::Node, code: &str) -> Result<(), MutationError> {
        self.register(PrependAction::new(node, code))
    }

    pub fn insert(
        &mut self,
        node: &A::Node,
        code: &str,
        options: InsertOptions,
    ) -> Result<(), MutationError> {
        self.register(InsertAction::new(node, code, options))
    }

    pub fn delete(
        &mut self,
        node: &A::Node,
        selectors: &[&str],
        and_comma: bool,
    ) -> Result<(), MutationError> {
        self.register(DeleteAction::new(node, selectors, and_comma))
    }

    pub fn remove(&mut self, node: &A::Node, and_comma: bool) -> Result<(), MutationError> {
        self.register(RemoveAction::new(node, and_comma))
    }

    pub fn replace(
        &mut self,
        node: &A::Node,
        selectors: &[&str],
        with: &str,
    ) -> Result<(), MutationError> {
        self.register(ReplaceAction::new(node, selectors, with))
    }

    pub fn replace_with(&mut self, node: &A::Node, code: &str) -> Result<(), MutationError> {
        self.register(ReplaceWithAction::new(node, code))
    }

    /// Surround a node with `prefix` and `suffix`.
    ///
    /// With `newline`, prefix and suffix go on their own lines at the node's
    /// column and the node is indented one level.
    pub fn wrap(
        &mut self,
        node: &A::Node,
        prefix: &str,
        suffix: &str,
        newline: bool,
    ) -> Result<(), MutationError> {
        if !newline {
            return self.group(|m| {
                m.insert(node, prefix, InsertOptions::at_beginning())?;
                m.insert(node, suffix, InsertOptions::at_end())
            });
        }

        let column = self.adapter.get_start_loc(node, None)?.column;
        let padding = " ".repeat(column);
        let head = format!("{prefix}\n{padding}");
        let tail = format!("\n{padding}{suffix}");
        self.group(|m| {
            m.insert(node, &head, InsertOptions::at_beginning())?;
            m.insert(node, &tail, InsertOptions::at_end())?;
            m.indent(node)
        })
    }

    pub fn indent(&mut self, node: &A::Node) -> Result<(), MutationError> {
        self.indent_by(node, 1)
    }

    pub fn indent_by(&mut self, node: &A::Node, level: usize) -> Result<(), MutationError> {
        self.register(IndentAction::new(node, level))
    }

    pub fn noop(&mut self, node: &A::Node) -> Result<(), MutationError> {
        self.register(NoopAction::new(node))
    }

    /// Register every action `build` adds as one group.
    ///
    /// Nothing is registered if `build` fails.
    pub fn group<F>(&mut self, build: F) -> Result<(), MutationError>
    where
        F: FnOnce(&mut Self) -> Result<(), MutationError>,
    {
        self.group_stack.push(Vec::new());
        let built = build(self);
        let children = self.group_stack.pop().unwrap_or_default();
        built?;
        self.sink().push(Action::Group(GroupAction::new(children)));
        Ok(())
    }

    /// Apply accepted actions and return the rewritten source.
    pub fn process(self) -> Result<MutationResult, MutationError> {
        let adapter = self.adapter;
        let Some((accepted, conflicted)) = self.resolve()? else {
            return Ok(MutationResult::unaffected());
        };

        let edits = group::flatten(accepted);
        let new_source = rewrite::apply(adapter.file_source(), &edits)?;
        Ok(MutationResult {
            affected: true,
            conflicted,
            new_source: Some(new_source),
            ..MutationResult::unaffected()
        })
    }

    /// Resolve conflicts and return the accepted action tree without rewriting.
    pub fn test(self) -> Result<MutationResult, MutationError> {
        let Some((accepted, conflicted)) = self.resolve()? else {
            return Ok(MutationResult {
                actions: Some(Vec::new()),
                ..MutationResult::unaffected()
            });
        };

        Ok(MutationResult {
            affected: true,
            conflicted,
            actions: Some(accepted),
            ..MutationResult::unaffected()
        })
    }

    fn register<C>(&mut self, action: C) -> Result<(), MutationError>
    where
        C: CalculateAction<A>,
    {
        let cx = ActionContext::new(self.adapter, self.config.tab_width());
        let action = action.process(&cx)?;
        self.sink().push(action);
        Ok(())
    }

    fn sink(&mut self) -> &mut Vec<Action> {
        match self.group_stack.last_mut() {
            Some(group) => group,
            None => &mut self.actions,
        }
    }

    /// Optimize, transform, sort and resolve conflicts.
    ///
    /// Returns `None` when there is nothing to do, otherwise the sorted
    /// accepted actions and whether any were dropped.
    fn resolve(mut self) -> Result<Option<(Vec<Action>, bool)>, MutationError> {
        let mut actions = group::optimize(std::mem::take(&mut self.actions));
        if actions.is_empty() {
            return Ok(None);
        }

        let strategy = self.config.strategy();
        tracing::debug!(
            actions = actions.len(),
            strategy = ?strategy,
            "processing mutation"
        );

        if let Some(hook) = self.transform.as_mut() {
            group::apply_transform(&mut actions, |edits| hook(edits));
        }
        group::sort(&mut actions);

        let (accepted, conflicting) = conflict::partition(actions, strategy);
        if !conflicting.is_empty() {
            if strategy.throws_on_conflict() {
                return Err(MutationError::Conflict {
                    count: conflicting.len(),
                });
            }
            tracing::warn!(
                dropped = conflicting.len(),
                kept = accepted.len(),
                "dropping conflicting mutation actions"
            );
        }

        Ok(Some((accepted, !conflicting.is_empty())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::adapter::SpanAdapter;
    use crate::range::Range;
    use crate::strategy::Strategy;

    const SOURCE: &str = "class Foobar\n  def foo; end\n  def bar; end\nend\n";

    fn class_name() -> Range {
        Range::new(6, 12)
    }

    #[test]
    fn no_actions_no_effect() {
        let adapter = SpanAdapter::new(SOURCE);
        let result = Mutation::new(&adapter).process().unwrap();
        assert!(!result.affected);
        assert!(!result.conflicted);
        assert_eq!(result.new_source, None);

        let result = Mutation::new(&adapter).test().unwrap();
        assert!(!result.affected);
        assert_eq!(result.actions, Some(Vec::new()));
    }

    #[test]
    fn insert_and_replace() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        mutation
            .insert(&Range::point(0), "# header\n", InsertOptions::at_beginning())
            .unwrap();
        mutation.replace_with(&class_name(), "Synvert").unwrap();

        let result = mutation.process().unwrap();
        assert!(result.affected);
        assert!(!result.conflicted);
        assert_eq!(
            result.new_source.as_deref(),
            Some("# header\nclass Synvert\n  def foo; end\n  def bar; end\nend\n")
        );
    }

    fn conflicting(mutation: &mut Mutation<'_, SpanAdapter<'_>>) {
        mutation.replace_with(&class_name(), "Synvert < Base").unwrap();
        mutation.replace_with(&class_name(), "Synvert").unwrap();
        mutation
            .insert(&class_name(), " < Base", InsertOptions::at_end())
            .unwrap();
    }

    #[test]
    fn keep_running_drops_conflicts() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        conflicting(&mut mutation);

        let result = mutation.process().unwrap();
        assert!(result.conflicted);
        assert_eq!(
            result.new_source.as_deref(),
            Some("class Synvert < Base\n  def foo; end\n  def bar; end\nend\n")
        );
    }

    #[test]
    fn throw_error_aborts() {
        let adapter = SpanAdapter::new(SOURCE);
        let config = MutationConfig::default().with_strategy(Strategy::THROW_ERROR);
        let mut mutation = Mutation::with_config(&adapter, config).unwrap();
        conflicting(&mut mutation);

        let err = mutation.process().unwrap_err();
        assert!(matches!(err, MutationError::Conflict { count: 1 }));
    }

    #[test]
    fn test_reports_accepted_actions() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        conflicting(&mut mutation);

        let result = mutation.test().unwrap();
        assert!(result.conflicted);
        let actions = result.actions.unwrap();
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].new_code(), Some("Synvert"));
        assert_eq!(actions[1].range(), Range::point(12));
    }

    #[test]
    fn same_position_inserts() {
        let adapter = SpanAdapter::new(SOURCE);
        let node = class_name();

        let mut mutation = Mutation::new(&adapter);
        mutation.insert(&node, "Foo", InsertOptions::at_beginning()).unwrap();
        mutation.insert(&node, "Bar", InsertOptions::at_beginning()).unwrap();
        let result = mutation.process().unwrap();
        assert!(result.conflicted);
        assert_eq!(
            result.new_source.as_deref().map(|s| s.lines().next()),
            Some(Some("class BarFoobar"))
        );

        let config = MutationConfig::default()
            .with_strategy(Strategy::KEEP_RUNNING | Strategy::ALLOW_INSERT_AT_SAME_POSITION);
        let mut mutation = Mutation::with_config(&adapter, config).unwrap();
        mutation.insert(&node, "Foo", InsertOptions::at_beginning()).unwrap();
        mutation.insert(&node, "Bar", InsertOptions::at_beginning()).unwrap();
        let result = mutation.process().unwrap();
        assert!(!result.conflicted);
        assert_eq!(
            result.new_source.as_deref().map(|s| s.lines().next()),
            Some(Some("class FooBarFoobar"))
        );
    }

    #[test]
    fn groups_conflict_as_a_unit() {
        let adapter = SpanAdapter::new(SOURCE);
        let foo = Range::new(15, 27);
        let bar = Range::new(30, 42);

        let mut mutation = Mutation::new(&adapter);
        mutation
            .group(|m| {
                m.insert(&foo, "# foo\n  ", InsertOptions::at_beginning())?;
                m.replace_with(&bar, "def baz; end")
            })
            .unwrap();
        mutation
            .group(|m| {
                m.remove(&bar, false)?;
                m.noop(&bar)
            })
            .unwrap();

        let result = mutation.test().unwrap();
        assert!(result.conflicted);
        let actions = result.actions.unwrap();
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind(), ActionKind::Group);
        assert_eq!(actions[0].range(), Range::new(28, 43));
    }

    #[test]
    fn single_child_group_matches_plain_action() {
        let adapter = SpanAdapter::new(SOURCE);

        let mut grouped = Mutation::new(&adapter);
        grouped
            .group(|m| m.replace_with(&class_name(), "Synvert"))
            .unwrap();
        let mut plain = Mutation::new(&adapter);
        plain.replace_with(&class_name(), "Synvert").unwrap();

        assert_eq!(grouped.test().unwrap(), plain.test().unwrap());
    }

    #[test]
    fn failed_group_registers_nothing() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        let err = mutation
            .group(|m| {
                m.replace_with(&class_name(), "Synvert")?;
                m.replace(&class_name(), &["receiver"], "x")
            })
            .unwrap_err();
        assert!(matches!(err, MutationError::SelectorNotSupported { .. }));
        assert!(mutation.actions().is_empty());
    }

    #[test]
    fn wrap_without_newline() {
        let source = "let x = value;";
        let adapter = SpanAdapter::new(source);
        let mut mutation = Mutation::new(&adapter);
        mutation
            .wrap(&Range::new(8, 13), "Some(", ")", false)
            .unwrap();
        let result = mutation.process().unwrap();
        assert_eq!(result.new_source.as_deref(), Some("let x = Some(value);"));
    }

    #[test]
    fn transform_shifts_ranges() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        mutation.replace_with(&Range::new(0, 6), "module").unwrap();
        mutation.set_transform(|edits| {
            for edit in edits {
                edit.range = Range::new(edit.range.start + 6, edit.range.end + 6);
            }
        });
        let result = mutation.process().unwrap();
        assert_eq!(
            result.new_source.as_deref().map(|s| s.lines().next()),
            Some(Some("class module"))
        );
    }

    #[test]
    fn raw_edits_and_noop() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        mutation.push_action(Edit::new(ActionKind::Replace, 0..5, Some("struct".to_string())));
        mutation.noop(&class_name()).unwrap();
        let result = mutation.process().unwrap();
        assert!(!result.conflicted);
        assert!(result.new_source.unwrap().starts_with("struct Foobar\n"));
    }

    #[test]
    fn pinned_adapter_must_match() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut config = MutationConfig::default();
        config.pin_adapter(crate::adapter::AdapterKind::TreeSitterRust);
        assert!(matches!(
            Mutation::with_config(&adapter, config),
            Err(MutationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn group_with_overlapping_children_is_dropped() {
        let adapter = SpanAdapter::new("abcdefgh");
        let mut mutation = Mutation::new(&adapter);
        mutation
            .group(|m| {
                m.replace_with(&Range::new(4, 8), "")?;
                m.replace_with(&Range::new(2, 6), "")
            })
            .unwrap();
        let result = mutation.process().unwrap();
        assert!(result.conflicted);
        assert_eq!(result.new_source.as_deref(), Some("abcdefgh"));

        let config = MutationConfig::default().with_strategy(Strategy::THROW_ERROR);
        let mut mutation = Mutation::with_config(&adapter, config).unwrap();
        mutation
            .group(|m| {
                m.replace_with(&Range::new(4, 8), "")?;
                m.replace_with(&Range::new(2, 6), "")
            })
            .unwrap();
        assert!(matches!(
            mutation.process(),
            Err(MutationError::Conflict { count: 1 })
        ));
    }

    #[test]
    fn duplicate_replace_in_group_keeps_other_actions() {
        let adapter = SpanAdapter::new("let x = value;");
        let value = Range::new(8, 13);
        let mut mutation = Mutation::new(&adapter);
        mutation.replace_with(&Range::new(0, 3), "const").unwrap();
        mutation
            .group(|m| {
                m.replace_with(&value, "a")?;
                m.replace_with(&value, "b")
            })
            .unwrap();
        let result = mutation.process().unwrap();
        assert!(result.conflicted);
        assert_eq!(result.new_source.as_deref(), Some("const x = value;"));
    }

    #[test]
    fn inverted_range_from_transform_is_reported() {
        let adapter = SpanAdapter::new(SOURCE);
        let mut mutation = Mutation::new(&adapter);
        mutation.replace_with(&class_name(), "Synvert").unwrap();
        mutation.set_transform(|edits| {
            for edit in edits {
                edit.range = Range::new(edit.range.end, edit.range.start);
            }
        });
        assert!(matches!(
            mutation.process(),
            Err(MutationError::InvalidRange { start: 12, end: 6, .. })
        ));
    }
}
