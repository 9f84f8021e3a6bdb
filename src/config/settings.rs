use crate::adapter::AdapterKind;
use crate::config::loader::ConfigError;
use crate::config::schema::{ValidationError, ValidationIssue};
use crate::error::MutationError;
use crate::strategy::Strategy;

pub const DEFAULT_TAB_WIDTH: usize = 2;
pub const MAX_TAB_WIDTH: usize = 16;

/// Per-mutation settings: conflict strategy, indentation width and an
/// optional adapter pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationConfig {
    strategy: Strategy,
    pub(crate) tab_width: usize,
    adapter: Option<AdapterKind>,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            tab_width: DEFAULT_TAB_WIDTH,
            adapter: None,
        }
    }
}

impl MutationConfig {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.strategy = strategy;
    }

    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Set the indentation width used by Append, Prepend, Indent and Wrap.
    pub fn set_tab_width(&mut self, tab_width: usize) -> Result<(), MutationError> {
        if !(1..=MAX_TAB_WIDTH).contains(&tab_width) {
            let width = i64::try_from(tab_width).unwrap_or(i64::MAX);
            return Err(invalid(ValidationIssue::TabWidthOutOfRange(width)));
        }
        self.tab_width = tab_width;
        Ok(())
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Result<Self, MutationError> {
        self.set_tab_width(tab_width)?;
        Ok(self)
    }

    pub fn adapter(&self) -> Option<AdapterKind> {
        self.adapter
    }

    /// Require mutations built from this config to use a specific adapter.
    pub fn pin_adapter(&mut self, kind: AdapterKind) {
        self.adapter = Some(kind);
    }

    /// Fail if this config is pinned to a different adapter than `kind`.
    pub fn check_adapter(&self, kind: AdapterKind) -> Result<(), MutationError> {
        match self.adapter {
            Some(expected) if expected != kind => Err(invalid(ValidationIssue::AdapterMismatch {
                expected,
                found: kind,
            })),
            _ => Ok(()),
        }
    }
}

fn invalid(issue: ValidationIssue) -> MutationError {
    MutationError::InvalidConfiguration(ConfigError::Invalid {
        path: None,
        source: ValidationError::single(issue),
    })
}
