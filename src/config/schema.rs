use crate::adapter::AdapterKind;
use crate::config::settings::{MutationConfig, MAX_TAB_WIDTH};
use crate::strategy::Strategy;
use serde::Deserialize;
use std::fmt;

/// On-disk shape of a mutation config document.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct ConfigDocument {
    #[serde(default)]
    pub adapter: Option<String>,
    #[serde(default)]
    pub strategy: Option<Vec<String>>,
    #[serde(default)]
    pub tab_width: Option<i64>,
}

impl ConfigDocument {
    /// Check every field and build the runtime config, reporting all issues at once.
    pub fn validate(&self) -> Result<MutationConfig, ValidationError> {
        let mut issues = Vec::new();
        let mut config = MutationConfig::default();

        if let Some(name) = &self.adapter {
            match AdapterKind::parse(name) {
                Some(kind) => config.pin_adapter(kind),
                None => issues.push(ValidationIssue::UnknownAdapter(name.clone())),
            }
        }

        if let Some(names) = &self.strategy {
            let mut strategy = Strategy::empty();
            for name in names {
                match Strategy::parse(name) {
                    Some(flag) => strategy |= flag,
                    None => issues.push(ValidationIssue::UnknownStrategy(name.clone())),
                }
            }
            if strategy.contains(Strategy::KEEP_RUNNING | Strategy::THROW_ERROR) {
                issues.push(ValidationIssue::InvalidCombo {
                    message: "keep-running and throw-error cannot both be set".to_string(),
                });
            }
            if !strategy.intersects(Strategy::KEEP_RUNNING | Strategy::THROW_ERROR) {
                strategy |= Strategy::KEEP_RUNNING;
            }
            config.set_strategy(strategy);
        }

        if let Some(width) = self.tab_width {
            match usize::try_from(width) {
                Ok(width) if (1..=MAX_TAB_WIDTH).contains(&width) => {
                    config.tab_width = width;
                }
                _ => issues.push(ValidationIssue::TabWidthOutOfRange(width)),
            }
        }

        if issues.is_empty() {
            Ok(config)
        } else {
            Err(ValidationError { issues })
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn single(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnknownAdapter(String),
    UnknownStrategy(String),
    InvalidCombo {
        message: String,
    },
    TabWidthOutOfRange(i64),
    AdapterMismatch {
        expected: AdapterKind,
        found: AdapterKind,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownAdapter(name) => write!(f, "unknown adapter kind '{name}'"),
            ValidationIssue::UnknownStrategy(name) => write!(f, "unknown strategy '{name}'"),
            ValidationIssue::InvalidCombo { message } => {
                write!(f, "invalid strategy combination: {message}")
            }
            ValidationIssue::TabWidthOutOfRange(width) => {
                write!(f, "tab_width must be between 1 and {MAX_TAB_WIDTH}, got {width}")
            }
            ValidationIssue::AdapterMismatch { expected, found } => write!(
                f,
                "config expects the '{}' adapter but the mutation uses '{}'",
                expected.name(),
                found.name()
            ),
        }
    }
}
