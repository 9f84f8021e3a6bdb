use crate::config::ConfigError;
use crate::range::Range;
use thiserror::Error;

/// Longest node source kept in diagnostics.
const SNIPPET_LIMIT: usize = 60;

#[derive(Error, Debug)]
pub enum MutationError {
    #[error("{selector} is not supported for {snippet}")]
    SelectorNotSupported { selector: String, snippet: String },

    #[error("mutation actions are conflicted: {count} conflicting action(s)")]
    Conflict { count: usize },

    #[error("cannot render {{{{{path}}}}} as text: it resolved to a {kind}")]
    TemplateEvaluation { path: String, kind: &'static str },

    #[error("malformed template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("invalid byte range [{start}, {end}) in source of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("edits {first} and {second} overlap")]
    OverlappingEdits { first: Range, second: Range },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

impl MutationError {
    /// Build a `SelectorNotSupported` error, truncating the node source.
    pub fn selector_not_supported(selector: impl Into<String>, source: &str) -> Self {
        MutationError::SelectorNotSupported {
            selector: selector.into(),
            snippet: snippet(source),
        }
    }
}

fn snippet(source: &str) -> String {
    let mut chars = source.char_indices();
    match chars.nth(SNIPPET_LIMIT) {
        Some((idx, _)) => format!("{}...", &source[..idx]),
        None => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_message_names_token_and_source() {
        let err = MutationError::selector_not_supported("receiver", "foo(bar)");
        assert_eq!(err.to_string(), "receiver is not supported for foo(bar)");
    }

    #[test]
    fn long_sources_are_truncated() {
        let source = "x".repeat(200);
        let MutationError::SelectorNotSupported { snippet, .. } =
            MutationError::selector_not_supported("name", &source)
        else {
            panic!("unexpected variant");
        };
        assert_eq!(snippet.len(), SNIPPET_LIMIT + 3);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn template_message_shows_placeholder() {
        let err = MutationError::TemplateEvaluation {
            path: "has_error".to_string(),
            kind: "boolean",
        };
        assert_eq!(
            err.to_string(),
            "cannot render {{has_error}} as text: it resolved to a boolean"
        );
    }
}
