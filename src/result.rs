use crate::action::Action;
use serde::Serialize;
use std::path::PathBuf;

/// Outcome of one `process` or `test` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationResult {
    /// Source file the mutation ran over, when the caller supplied one.
    pub file_path: Option<PathBuf>,
    /// At least one action was registered.
    pub affected: bool,
    /// Some actions were dropped because they overlapped later ones.
    pub conflicted: bool,
    /// Rewritten source (`process` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_source: Option<String>,
    /// Accepted action tree (`test` only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}

impl MutationResult {
    pub(crate) fn unaffected() -> Self {
        Self {
            file_path: None,
            affected: false,
            conflicted: false,
            new_source: None,
            actions: None,
        }
    }

    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionKind, Edit};

    #[test]
    fn json_includes_file_path_and_actions() {
        let result = MutationResult {
            actions: Some(vec![Action::Edit(Edit::new(
                ActionKind::Insert,
                0..0,
                Some("# header\n".to_string()),
            ))]),
            affected: true,
            ..MutationResult::unaffected()
        }
        .with_file_path("src/lib.rs");

        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(json["file_path"], "src/lib.rs");
        assert_eq!(json["affected"], true);
        assert_eq!(json["conflicted"], false);
        assert_eq!(json["actions"][0]["kind"], "insert");
        assert_eq!(json["actions"][0]["new_code"], "# header\n");
        assert!(json.get("new_source").is_none());
    }

    #[test]
    fn unaffected_has_no_path() {
        let json: serde_json::Value =
            serde_json::from_str(&MutationResult::unaffected().to_json().unwrap()).unwrap();
        assert!(json["file_path"].is_null());
        assert_eq!(json["affected"], false);
    }
}
