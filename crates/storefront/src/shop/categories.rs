//! Category list load state.

use serde::Serialize;

/// Where the one-shot category fetch stands.
///
/// `Idle → Loading → {Loaded | Failed}`. There is no retry: once `Failed`,
/// the error string stays for the rest of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryState {
    #[default]
    Idle,
    Loading,
    Loaded { categories: Vec<String> },
    Failed { error: String },
}

impl CategoryState {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded categories, or an empty slice in any other state.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        match self {
            Self::Loaded { categories } => categories,
            _ => &[],
        }
    }

    /// The user-visible error message, if loading failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let loaded = CategoryState::Loaded {
            categories: vec!["electronics".to_string()],
        };
        assert_eq!(loaded.categories(), ["electronics".to_string()]);
        assert!(loaded.error().is_none());

        let failed = CategoryState::Failed {
            error: "Error: boom".to_string(),
        };
        assert!(failed.categories().is_empty());
        assert_eq!(failed.error(), Some("Error: boom"));
        assert!(CategoryState::Loading.is_loading());
    }

    #[test]
    fn test_serializes_with_status_tag() {
        let json = serde_json::to_value(CategoryState::Loading).unwrap();
        assert_eq!(json, serde_json::json!({"status": "loading"}));
    }
}
