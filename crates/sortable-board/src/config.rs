#![forbid(unsafe_code)]

//! Policy-as-data configuration for boards.
//!
//! [`BoardConfig`] gathers the tunables of a board (column reorder policy,
//! allowed edges, gesture threshold) so hosts can load them from TOML or JSON
//! instead of hardcoding them.
//!
//! # Loading
//!
//! ```toml
//! # sortable.toml
//! column_policy = "positional"
//! item_edges = "TOP | BOTTOM"
//! column_edges = "LEFT | RIGHT"
//!
//! [gesture]
//! drag_threshold = 2
//! ```
//!
//! ```rust,ignore
//! let config = BoardConfig::from_toml_file("sortable.toml")?.validated()?;
//! ```
//!
//! # Defaults
//!
//! `BoardConfig::default()` is edge-aware column reordering, top/bottom item
//! edges, left/right column edges, and a 3-cell drag threshold.

#[cfg(feature = "board-config")]
use std::path::Path;

#[cfg(feature = "board-config")]
use serde::{Deserialize, Serialize};

use sortable_core::{Axis, EdgeSet, GestureConfig};

use crate::columns::ColumnReorderPolicy;

/// Board-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "board-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "board-config", serde(default))]
pub struct BoardConfig {
    /// How container drops reorder columns.
    pub column_policy: ColumnReorderPolicy,

    /// Edges item drop targets report.
    pub item_edges: EdgeSet,

    /// Edges column drop targets report.
    pub column_edges: EdgeSet,

    /// Drag recognition thresholds.
    pub gesture: GestureSettings,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            column_policy: ColumnReorderPolicy::default(),
            item_edges: Axis::Vertical.edges(),
            column_edges: Axis::Horizontal.edges(),
            gesture: GestureSettings::default(),
        }
    }
}

/// Gesture thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "board-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "board-config", serde(default))]
pub struct GestureSettings {
    /// Manhattan distance in cells before a press becomes a drag.
    pub drag_threshold: u16,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            drag_threshold: GestureConfig::default().drag_threshold,
        }
    }
}

impl BoardConfig {
    /// Load from a TOML string.
    #[cfg(feature = "board-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, BoardConfigError> {
        toml::from_str(s).map_err(BoardConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "board-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, BoardConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(BoardConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "board-config")]
    pub fn from_json_str(s: &str) -> Result<Self, BoardConfigError> {
        serde_json::from_str(s).map_err(BoardConfigError::Json)
    }

    /// Serialize to TOML.
    #[cfg(feature = "board-config")]
    pub fn to_toml_string(&self) -> Result<String, BoardConfigError> {
        toml::to_string(self).map_err(BoardConfigError::TomlSer)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.gesture.drag_threshold == 0 {
            errors.push("gesture.drag_threshold must be > 0".into());
        }

        if self.item_edges.is_empty() {
            errors.push("item_edges must allow at least one edge".into());
        } else if !Axis::Vertical.edges().contains(self.item_edges) {
            errors.push(format!(
                "item_edges must be top/bottom only, got {:?}",
                self.item_edges
            ));
        }

        if self.column_edges.is_empty() {
            errors.push("column_edges must allow at least one edge".into());
        } else if !Axis::Horizontal.edges().contains(self.column_edges) {
            errors.push(format!(
                "column_edges must be left/right only, got {:?}",
                self.column_edges
            ));
        }

        errors
    }

    /// `self` if [`validate`](Self::validate) passes.
    pub fn validated(self) -> Result<Self, BoardConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(BoardConfigError::Validation(errors))
        }
    }

    /// Gesture recognizer configuration derived from these settings.
    #[must_use]
    pub fn to_gesture_config(&self) -> GestureConfig {
        GestureConfig {
            drag_threshold: self.gesture.drag_threshold,
        }
    }
}

/// Errors from loading or validating a [`BoardConfig`].
#[derive(Debug)]
pub enum BoardConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "board-config")]
    Toml(toml::de::Error),
    /// TOML serialization error.
    #[cfg(feature = "board-config")]
    TomlSer(toml::ser::Error),
    /// JSON parse error.
    #[cfg(feature = "board-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for BoardConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "board-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "board-config")]
            Self::TomlSer(e) => write!(f, "TOML serialize error: {e}"),
            #[cfg(feature = "board-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for BoardConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "board-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "board-config")]
            Self::TomlSer(e) => Some(e),
            #[cfg(feature = "board-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = BoardConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.column_policy, ColumnReorderPolicy::EdgeAware);
        assert_eq!(config.item_edges, EdgeSet::VERTICAL);
        assert_eq!(config.column_edges, EdgeSet::HORIZONTAL);
        assert_eq!(config.to_gesture_config(), GestureConfig::default());
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut config = BoardConfig::default();
        config.gesture.drag_threshold = 0;
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("drag_threshold"));
    }

    #[test]
    fn edges_on_wrong_axis_rejected() {
        let config = BoardConfig {
            item_edges: EdgeSet::LEFT | EdgeSet::TOP,
            column_edges: EdgeSet::empty(),
            ..BoardConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("item_edges"));
        assert!(errors[1].starts_with("column_edges"));
    }

    #[test]
    fn single_edge_sets_are_allowed() {
        let config = BoardConfig {
            item_edges: EdgeSet::BOTTOM,
            column_edges: EdgeSet::RIGHT,
            ..BoardConfig::default()
        };
        assert!(config.validated().is_ok());
    }

    #[test]
    fn validation_error_display() {
        let mut config = BoardConfig::default();
        config.gesture.drag_threshold = 0;
        let err = config.validated().unwrap_err();
        assert!(err.to_string().starts_with("validation errors:"));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[cfg(feature = "board-config")]
    mod serde_tests {
        use super::*;

        #[test]
        fn partial_toml_fills_defaults() {
            let config = BoardConfig::from_toml_str(
                r#"
                column_policy = "positional"

                [gesture]
                drag_threshold = 5
                "#,
            )
            .unwrap();
            assert_eq!(config.column_policy, ColumnReorderPolicy::Positional);
            assert_eq!(config.gesture.drag_threshold, 5);
            assert_eq!(config.item_edges, EdgeSet::VERTICAL);
        }

        #[test]
        fn toml_round_trip() {
            let config = BoardConfig {
                column_policy: ColumnReorderPolicy::Positional,
                item_edges: EdgeSet::BOTTOM,
                ..BoardConfig::default()
            };
            let text = config.to_toml_string().unwrap();
            assert_eq!(BoardConfig::from_toml_str(&text).unwrap(), config);
        }

        #[test]
        fn json_load() {
            let config =
                BoardConfig::from_json_str(r#"{"column_edges": "LEFT", "gesture": {}}"#).unwrap();
            assert_eq!(config.column_edges, EdgeSet::LEFT);
            assert_eq!(config.gesture.drag_threshold, 3);
        }

        #[test]
        fn file_load_and_errors() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("sortable.toml");
            std::fs::write(&path, "item_edges = \"TOP\"\n").unwrap();
            let config = BoardConfig::from_toml_file(&path).unwrap();
            assert_eq!(config.item_edges, EdgeSet::TOP);

            let missing = BoardConfig::from_toml_file(dir.path().join("absent.toml"));
            assert!(matches!(missing, Err(BoardConfigError::Io(_))));

            let bad = BoardConfig::from_toml_str("column_policy = 7");
            assert!(matches!(bad, Err(BoardConfigError::Toml(_))));
            assert!(std::error::Error::source(&bad.unwrap_err()).is_some());
        }
    }
}
