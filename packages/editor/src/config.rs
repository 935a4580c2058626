//! Editor configuration.
//!
//! Everything here tunes presentation defaults. Trusted tags, attributes
//! and embed hosts are fixed tables in [`crate::sanitizer::policy`] and are
//! not configurable.

use crate::EditorError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_NAME: &str = "richedit.config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Left margin change per indent step, in pixels
    #[serde(default = "default_indent_step")]
    pub indent_step_px: u32,

    /// Text inserted when indenting inside a nested editable region
    #[serde(default = "default_nested_indent")]
    pub nested_indent: String,

    /// Base URL for resolving relative embed sources
    #[serde(default = "default_document_origin")]
    pub document_origin: String,

    /// Inline style applied to inserted links
    #[serde(default = "default_link_style")]
    pub link_style: String,

    #[serde(default = "default_table_classes")]
    pub table_classes: String,

    #[serde(default = "default_table_cell_classes")]
    pub table_cell_classes: String,
}

fn default_indent_step() -> u32 {
    20
}

fn default_nested_indent() -> String {
    "\u{a0}".repeat(4)
}

fn default_document_origin() -> String {
    "http://localhost".to_string()
}

fn default_link_style() -> String {
    "color:#007bff;text-decoration:underline;font-weight:bold;transition:color 0.2s;".to_string()
}

fn default_table_classes() -> String {
    "table-auto border-collapse w-full".to_string()
}

fn default_table_cell_classes() -> String {
    "border px-2 py-1".to_string()
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self, EditorError> {
        let path = dir.join(DEFAULT_CONFIG_NAME);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, EditorError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            indent_step_px: default_indent_step(),
            nested_indent: default_nested_indent(),
            document_origin: default_document_origin(),
            link_style: default_link_style(),
            table_classes: default_table_classes(),
            table_cell_classes: default_table_cell_classes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{ "indentStepPx": 32, "documentOrigin": "https://docs.example.org" }"#;
        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.indent_step_px, 32);
        assert_eq!(config.document_origin, "https://docs.example.org");
        assert_eq!(config.nested_indent, "\u{a0}\u{a0}\u{a0}\u{a0}");
        assert_eq!(config.table_cell_classes, "border px-2 py-1");
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.indent_step_px, 20);
        assert_eq!(config.document_origin, "http://localhost");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = std::env::temp_dir().join("richedit-config-missing");
        let config = EditorConfig::load(&dir).unwrap();
        assert_eq!(config, EditorConfig::default());
    }
}
