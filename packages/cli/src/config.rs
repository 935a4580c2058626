use richedit_editor::{EditorConfig, DEFAULT_CONFIG_NAME};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Richedit configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// File extensions treated as markup when walking directories
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Editor presentation defaults
    #[serde(flatten)]
    pub editor: EditorConfig,
}

fn default_extensions() -> Vec<String> {
    vec!["html".to_string(), "htm".to_string()]
}

impl Config {
    /// Load config from an explicit path, or from a directory
    pub fn load(cwd: &str, explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
                }
                path.to_path_buf()
            }
            None => PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!("[Config] loaded {}", config_path.display());
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn is_markup_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            editor: EditorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "extensions": ["xhtml"],
            "indentStepPx": 16,
            "documentOrigin": "https://docs.example.org"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.extensions, vec!["xhtml"]);
        assert_eq!(config.editor.indent_step_px, 16);
        assert_eq!(config.editor.document_origin, "https://docs.example.org");
        assert_eq!(config.editor.table_classes, "table-auto border-collapse w-full");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.extensions, vec!["html", "htm"]);
        assert_eq!(config.editor, EditorConfig::default());
    }

    #[test]
    fn test_markup_extension_match() {
        let config = Config::default();
        assert!(config.is_markup_file(Path::new("notes/page.HTML")));
        assert!(config.is_markup_file(Path::new("a.htm")));
        assert!(!config.is_markup_file(Path::new("a.json")));
        assert!(!config.is_markup_file(Path::new("README")));
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let missing = std::env::temp_dir().join("richedit-cli-no-such-config.json");
        assert!(Config::load(".", Some(&missing)).is_err());
    }
}
