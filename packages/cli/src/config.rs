use blockform_editor::{EditorOptions, DEFAULT_HISTORY_DEPTH};
use blockform_linter::LintOptions;
use blockform_logic::{BaseVisibility, EvaluationOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "blockform.config.json";

/// Blockform configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Undo levels kept by `edit` (0 = unlimited)
    #[serde(default = "default_history_depth")]
    pub history_depth: usize,

    /// Visibility of blocks before any rule fires
    #[serde(default)]
    pub base_visibility: BaseVisibility,

    #[serde(default)]
    pub lint: LintConfig,
}

fn default_history_depth() -> usize {
    DEFAULT_HISTORY_DEPTH
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintConfig {
    /// Rule names to skip
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Fail on warnings as well as errors
    #[serde(default)]
    pub deny_warnings: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn editor_options(&self) -> EditorOptions {
        EditorOptions {
            history_depth: self.history_depth,
        }
    }

    pub fn evaluation_options(&self) -> EvaluationOptions {
        EvaluationOptions {
            base_visibility: self.base_visibility,
        }
    }

    pub fn lint_options(&self) -> LintOptions {
        LintOptions {
            registry: None,
            disabled: self.lint.disabled.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_depth: default_history_depth(),
            base_visibility: BaseVisibility::default(),
            lint: LintConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "historyDepth": 10,
            "baseVisibility": "hidden_until_shown",
            "lint": { "disabled": ["empty-rule"], "denyWarnings": true }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.history_depth, 10);
        assert_eq!(config.base_visibility, BaseVisibility::HiddenUntilShown);
        assert_eq!(config.lint.disabled, vec!["empty-rule"]);
        assert!(config.lint.deny_warnings);
        assert_eq!(config.editor_options().history_depth, 10);
    }

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.history_depth, 50);
        assert_eq!(config.base_visibility, BaseVisibility::Visible);
        assert!(config.lint.disabled.is_empty());
        assert!(!config.lint.deny_warnings);
    }
}
