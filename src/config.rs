use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_content_api_base")]
    pub content_api_base: String,
    #[serde(default = "default_content_model")]
    pub content_model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_code_language")]
    pub code_language: String,
    #[serde(default = "default_shuffle_puzzles")]
    pub shuffle_puzzles: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_content_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_content_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_api_key_env() -> String {
    "ALGOLINGO_API_KEY".to_string()
}
fn default_request_timeout_secs() -> u64 {
    90
}
fn default_code_language() -> String {
    "python".to_string()
}
fn default_shuffle_puzzles() -> bool {
    true
}
fn default_history_limit() -> usize {
    500
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            content_api_base: default_content_api_base(),
            content_model: default_content_model(),
            api_key_env: default_api_key_env(),
            request_timeout_secs: default_request_timeout_secs(),
            code_language: default_code_language(),
            shuffle_puzzles: default_shuffle_puzzles(),
            history_limit: default_history_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("algolingo")
            .join("config.toml")
    }

    /// Clamp numeric settings into usable ranges and restore blank strings.
    pub fn validate(&mut self) {
        self.request_timeout_secs = self.request_timeout_secs.clamp(5, 600);
        self.history_limit = self.history_limit.clamp(10, 5000);
        if self.content_api_base.trim().is_empty() {
            self.content_api_base = default_content_api_base();
        }
        if self.code_language.trim().is_empty() {
            self.code_language = default_code_language();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.api_key_env, "ALGOLINGO_API_KEY");
        assert!(config.shuffle_puzzles);
        assert_eq!(config.history_limit, 500);
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "gruvbox-dark"
content_model = "local-llama"
shuffle_puzzles = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "gruvbox-dark");
        assert_eq!(config.content_model, "local-llama");
        assert!(!config.shuffle_puzzles);
        assert_eq!(config.request_timeout_secs, 90);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.content_api_base, deserialized.content_api_base);
        assert_eq!(config.history_limit, deserialized.history_limit);
    }

    #[test]
    fn test_config_validate_clamps_values() {
        let mut config = Config {
            request_timeout_secs: 0,
            history_limit: 1_000_000,
            content_api_base: "  ".into(),
            ..Config::default()
        };
        config.validate();
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.history_limit, 5000);
        assert_eq!(config.content_api_base, "https://api.openai.com/v1");
    }
}
