//! Configuration handling for the TUI

use crate::state::ValidationMode;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Record service base URL
    pub api_base_url: Option<String>,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: Option<u64>,
    /// When fields are validated outside of submission
    pub validation_mode: Option<ValidationMode>,
    /// Reset the form after a successful submission
    pub reset_on_submit_success: Option<bool>,
}

impl TuiConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "channel-form", "channel-form-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                tracing::debug!("Loaded config from {}", path.display());
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn validation_mode(&self) -> ValidationMode {
        self.validation_mode.unwrap_or_default()
    }

    pub fn reset_on_submit_success(&self) -> bool {
        self.reset_on_submit_success.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TuiConfig::default();
        assert!(config.api_base_url.is_none());
        assert!(config.request_timeout_secs.is_none());
        assert_eq!(config.validation_mode(), ValidationMode::OnSubmit);
        assert!(!config.reset_on_submit_success());
    }

    #[test]
    fn test_serialization() {
        let config = TuiConfig {
            api_base_url: Some("http://localhost:3000".to_string()),
            request_timeout_secs: Some(5),
            validation_mode: Some(ValidationMode::OnBlur),
            reset_on_submit_success: Some(true),
        };

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"on_blur\""));
        let parsed: TuiConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.api_base_url, Some("http://localhost:3000".to_string()));
        assert_eq!(parsed.request_timeout_secs, Some(5));
        assert_eq!(parsed.validation_mode(), ValidationMode::OnBlur);
        assert!(parsed.reset_on_submit_success());
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: TuiConfig = serde_json::from_str("{}").unwrap();
        assert!(parsed.api_base_url.is_none());
        assert_eq!(parsed.validation_mode(), ValidationMode::OnSubmit);
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"validation_mode": "on_change", "unknown_field": "value"}"#;
        let parsed: TuiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.validation_mode(), ValidationMode::OnChange);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        let json = r#"{"validation_mode": "on_keypress"}"#;
        assert!(serde_json::from_str::<TuiConfig>(json).is_err());
    }

    #[test]
    fn test_load_returns_ok() {
        // Depends on whether a user config exists; only check it doesn't fail
        let result = TuiConfig::load();
        assert!(result.is_ok());
    }
}
