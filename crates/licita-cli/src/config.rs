//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use licita_extractor::ImporterConfig;
use licita_llm::GeminiProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default supplier registry file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers_file: Option<PathBuf>,

    /// Extraction service connection
    #[serde(default)]
    pub gemini: GeminiSettings,

    /// Importer settings
    #[serde(default)]
    pub importer: ImporterConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Extraction service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSettings {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name
    #[serde(default = "default_model")]
    pub model: String,

    /// API key; the environment variable takes precedence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".licita").join("config.toml"))
    }

    /// Load configuration from the default path, or defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.importer.validate().map_err(CliError::Config)?;
        Ok(config)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// API key from `env_value` if set, else from the file.
    pub fn api_key(&self, env_value: Option<String>) -> Option<String> {
        env_value
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.gemini.api_key.clone())
            .filter(|key| !key.trim().is_empty())
    }

    /// Build the extraction provider.
    pub fn provider(&self) -> Result<GeminiProvider> {
        let api_key = self.api_key(std::env::var(API_KEY_ENV).ok()).ok_or_else(|| {
            CliError::Config(format!(
                "No API key: set {} or gemini.api_key in the config file",
                API_KEY_ENV
            ))
        })?;

        let provider = GeminiProvider::new(api_key, self.gemini.model.as_str())?
            .with_endpoint(self.gemini.endpoint.as_str())
            .with_timeout(self.importer.extraction_timeout())?;
        Ok(provider)
    }
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
        assert!(config.gemini.api_key.is_none());
        assert!(config.settings.color);
        assert_eq!(config.settings.format, OutputFormat::Table);
        assert_eq!(config.importer, ImporterConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
suppliers_file = "suppliers.toml"

[gemini]
model = "gemini-2.5-pro"

[importer]
send_original_documents = false

[settings]
format = "json"
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.gemini.model, "gemini-2.5-pro");
        assert_eq!(config.gemini.endpoint, default_endpoint());
        assert!(!config.importer.send_original_documents);
        assert_eq!(config.importer.max_content_chars, 400_000);
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert!(config.settings.color);
        assert_eq!(config.suppliers_file, Some(PathBuf::from("suppliers.toml")));
    }

    #[test]
    fn test_invalid_importer_section_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[importer]\nmax_content_chars = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.gemini.api_key = Some("file-key".to_string());
        config.settings.color = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.gemini.api_key.as_deref(), Some("file-key"));
        assert!(!loaded.settings.color);
    }

    #[test]
    fn test_api_key_precedence() {
        let mut config = Config::default();
        assert_eq!(config.api_key(None), None);

        config.gemini.api_key = Some("file-key".to_string());
        assert_eq!(config.api_key(None).as_deref(), Some("file-key"));
        assert_eq!(config.api_key(Some("env-key".to_string())).as_deref(), Some("env-key"));
        assert_eq!(config.api_key(Some("  ".to_string())).as_deref(), Some("file-key"));
    }
}
