//! Configuration for the Importer

use licita_llm::GenerationSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterConfig {
    /// Character budget for normalized content sent as text
    pub max_content_chars: usize,

    /// Maximum time for the extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Send paged documents in their original form when the bytes are available
    pub send_original_documents: bool,

    /// Lot label for items without one
    pub default_lot: String,

    /// Unit label for items without one
    pub default_unit: String,

    /// Sampling and filtering settings for the extraction call
    pub generation: GenerationSettings,
}

impl ImporterConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_content_chars == 0 {
            return Err("max_content_chars must be greater than 0".to_string());
        }
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.generation.max_output_tokens == 0 {
            return Err("generation.max_output_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.generation.temperature) {
            return Err("generation.temperature must be between 0.0 and 2.0".to_string());
        }
        if self.default_lot.trim().is_empty() {
            return Err("default_lot cannot be blank".to_string());
        }
        if self.default_unit.trim().is_empty() {
            return Err("default_unit cannot be blank".to_string());
        }
        Ok(())
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 400_000,
            extraction_timeout_secs: 300,
            send_original_documents: true,
            default_lot: "Lote Único".to_string(),
            default_unit: "UND".to_string(),
            generation: GenerationSettings::default(),
        }
    }
}

impl ImporterConfig {
    /// Text-only preset: paged documents are always sent as extracted text
    pub fn text_only() -> Self {
        Self {
            send_original_documents: false,
            ..Self::default()
        }
    }

    /// Compact preset: smaller content budget and output ceiling, shorter timeout
    pub fn compact() -> Self {
        Self {
            max_content_chars: 100_000,
            extraction_timeout_secs: 120,
            generation: GenerationSettings {
                max_output_tokens: 4096,
                ..GenerationSettings::default()
            },
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ImporterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_content_chars, 400_000);
        assert_eq!(config.extraction_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(ImporterConfig::text_only().validate().is_ok());
        assert!(!ImporterConfig::text_only().send_original_documents);
        assert!(ImporterConfig::compact().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ImporterConfig::default();
        config.max_content_chars = 0;
        assert!(config.validate().is_err());

        let mut config = ImporterConfig::default();
        config.default_unit = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = ImporterConfig::default();
        config.generation.temperature = 3.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ImporterConfig::compact();
        let toml_str = config.to_toml().unwrap();
        let parsed = ImporterConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed = ImporterConfig::from_toml("max_content_chars = 1000\n").unwrap();
        assert_eq!(parsed.max_content_chars, 1000);
        assert_eq!(parsed.default_lot, "Lote Único");
        assert_eq!(parsed.generation.max_output_tokens, 8192);
    }
}
