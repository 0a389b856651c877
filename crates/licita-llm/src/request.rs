//! Request and response shapes shared by every provider

use serde::{Deserialize, Serialize};

/// Content-safety harm categories the service filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    /// HARM_CATEGORY_HATE_SPEECH
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// HARM_CATEGORY_SEXUALLY_EXPLICIT
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// HARM_CATEGORY_DANGEROUS_CONTENT
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    /// HARM_CATEGORY_HARASSMENT
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
}

impl HarmCategory {
    /// Every category a request configures
    pub const ALL: [HarmCategory; 4] = [
        HarmCategory::HateSpeech,
        HarmCategory::SexuallyExplicit,
        HarmCategory::DangerousContent,
        HarmCategory::Harassment,
    ];
}

/// Blocking threshold applied to every harm category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyThreshold {
    /// Never block (least restrictive)
    #[default]
    BlockNone,
    /// Block only high-probability harm
    BlockOnlyHigh,
    /// Block medium and high
    BlockMediumAndAbove,
    /// Block low, medium and high
    BlockLowAndAbove,
}

/// Sampling and filtering settings for one generation
///
/// Defaults lean deterministic (temperature 0.1), cap the output at 8192
/// tokens, ask for JSON, and disable content blocking: the input is
/// administrative and financial text, where a false-positive block would abort
/// a valid extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Sampling temperature
    pub temperature: f32,

    /// Output token ceiling
    pub max_output_tokens: u32,

    /// Media type requested for the response body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,

    /// Threshold for all harm categories
    pub safety_threshold: SafetyThreshold,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_output_tokens: 8192,
            response_mime_type: Some("application/json".to_string()),
            safety_threshold: SafetyThreshold::BlockNone,
        }
    }
}

/// Original document bytes sent alongside the prompt
#[derive(Debug, Clone, PartialEq)]
pub struct InlineDocument {
    /// Declared media type, e.g. `application/pdf`
    pub mime_type: String,

    /// Raw file content
    pub data: Vec<u8>,
}

/// One extraction request
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Task description, target schema and (for text input) the content
    pub prompt: String,

    /// Original document, when sent as-is instead of normalized text
    pub attachment: Option<InlineDocument>,

    /// Sampling and filtering settings
    pub settings: GenerationSettings,
}

impl GenerationRequest {
    /// Text-only request with default settings
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            attachment: None,
            settings: GenerationSettings::default(),
        }
    }

    /// Attach an original document
    pub fn with_attachment(mut self, document: InlineDocument) -> Self {
        self.attachment = Some(document);
        self
    }

    /// Override the settings
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }
}

/// Text produced by the service
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Raw response text (never empty)
    pub text: String,

    /// Terminal reason reported by the service (`STOP`, `MAX_TOKENS`, ...)
    pub finish_reason: Option<String>,
}

impl Generation {
    /// Whether the service stopped because it hit the output ceiling
    pub fn hit_output_limit(&self) -> bool {
        self.finish_reason.as_deref() == Some("MAX_TOKENS")
    }
}
