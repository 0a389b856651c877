//! Gemini Provider Implementation
//!
//! Talks to the Generative Language REST API (`generateContent`). Paged
//! documents can be attached as base64 `inlineData` so the model sees the
//! original layout instead of reconstructed text.
//!
//! # Examples
//!
//! ```no_run
//! use licita_llm::GeminiProvider;
//!
//! let provider = GeminiProvider::new("api-key", "gemini-2.5-flash")
//!     .expect("HTTP client")
//!     .with_endpoint("http://localhost:8080");
//! ```

use crate::request::{Generation, GenerationRequest, HarmCategory, SafetyThreshold};
use crate::{ExtractionProvider, LlmError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default timeout for one request (5 minutes; long documents are slow)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Gemini API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: WireGenerationConfig<'a>,
    safety_settings: Vec<WireSafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: Blob<'a>,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
}

#[derive(Serialize)]
struct WireSafetySetting {
    category: HarmCategory,
    threshold: SafetyThreshold,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GeminiProvider {
    /// Create a provider for `model` against the public endpoint
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Config` if the API key is blank or the HTTP client
    /// cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::Config("API key is empty".to_string()));
        }

        Ok(Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key,
            client: build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS))?,
        })
    }

    /// Point the provider at another endpoint (proxies, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LlmError> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

fn build_client(timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))
}

fn build_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let mut parts = vec![Part::Text {
        text: &request.prompt,
    }];
    if let Some(document) = &request.attachment {
        parts.push(Part::Inline {
            inline_data: Blob {
                mime_type: &document.mime_type,
                data: BASE64_STANDARD.encode(&document.data),
            },
        });
    }

    let settings = &request.settings;
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: WireGenerationConfig {
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            response_mime_type: settings.response_mime_type.as_deref(),
        },
        safety_settings: HarmCategory::ALL
            .iter()
            .map(|&category| WireSafetySetting {
                category,
                threshold: settings.safety_threshold,
            })
            .collect(),
    }
}

/// Turn a decoded response into text or a stop reason
fn into_generation(response: GenerateContentResponse) -> Result<Generation, LlmError> {
    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(LlmError::EmptyResponse {
            finish_reason: block_reason,
        });
    };

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse {
            finish_reason: candidate.finish_reason.or(block_reason),
        });
    }

    Ok(Generation {
        text,
        finish_reason: candidate.finish_reason,
    })
}

#[async_trait]
impl ExtractionProvider for GeminiProvider {
    /// Generate text with the Gemini API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request cannot be sent or times out
    /// - The model does not exist (404) or the quota is exhausted (429)
    /// - The body cannot be decoded
    /// - The answer carries no text
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        let body = build_body(request);
        debug!(
            model = %self.model,
            prompt_chars = request.prompt.len(),
            attachment = request.attachment.is_some(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!(%status, "generateContent request rejected");
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let decoded = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        into_generation(decoded)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
