//! Licita LLM Provider Layer
//!
//! The extraction client: one request to an external text-generation service
//! carrying a task description, a target schema and either normalized text or
//! the original document, answered by raw text or a stop reason.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic scripted provider for testing
//! - `GeminiProvider`: Google Generative Language REST API
//!
//! Providers never retry. A failed call is surfaced to the user, who decides
//! whether to submit again.
//!
//! # Examples
//!
//! ```
//! use licita_llm::{ExtractionProvider, GenerationRequest, MockProvider};
//!
//! # tokio_test::block_on(async {
//! let provider = MockProvider::new(r#"{"items":[]}"#);
//! let generation = provider.generate(&GenerationRequest::text("extract")).await.unwrap();
//! assert_eq!(generation.text, r#"{"items":[]}"#);
//! # });
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod request;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use request::{
    Generation, GenerationRequest, GenerationSettings, HarmCategory, InlineDocument,
    SafetyThreshold,
};

/// Errors that can occur during a generation call
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response body could not be decoded
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The service answered without any text
    #[error("The service returned no text{}", describe_reason(.finish_reason))]
    EmptyResponse {
        /// Stop or block reason reported by the service, if any
        finish_reason: Option<String>,
    },

    /// Provider could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" (stop reason: {})", reason),
        None => String::new(),
    }
}

/// A text-generation service able to answer an extraction request
#[async_trait]
pub trait ExtractionProvider: Send + Sync {
    /// Issue exactly one request; no retries
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError>;

    /// Model identifier, for metadata and logs
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<P: ExtractionProvider + ?Sized> ExtractionProvider for Arc<P> {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        (**self).generate(request).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Mock provider for deterministic testing
///
/// Scripted outcomes are consumed in order; once the script is empty every
/// call returns the default text. Every request is recorded.
///
/// # Examples
///
/// ```
/// use licita_llm::{ExtractionProvider, GenerationRequest, LlmError, MockProvider};
///
/// # tokio_test::block_on(async {
/// let provider = MockProvider::new("default");
/// provider.push_empty(Some("SAFETY"));
///
/// let request = GenerationRequest::text("prompt");
/// assert!(matches!(
///     provider.generate(&request).await,
///     Err(LlmError::EmptyResponse { .. })
/// ));
/// assert_eq!(provider.generate(&request).await.unwrap().text, "default");
/// assert_eq!(provider.call_count(), 2);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    default_text: String,
    script: Arc<Mutex<VecDeque<Result<Generation, LlmError>>>>,
    requests: Arc<Mutex<Vec<GenerationRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a MockProvider answering every prompt with `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            default_text: text.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Wait this long before answering (for in-flight tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a text response
    pub fn push_response(&self, text: impl Into<String>) {
        self.push(Ok(Generation {
            text: text.into(),
            finish_reason: Some("STOP".to_string()),
        }));
    }

    /// Queue a text response that stopped for `finish_reason`
    pub fn push_response_with_reason(&self, text: impl Into<String>, finish_reason: &str) {
        self.push(Ok(Generation {
            text: text.into(),
            finish_reason: Some(finish_reason.to_string()),
        }));
    }

    /// Queue an empty answer
    pub fn push_empty(&self, finish_reason: Option<&str>) {
        self.push(Err(LlmError::EmptyResponse {
            finish_reason: finish_reason.map(str::to_string),
        }));
    }

    /// Queue an error
    pub fn push_error(&self, error: LlmError) {
        self.push(Err(error));
    }

    /// Number of generate calls so far
    pub fn call_count(&self) -> usize {
        self.lock_requests().len()
    }

    /// Every request received so far
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.lock_requests().clone()
    }

    fn push(&self, outcome: Result<Generation, LlmError>) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, Vec<GenerationRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new(r#"{"items":[]}"#)
    }
}

#[async_trait]
impl ExtractionProvider for MockProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, LlmError> {
        self.lock_requests().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match scripted {
            Some(outcome) => outcome,
            None => Ok(Generation {
                text: self.default_text.clone(),
                finish_reason: Some("STOP".to_string()),
            }),
        }
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
