//! Text-generation providers
//!
//! The orchestrator only sees the `InsightProvider` trait. `GeminiProvider`
//! talks to the Google Generative Language REST API; `UnconfiguredProvider`
//! stands in when no API key is available.

use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text-in, text-out generation capability.
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Generate a completion for `prompt`. Any failure, including a timeout,
    /// is reported as `Error::ProviderUnavailable`.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Google Gemini `generateContent` client
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig, api_key: String) -> Result<Self> {
        Self::with_timeout(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_timeout(
        base_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if any
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl InsightProvider for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        // without_url() keeps the API key out of error messages
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() { "request timed out" } else { "request failed" };
                Error::ProviderUnavailable(format!("Gemini {}: {}", reason, e.without_url()))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProviderUnavailable(format!(
                "Gemini returned HTTP {}",
                status.as_u16()
            )));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            Error::ProviderUnavailable(format!(
                "Failed to parse Gemini response: {}",
                e.without_url()
            ))
        })?;

        parsed
            .into_text()
            .ok_or_else(|| Error::ProviderUnavailable("Gemini response contained no text".into()))
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Provider used when no API key is configured; always unavailable
pub struct UnconfiguredProvider;

#[async_trait]
impl InsightProvider for UnconfiguredProvider {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(Error::ProviderUnavailable(
            "No AI provider is configured".into(),
        ))
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
