//! HTTP adapter for the generative text collaborator.
//!
//! Speaks a generateContent-style REST surface: POST a prompt, receive
//! candidates whose parts carry text. The adapter returns the raw joined
//! text; fence stripping and structured parsing belong to the caller.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::ports::{ExternalServiceError, TextGenerator};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for on-demand text generation.
pub struct HttpTextGenerator {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpTextGenerator {
    /// Create an adapter against `base_url` for the named model.
    ///
    /// # Errors
    /// Returns `ExternalServiceError::Transport` if the client cannot be
    /// constructed.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, ExternalServiceError> {
        Self::with_timeout(base_url, api_key, model, DEFAULT_TIMEOUT)
    }

    /// Create an adapter with an explicit per-request timeout.
    ///
    /// # Errors
    /// Returns `ExternalServiceError::Transport` if the client cannot be
    /// constructed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ExternalServiceError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| ExternalServiceError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<ContentPayload<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct ContentPayload<'a> {
    parts: Vec<PartPayload<'a>>,
}

#[derive(Debug, Serialize)]
struct PartPayload<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<CandidatePayload>,
}

#[derive(Debug, Deserialize)]
struct CandidatePayload {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl TextGenerator for HttpTextGenerator {
    fn generate(
        &self,
        prompt: &str,
        expect_structured: bool,
    ) -> Result<String, ExternalServiceError> {
        let request = GenerateRequest {
            contents: vec![ContentPayload {
                parts: vec![PartPayload { text: prompt }],
            }],
            generation_config: expect_structured.then_some(GenerationConfig {
                response_mime_type: "application/json",
            }),
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .map_err(|e| ExternalServiceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExternalServiceError::Http(status.as_u16()));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| ExternalServiceError::Decode(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        tracing::debug!("Generator returned {} characters", text.len());
        Ok(text)
    }
}
