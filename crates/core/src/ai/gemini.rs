use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use super::traits::{LanguageModel, Prompt};
use crate::errors::CoreError;
use crate::models::settings::ModelSettings;

/// Google Gemini over the Generative Language REST API.
///
/// - **Endpoint**: `POST {base}/models/{model}:generateContent`
/// - **Auth**: API key in the `x-goog-api-key` header.
/// - **Output**: requested as `application/json`; the text parts of the first
///   candidate are concatenated and returned as-is.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiModel {
    pub fn new(settings: &ModelSettings) -> Result<Self, CoreError> {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.timeout_secs));
        let client = builder
            .build()
            .map_err(|e| CoreError::Config(format!("Failed to build Gemini HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn error(&self, message: impl Into<String>) -> CoreError {
        CoreError::Model {
            provider: self.name().to_string(),
            message: message.into(),
        }
    }
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
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
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn build_request(prompt: &Prompt) -> GenerateRequest<'_> {
    let mut parts = vec![Part::Text { text: &prompt.text }];
    if let Some(photo) = &prompt.media {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: photo.mime_type(),
                data: photo.data(),
            },
        });
    }
    GenerateRequest {
        contents: vec![Content { role: "user", parts }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
        },
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LanguageModel for GeminiModel {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate_json(&self, prompt: &Prompt) -> Result<String, CoreError> {
        tracing::debug!(model = %self.model, prompt = prompt.name, with_media = prompt.media.is_some(), "calling model");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(prompt))
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorEnvelope>(&bytes)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("request failed with status {status}"));
            return Err(self.error(message));
        }

        let parsed: GenerateResponse = serde_json::from_slice(&bytes)
            .map_err(|e| self.error(format!("Failed to parse response for {}: {e}", prompt.name)))?;

        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| self.error(format!("No candidates returned for {}", prompt.name)))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
            return Err(self.error(format!(
                "Empty reply for {} (finish reason: {reason})",
                prompt.name
            )));
        }

        Ok(text)
    }
}
