//! Gemini text-generation client.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AgentError, AgentResult};

const BASE_URL: &str = "https://generativelanguage.googleapis.com";
const ENV_KEY: &str = "GEMINI_API_KEY";

/// Tried in order; the first model that answers wins.
const MODELS: [&str; 3] = [
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
];

/// Client for the Gemini generateContent API, constrained to JSON
/// output.
pub struct LlmClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

impl LlmClient {
    pub fn new(api_key: impl Into<String>) -> AgentResult<Self> {
        Ok(Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: BASE_URL.to_string(),
        })
    }

    /// Create a client from the `GEMINI_API_KEY` environment variable.
    pub fn from_env() -> AgentResult<Self> {
        let api_key =
            std::env::var(ENV_KEY).map_err(|_| AgentError::MissingCredential(ENV_KEY))?;
        if api_key.is_empty() {
            return Err(AgentError::MissingCredential(ENV_KEY));
        }
        Self::new(api_key)
    }

    /// Override the API base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Run `prompt` through the model list and return the raw JSON text
    /// of the first successful response.
    pub async fn generate_json(&self, prompt: &str) -> AgentResult<String> {
        let mut last_error = None;
        for model in MODELS {
            match self.call_model(model, prompt).await {
                Ok(text) => {
                    info!(model, "LLM response received");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model, error = %e, "LLM model failed, trying next");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) => Err(AgentError::AllModelsFailed(e.to_string())),
            None => Err(AgentError::EmptyResponse),
        }
    }

    async fn call_model(&self, model: &str, prompt: &str) -> AgentResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };

        let response = self.http.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AgentError::LlmStatus { status, message });
        }

        let body: GenerateResponse = response.json().await?;
        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.trim())
            .filter(|t| !t.is_empty())
            .ok_or(AgentError::EmptyResponse)?;

        Ok(strip_code_fence(text).to_string())
    }
}

/// Models sometimes wrap JSON in a markdown code fence despite the
/// response MIME type.
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
    }

    #[test]
    fn unfenced_text_is_untouched() {
        assert_eq!(strip_code_fence(" {\"a\": 1} "), "{\"a\": 1}");
    }
}
