use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::AiConfig;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("AI is disabled or has no API key")]
    NotConfigured,

    #[error("Invalid Gemini endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("Gemini returned no candidates")]
    EmptyResponse,
}

/// Shape the model is asked to answer in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

impl ResponseFormat {
    const fn mime_type(self) -> Option<&'static str> {
        match self {
            Self::Text => None,
            Self::Json => Some("application/json"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Client for the Gemini `generateContent` REST endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: AiConfig,
}

impl GeminiClient {
    /// Uses a shared client so the connection pool and timeout are reused.
    #[must_use]
    pub const fn with_shared_client(client: Client, config: AiConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_usable()
    }

    fn endpoint(&self) -> Result<Url, GeminiError> {
        let base = self.config.base_url.trim_end_matches('/');
        let url = Url::parse(&format!(
            "{base}/v1beta/models/{}:generateContent",
            self.config.model
        ))?;
        Ok(url)
    }

    /// Sends a single-turn prompt and returns the concatenated text of the
    /// first candidate.
    pub async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, GeminiError> {
        if !self.is_configured() {
            return Err(GeminiError::NotConfigured);
        }

        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                response_mime_type: format.mime_type(),
            },
        };

        debug!(model = %self.config.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .client
            .post(self.endpoint()?)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeminiError::Status {
                status,
                body: truncate(&body, 512),
            });
        }

        let reply: GenerateResponse = response.json().await?;
        extract_text(reply)
    }
}

fn extract_text(reply: GenerateResponse) -> Result<String, GeminiError> {
    let text: String = reply
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        Err(GeminiError::EmptyResponse)
    } else {
        Ok(text)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GeminiClient {
        GeminiClient::with_shared_client(
            Client::new(),
            AiConfig {
                api_key: "test-key".to_string(),
                base_url: base_url.to_string(),
                ..AiConfig::default()
            },
        )
    }

    #[test]
    fn test_endpoint() {
        let url = client("https://example.test/").endpoint().unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.5,
                response_mime_type: ResponseFormat::Json.mime_type(),
            },
        };

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"{\"a\":"},{"text":"1}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(reply).unwrap(), r#"{"a":1}"#);

        let empty: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(
            extract_text(empty),
            Err(GeminiError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_client_does_not_call_out() {
        let mut unconfigured = client("http://127.0.0.1:1");
        unconfigured.config.api_key.clear();

        let err = unconfigured
            .generate("hi", ResponseFormat::Text)
            .await
            .unwrap_err();
        assert!(matches!(err, GeminiError::NotConfigured));
    }
}
