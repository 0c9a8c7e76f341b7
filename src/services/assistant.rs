//! AI assistant built on a hosted text model.
//!
//! Each operation renders a prompt, asks the model for a reply in a fixed
//! JSON shape and parses it. Failures never reach the caller: they are logged
//! and replaced with the reply type's [`Default`] value.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::prompts;
use crate::clients::{GeminiClient, GeminiError, ResponseFormat};
use crate::models::assistant::{
    CaptionRequest, Captions, ChatReply, ChatRequest, MAX_CAPTIONS, MAX_SUGGESTIONS,
    ProjectAnalysis, ProjectAnalysisRequest, TimeSuggestionRequest, TimeSuggestions,
};

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Upstream(#[from] GeminiError),

    #[error("Model reply is not the expected JSON: {0}")]
    MalformedReply(String),
}

/// Anything that turns a prompt into text.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, GeminiError>;
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, format: ResponseFormat) -> Result<String, GeminiError> {
        Self::generate(self, prompt, format).await
    }
}

#[derive(Clone)]
pub struct AssistantService {
    generator: Arc<dyn TextGenerator>,
}

impl AssistantService {
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    pub async fn time_suggestions(&self, request: &TimeSuggestionRequest) -> TimeSuggestions {
        let prompt = prompts::time_suggestions(request);
        let mut reply: TimeSuggestions = self.ask_json("time_suggestions", &prompt).await;

        reply
            .suggestions
            .retain(|s| s.duration_minutes <= request.available_minutes && !s.title.trim().is_empty());
        reply.suggestions.truncate(MAX_SUGGESTIONS);
        reply
    }

    pub async fn project_analysis(&self, request: &ProjectAnalysisRequest) -> ProjectAnalysis {
        let prompt = prompts::project_analysis(request);
        self.ask_json("project_analysis", &prompt).await
    }

    pub async fn captions(&self, request: &CaptionRequest) -> Captions {
        let prompt = prompts::captions(request);
        let mut reply: Captions = self.ask_json("captions", &prompt).await;

        reply.captions.retain(|c| !c.trim().is_empty());
        reply.captions.truncate(MAX_CAPTIONS);
        reply
    }

    pub async fn chat(&self, request: &ChatRequest) -> ChatReply {
        let prompt = prompts::chat(request);
        match self.generator.generate(&prompt, ResponseFormat::Text).await {
            Ok(text) => ChatReply {
                reply: text.trim().to_string(),
            },
            Err(e) => {
                warn!(operation = "chat", error = %e, "AI request failed, using fallback");
                ChatReply::default()
            }
        }
    }

    async fn ask_json<T>(&self, operation: &'static str, prompt: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let result = match self.generator.generate(prompt, ResponseFormat::Json).await {
            Ok(text) => parse_model_json(&text),
            Err(e) => Err(AssistantError::from(e)),
        };

        match result {
            Ok(reply) => {
                debug!(operation, "AI reply parsed");
                reply
            }
            Err(e) => {
                warn!(operation, error = %e, "AI request failed, using fallback");
                T::default()
            }
        }
    }
}

/// Parses a model reply that should be a JSON object.
///
/// Accepts the object on its own, wrapped in a Markdown code fence, or
/// surrounded by prose.
pub fn parse_model_json<T: DeserializeOwned>(text: &str) -> Result<T, AssistantError> {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    let fence = FENCE.get_or_init(|| {
        Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)\s*```").expect("Invalid regex")
    });

    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(value);
    }

    if let Some(inner) = fence.captures(trimmed).and_then(|c| c.get(1))
        && let Ok(value) = serde_json::from_str(inner.as_str())
    {
        return Ok(value);
    }

    let object = trimmed
        .find('{')
        .zip(trimmed.rfind('}'))
        .filter(|(start, end)| start < end)
        .map(|(start, end)| &trimmed[start..=end]);

    match object {
        Some(candidate) => serde_json::from_str(candidate)
            .map_err(|e| AssistantError::MalformedReply(e.to_string())),
        None => Err(AssistantError::MalformedReply(
            "no JSON object found".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assistant::{CHAT_APOLOGY, TimeSuggestion};
    use crate::schema;
    use serde_json::json;

    struct Fixed(Result<String, ()>);

    #[async_trait::async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _: &str, _: ResponseFormat) -> Result<String, GeminiError> {
            self.0.clone().map_err(|()| GeminiError::EmptyResponse)
        }
    }

    fn service(reply: Result<&str, ()>) -> AssistantService {
        AssistantService::new(Arc::new(Fixed(reply.map(str::to_string))))
    }

    fn time_request(minutes: u32) -> TimeSuggestionRequest {
        schema::insert(&json!({ "mood": "calm", "availableMinutes": minutes })).unwrap()
    }

    #[test]
    fn test_parse_plain_fenced_and_embedded_json() {
        let plain: Captions = parse_model_json(r#"{"captions":["a"]}"#).unwrap();
        assert_eq!(plain.captions, vec!["a"]);

        let fenced: Captions =
            parse_model_json("```json\n{\"captions\": [\"b\"]}\n```").unwrap();
        assert_eq!(fenced.captions, vec!["b"]);

        let embedded: Captions =
            parse_model_json("Sure! Here you go: {\"captions\": [\"c\"]} Enjoy.").unwrap();
        assert_eq!(embedded.captions, vec!["c"]);

        assert!(parse_model_json::<Captions>("no json here").is_err());
    }

    #[tokio::test]
    async fn test_time_suggestions_are_filtered_and_capped() {
        let reply = json!({
            "suggestions": (0..8)
                .map(|i| json!({ "title": format!("idea {i}"), "durationMinutes": 10 + i * 5 }))
                .collect::<Vec<_>>()
        })
        .to_string();

        let result = service(Ok(&reply)).time_suggestions(&time_request(40)).await;

        assert_eq!(result.suggestions.len(), MAX_SUGGESTIONS);
        assert!(result.suggestions.iter().all(|s| s.duration_minutes <= 40));
        assert_eq!(
            result.suggestions[0],
            TimeSuggestion {
                title: "idea 0".to_string(),
                description: String::new(),
                duration_minutes: 10,
                category: None,
            }
        );
    }

    #[tokio::test]
    async fn test_failures_fall_back() {
        let failing = service(Err(()));
        assert_eq!(
            failing.time_suggestions(&time_request(30)).await,
            TimeSuggestions::default()
        );

        let chat: ChatRequest = schema::insert(&json!({ "message": "hello" })).unwrap();
        assert_eq!(failing.chat(&chat).await.reply, CHAT_APOLOGY);

        let garbage = service(Ok("I would rather not."));
        let request: CaptionRequest = schema::insert(&json!({ "brand": "Acme" })).unwrap();
        assert_eq!(garbage.captions(&request).await, Captions::default());
    }

    #[tokio::test]
    async fn test_chat_returns_trimmed_text() {
        let chat: ChatRequest = schema::insert(&json!({ "message": "hello" })).unwrap();
        let reply = service(Ok("  Hi there!\n")).chat(&chat).await;
        assert_eq!(reply.reply, "Hi there!");
    }
}
