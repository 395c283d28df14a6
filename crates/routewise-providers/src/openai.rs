use async_trait::async_trait;
use reqwest::Client;
use routewise_core::{
    DispatchOptions, Error, Model, ModelProvider, ProviderResponse, Result, TaskCategory,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cost_for_tokens;

/// Provider name for `OpenAI`.
pub const OPENAI: &str = "openai";
/// Provider name for Groq.
pub const GROQ: &str = "groq";

/// Backend speaking the `OpenAI` chat-completions wire format.
///
/// Groq exposes the same API, so one implementation serves both; the
/// provider name and model list distinguish them in the registry.
pub struct OpenAiCompatibleProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Bearer token.
    api_key: String,
    /// Full chat-completions URL.
    endpoint: String,
    /// Registry key.
    name: String,
    /// Models contributed to the catalog.
    models: Vec<Model>,
}

impl OpenAiCompatibleProvider {
    /// Creates a provider with an explicit name and model list.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new(
        name: impl Into<String>,
        api_key: String,
        endpoint: impl Into<String>,
        models: Vec<Model>,
    ) -> Result<Self> {
        let name = name.into();
        if api_key.is_empty() {
            return Err(Error::MissingApiKey(format!(
                "{}_API_KEY",
                name.to_uppercase()
            )));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            endpoint: endpoint.into(),
            name,
            models,
        })
    }

    /// `OpenAI` backend with its published models.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn openai(api_key: String, endpoint: impl Into<String>) -> Result<Self> {
        Self::new(OPENAI, api_key, endpoint, openai_models())
    }

    /// Groq backend with its published models.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn groq(api_key: String, endpoint: impl Into<String>) -> Result<Self> {
        Self::new(GROQ, api_key, endpoint, groq_models())
    }
}

/// Models served by `OpenAI`, priced per 1K tokens.
fn openai_models() -> Vec<Model> {
    vec![
        Model::new("gpt-4o", "GPT-4o", OPENAI)
            .with_cost_per_k_tokens(0.005)
            .with_max_tokens(128_000)
            .with_ratings(10, 8),
        Model::new("gpt-4o-mini", "GPT-4o Mini", OPENAI)
            .with_cost_per_k_tokens(0.000_15)
            .with_max_tokens(128_000)
            .with_ratings(8, 9)
            .with_supported([
                TaskCategory::Summary,
                TaskCategory::Translation,
                TaskCategory::Analysis,
                TaskCategory::General,
            ]),
        Model::new("gpt-3.5-turbo", "GPT-3.5 Turbo", OPENAI)
            .with_cost_per_k_tokens(0.0005)
            .with_max_tokens(16_385)
            .with_ratings(7, 10)
            .with_supported([
                TaskCategory::Summary,
                TaskCategory::Translation,
                TaskCategory::General,
            ]),
    ]
}

/// Models served by Groq, priced per 1K tokens.
fn groq_models() -> Vec<Model> {
    vec![
        Model::new("llama-3.1-8b-instant", "Llama 3.1 8B Instant", GROQ)
            .with_cost_per_k_tokens(0.000_05)
            .with_max_tokens(131_072)
            .with_ratings(6, 10)
            .with_supported([
                TaskCategory::Summary,
                TaskCategory::Translation,
                TaskCategory::General,
            ]),
        Model::new("mixtral-8x7b-32768", "Mixtral 8x7B", GROQ)
            .with_cost_per_k_tokens(0.000_24)
            .with_max_tokens(32_768)
            .with_ratings(7, 9),
    ]
}

/// Request payload sent to a chat-completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'prompt> {
    /// Model identifier.
    model: &'prompt str,
    /// Conversation, here always a single user message.
    messages: Vec<ChatMessage<'prompt>>,
    /// Maximum number of tokens allowed in the completion.
    max_tokens: u32,
    /// Sampling temperature.
    temperature: f32,
}

/// Message delivered to the API.
#[derive(Debug, Serialize)]
struct ChatMessage<'prompt> {
    /// Author role.
    role: &'static str,
    /// Text content.
    content: &'prompt str,
}

/// Response payload returned by the API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    /// Candidate completions.
    choices: Vec<ChatChoice>,
    /// Token accounting, absent on some compatible servers.
    usage: Option<ChatUsage>,
}

/// A single completion choice.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    /// Generated message.
    message: ChatResponseMessage,
}

/// Generated message body.
#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    /// Text content; `null` for tool-only replies.
    content: Option<String>,
}

/// Token usage metrics.
#[derive(Debug, Deserialize)]
struct ChatUsage {
    /// Prompt plus completion tokens.
    total_tokens: u64,
}

#[async_trait]
impl ModelProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn models(&self) -> Vec<Model> {
        self.models.clone()
    }

    async fn dispatch(
        &self,
        model: &Model,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<ProviderResponse> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &model.id,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("{} request failed: {err}", self.name)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "{} API error {status}: {error_text}",
                self.name
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|err| {
            Error::InvalidResponse(format!("Failed to parse {} response: {err}", self.name))
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        let tokens_used = parsed.usage.map_or(0, |usage| usage.total_tokens);

        tracing::debug!(
            provider = %self.name,
            model = %model.id,
            tokens_used,
            latency_ms,
            "chat completion finished"
        );

        Ok(ProviderResponse {
            content,
            tokens_used,
            cost_usd: cost_for_tokens(tokens_used, model.cost_per_k_tokens()),
            latency_ms,
            model_id: model.id.clone(),
        })
    }
}
