use async_trait::async_trait;
use reqwest::Client;
use routewise_core::{
    DispatchOptions, Error, Model, ModelProvider, ProviderResponse, Result, TaskCategory,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::cost_for_tokens;

/// Provider name for Anthropic.
pub const ANTHROPIC: &str = "anthropic";
/// Pinned Messages API version header.
const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API backend.
pub struct AnthropicProvider {
    /// HTTP client for API requests.
    client: Client,
    /// Key sent as `x-api-key`.
    api_key: String,
    /// Full messages URL.
    endpoint: String,
}

impl AnthropicProvider {
    /// Creates a new Anthropic provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the provided API key is empty.
    pub fn new(api_key: String, endpoint: impl Into<String>) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingApiKey("ANTHROPIC_API_KEY".to_owned()));
        }

        Ok(Self {
            client: Client::default(),
            api_key,
            endpoint: endpoint.into(),
        })
    }
}

/// Request payload for `/v1/messages`.
#[derive(Debug, Serialize)]
struct MessagesRequest<'prompt> {
    model: &'prompt str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<MessageParam<'prompt>>,
}

#[derive(Debug, Serialize)]
struct MessageParam<'prompt> {
    role: &'static str,
    content: &'prompt str,
}

/// Response payload from `/v1/messages`.
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: MessagesUsage,
}

/// A content block; only text blocks carry `text`.
#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[async_trait]
impl ModelProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        ANTHROPIC
    }

    fn models(&self) -> Vec<Model> {
        vec![
            Model::new("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet", ANTHROPIC)
                .with_cost_per_k_tokens(0.003)
                .with_max_tokens(200_000)
                .with_ratings(9, 7),
            Model::new("claude-3-haiku-20240307", "Claude 3 Haiku", ANTHROPIC)
                .with_cost_per_k_tokens(0.000_25)
                .with_max_tokens(200_000)
                .with_ratings(7, 9)
                .with_supported([
                    TaskCategory::Summary,
                    TaskCategory::Translation,
                    TaskCategory::Analysis,
                    TaskCategory::General,
                ]),
        ]
    }

    async fn dispatch(
        &self,
        model: &Model,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<ProviderResponse> {
        let start = Instant::now();

        let request = MessagesRequest {
            model: &model.id,
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            messages: vec![MessageParam {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|err| Error::Provider(format!("anthropic request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            return Err(Error::Provider(format!(
                "anthropic API error {status}: {error_text}"
            )));
        }

        let parsed: MessagesResponse = response.json().await.map_err(|err| {
            Error::InvalidResponse(format!("Failed to parse anthropic response: {err}"))
        })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let tokens_used = parsed.usage.input_tokens + parsed.usage.output_tokens;
        let content = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .unwrap_or_default();

        tracing::debug!(
            model = %model.id,
            tokens_used,
            latency_ms,
            "anthropic message finished"
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
