//! Mock provider for exercising the router without real API calls.
//!
//! Serves a fixed model list and answers according to a swappable
//! [`MockBehavior`], recording every prompt it receives.

use async_trait::async_trait;
use routewise_core::{
    DispatchOptions, Error, IgnoreLock as _, Model, ModelProvider, ProviderResponse, Result,
    estimate_tokens,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::cost_for_tokens;

/// How the mock answers a dispatch.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with the given text.
    Respond(String),
    /// Fail with a provider error carrying the message.
    Fail(String),
    /// Sleep before replying, to trip caller timeouts.
    Delay(Duration, String),
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self::Respond("Mock response".to_owned())
    }
}

/// A prompt recorded by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub model_id: String,
    pub prompt: String,
}

/// Scriptable provider; clones share behavior and history.
#[derive(Clone)]
pub struct MockProvider {
    /// Registry key
    name: String,
    /// Models reported to the catalog
    models: Vec<Model>,
    /// Current answer strategy
    behavior: Arc<Mutex<MockBehavior>>,
    /// Call history for verification
    call_history: Arc<Mutex<Vec<MockCall>>>,
}

impl MockProvider {
    /// Create a mock provider with no models that answers with a canned reply.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            models: Vec::new(),
            behavior: Arc::new(Mutex::new(MockBehavior::default())),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the reported model list; each model is re-tagged with this provider's name.
    #[must_use]
    pub fn with_models(mut self, models: impl IntoIterator<Item = Model>) -> Self {
        let name = self.name.clone();
        self.models = models
            .into_iter()
            .map(|mut model| {
                model.provider_name.clone_from(&name);
                model
            })
            .collect();
        self
    }

    /// Set the initial behavior.
    #[must_use]
    pub fn with_behavior(self, behavior: MockBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    /// Change the behavior of this mock and all its clones.
    pub fn set_behavior(&self, behavior: MockBehavior) {
        *self.behavior.lock_ignore_poison() = behavior;
    }

    /// Get the call history.
    #[must_use]
    pub fn get_call_history(&self) -> Vec<MockCall> {
        self.call_history.lock_ignore_poison().clone()
    }

    /// Get the number of calls made.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_history.lock_ignore_poison().len()
    }

    /// Clear the call history.
    pub fn clear_history(&self) {
        self.call_history.lock_ignore_poison().clear();
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
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
        _options: &DispatchOptions,
    ) -> Result<ProviderResponse> {
        self.call_history.lock_ignore_poison().push(MockCall {
            model_id: model.id.clone(),
            prompt: prompt.to_owned(),
        });

        let behavior = self.behavior.lock_ignore_poison().clone();
        let content = match behavior {
            MockBehavior::Respond(text) => text,
            MockBehavior::Fail(message) => return Err(Error::Provider(message)),
            MockBehavior::Delay(delay, text) => {
                sleep(delay).await;
                text
            }
        };

        let tokens_used = estimate_tokens(prompt) + estimate_tokens(&content);
        Ok(ProviderResponse {
            content,
            tokens_used,
            cost_usd: cost_for_tokens(tokens_used, model.cost_per_k_tokens()),
            latency_ms: 0,
            model_id: model.id.clone(),
        })
    }
}
