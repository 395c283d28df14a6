//! Provider registry for managing backend instances.
//!
//! Backends are created once at startup and shared by every request. The
//! registry remembers registration order, which becomes catalog order for
//! discovered models and therefore the tie-break order during selection.

use routewise_core::{Model, ModelProvider, RouterConfig};
use routewise_providers::{AnthropicProvider, OpenAiCompatibleProvider};
use std::sync::Arc;

use crate::Result;

/// Named backends in registration order.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<(String, Arc<dyn ModelProvider>)>,
}

impl ProviderRegistry {
    /// Registers a backend for every provider that has an API key.
    ///
    /// Providers without a key are skipped, leaving their catalog entries on
    /// the synthetic path.
    ///
    /// # Errors
    /// Returns an error if a backend rejects its configuration.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let mut registry = Self::default();
        let urls = &config.providers;

        if let Some(api_key) = config.get_api_key("openai") {
            let provider = OpenAiCompatibleProvider::openai(api_key, urls.openai_base_url.clone())?;
            registry.register("openai", Arc::new(provider));
        }

        if let Some(api_key) = config.get_api_key("anthropic") {
            let provider = AnthropicProvider::new(api_key, urls.anthropic_base_url.clone())?;
            registry.register("anthropic", Arc::new(provider));
        }

        if let Some(api_key) = config.get_api_key("groq") {
            let provider = OpenAiCompatibleProvider::groq(api_key, urls.groq_base_url.clone())?;
            registry.register("groq", Arc::new(provider));
        }

        if registry.providers.is_empty() {
            tracing::warn!("No provider API keys configured; all routes will be simulated");
        } else {
            tracing::info!("Registered providers: {}", registry.provider_names().join(", "));
        }

        Ok(registry)
    }

    /// Adds or replaces the backend for `name`, keeping its original position on replace.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn ModelProvider>) {
        let name = name.into();
        if let Some(slot) = self.providers.iter_mut().find(|(existing, _)| *existing == name) {
            slot.1 = provider;
        } else {
            self.providers.push((name, provider));
        }
    }

    /// Builder form of [`Self::register`].
    #[must_use]
    pub fn with_provider(mut self, name: impl Into<String>, provider: Arc<dyn ModelProvider>) -> Self {
        self.register(name, provider);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ModelProvider>> {
        self.providers
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, provider)| Arc::clone(provider))
    }

    pub fn has_provider(&self, name: &str) -> bool {
        self.providers.iter().any(|(existing, _)| existing == name)
    }

    /// Registered names, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Every model reported by the registered backends, in registration order.
    pub fn discovered_models(&self) -> Vec<Model> {
        self.providers
            .iter()
            .flat_map(|(_, provider)| provider.models())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
