use async_trait::async_trait;

use crate::{DispatchOptions, Model, ProviderResponse, Result};

/// A concrete backend that can answer prompts for the models it serves.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Registry key for this provider (e.g. `openai`), matched against `Model::provider_name`.
    fn name(&self) -> &str;

    /// Models this provider contributes to the catalog.
    fn models(&self) -> Vec<Model>;

    /// Sends a single prompt to the backend for `model`.
    ///
    /// Implementations report `cost_usd = tokens_used / 1000 * model.cost_per_k_tokens()`
    /// and the measured round-trip latency.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, a non-success status, or an
    /// unparseable body. No retry is attempted.
    async fn dispatch(
        &self,
        model: &Model,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<ProviderResponse>;
}
