use super::ProviderRegistry;
use crate::router::ModelCatalog;
use crate::{Result, RoutingError};
use routewise_core::{DispatchOptions, Error as CoreError, Model, ProviderResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Sends prompts to the backend that serves a model, with a per-call deadline.
///
/// Single attempt per call. A missed deadline surfaces as
/// [`CoreError::Timeout`]; every other failure as [`RoutingError::Provider`].
pub struct ProviderDispatcher {
    registry: Arc<ProviderRegistry>,
    catalog: Arc<ModelCatalog>,
    timeout: Duration,
}

impl ProviderDispatcher {
    pub fn new(registry: Arc<ProviderRegistry>, catalog: Arc<ModelCatalog>, timeout: Duration) -> Self {
        Self {
            registry,
            catalog,
            timeout,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Whether a live backend is registered for the model's provider.
    pub fn can_serve(&self, model: &Model) -> bool {
        self.registry.has_provider(&model.provider_name)
    }

    /// Resolves `model_id` through the catalog and dispatches to its provider.
    ///
    /// # Errors
    /// `UnknownModel` if the catalog has no such model, otherwise as [`Self::dispatch_model`].
    pub async fn dispatch(
        &self,
        model_id: &str,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<ProviderResponse> {
        let model = self
            .catalog
            .model_by_id(model_id)
            .ok_or_else(|| RoutingError::UnknownModel(model_id.to_owned()))?;
        self.dispatch_model(&model, prompt, options).await
    }

    /// Dispatches to the provider backing an already resolved model.
    ///
    /// # Errors
    /// `Provider` when no backend is registered or the backend fails,
    /// `Core(Timeout)` when the deadline passes.
    pub async fn dispatch_model(
        &self,
        model: &Model,
        prompt: &str,
        options: &DispatchOptions,
    ) -> Result<ProviderResponse> {
        let provider = self.registry.get(&model.provider_name).ok_or_else(|| {
            RoutingError::Provider(format!(
                "no provider registered for {}",
                model.provider_name
            ))
        })?;

        match timeout(self.timeout, provider.dispatch(model, prompt, options)).await {
            Ok(Ok(response)) => {
                tracing::debug!(
                    model = %model.id,
                    latency_ms = response.latency_ms,
                    tokens = response.tokens_used,
                    "dispatch succeeded"
                );
                Ok(response)
            }
            Ok(Err(error)) => Err(RoutingError::Provider(format!(
                "{} failed: {error}",
                model.provider_name
            ))),
            Err(_elapsed) => Err(RoutingError::Core(CoreError::Timeout {
                provider: model.provider_name.clone(),
                after_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            })),
        }
    }
}
