use std::sync::Arc;
use std::time::Duration;

use routewise_core::{
    DispatchOptions, Model, ProviderResponse, RouteResult, RouterConfig, Task, TaskCategory,
    estimate_tokens,
};

use crate::analyzer::TaskClassifier;
use crate::cache::{CleanupHandle, ResponseCache};
use crate::dispatch::{ProviderDispatcher, ProviderRegistry};
use crate::router::{ModelCatalog, ModelSelector};
use crate::usage::{TracingUsageLogger, UsageLogger, UsageRecord};
use crate::{Result, RoutingError};

/// Deadline for a single backend call unless configured otherwise.
pub const DEFAULT_DISPATCH_TIMEOUT: Duration = Duration::from_secs(5);
/// Lower bound of the simulated response time.
const MIN_ESTIMATED_TIME_MS: f64 = 50.0;

/// A routed result plus how it was produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteOutcome {
    pub result: RouteResult,
    /// Served from the response cache without selection or dispatch
    pub cache_hit: bool,
    /// A backend produced `result.response_text`
    pub is_real_response: bool,
}

/// Text reported for routes answered without a backend.
pub fn placeholder_response(model_id: &str, cost_usd: f64, estimated_time_ms: f64) -> String {
    format!(
        "Response generated using {model_id}.\nEstimated cost: ${cost_usd:.3}\nEstimated time: {estimated_time_ms:.0}ms"
    )
}

/// Whether `result` carries the simulated placeholder instead of backend output.
pub fn is_placeholder(result: &RouteResult) -> bool {
    result.response_text.as_deref().is_none_or(|text| {
        text == placeholder_response(
            &result.selected_model,
            result.cost_usd,
            result.estimated_time_ms,
        )
    })
}

/// Public entry point: classify, consult the cache, select, dispatch or
/// simulate, then populate the cache.
///
/// All methods take `&self`; share one instance across request handlers.
pub struct RouteOrchestrator {
    classifier: TaskClassifier,
    catalog: Arc<ModelCatalog>,
    registry: Arc<ProviderRegistry>,
    selector: ModelSelector,
    dispatcher: ProviderDispatcher,
    cache: Arc<ResponseCache>,
    usage_logger: Arc<dyn UsageLogger>,
    dispatch_options: DispatchOptions,
    cleanup: Option<CleanupHandle>,
}

impl RouteOrchestrator {
    /// Creates an orchestrator over explicit components.
    pub fn new(
        catalog: Arc<ModelCatalog>,
        registry: Arc<ProviderRegistry>,
        cache: Arc<ResponseCache>,
    ) -> Self {
        let selector = ModelSelector::new(Arc::clone(&catalog));
        let dispatcher = ProviderDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&catalog),
            DEFAULT_DISPATCH_TIMEOUT,
        );

        Self {
            classifier: TaskClassifier,
            catalog,
            registry,
            selector,
            dispatcher,
            cache,
            usage_logger: Arc::new(TracingUsageLogger),
            dispatch_options: DispatchOptions::default(),
            cleanup: None,
        }
    }

    /// Builds every component from configuration and starts the cache sweep.
    ///
    /// # Errors
    /// Returns an error if a backend rejects its configuration, or if the
    /// sweep is enabled and no tokio runtime is running.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        config.validate()?;

        let registry = Arc::new(ProviderRegistry::from_config(config)?);
        let catalog = Arc::new(ModelCatalog::new(
            config.models.clone(),
            registry.discovered_models(),
        ));
        let cache = Arc::new(ResponseCache::from_config(&config.cache));

        let mut orchestrator = Self::new(catalog, registry, Arc::clone(&cache))
            .with_dispatch_timeout(Duration::from_secs(config.providers.timeout_seconds))
            .with_dispatch_options(config.dispatch);

        if config.cache.enabled {
            let period = Duration::from_secs(config.cache.cleanup_interval_seconds);
            orchestrator.cleanup = Some(cache.spawn_cleanup(period)?);
        }

        Ok(orchestrator)
    }

    /// Sets the per-call backend deadline.
    #[must_use]
    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatcher =
            ProviderDispatcher::new(Arc::clone(&self.registry), Arc::clone(&self.catalog), timeout);
        self
    }

    /// Sets the options forwarded with every dispatch.
    #[must_use]
    pub fn with_dispatch_options(mut self, options: DispatchOptions) -> Self {
        self.dispatch_options = options;
        self
    }

    /// Sets a custom usage logger.
    #[must_use]
    pub fn with_usage_logger(mut self, logger: Arc<dyn UsageLogger>) -> Self {
        self.usage_logger = logger;
        self
    }

    /// Ties a running cache sweep to this orchestrator's lifetime.
    #[must_use]
    pub fn with_cleanup(mut self, handle: CleanupHandle) -> Self {
        self.cleanup = Some(handle);
        self
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn catalog(&self) -> &Arc<ModelCatalog> {
        &self.catalog
    }

    pub fn dispatcher(&self) -> &ProviderDispatcher {
        &self.dispatcher
    }

    /// Category the classifier assigns to `input`.
    pub fn classify(&self, input: &str) -> TaskCategory {
        self.classifier.classify(input)
    }

    /// Routes a task and returns the bare result.
    ///
    /// # Errors
    /// `Validation` for empty input, `NoModelAvailable` when filtering leaves no model.
    pub async fn route(&self, task: &Task) -> Result<RouteResult> {
        self.route_detailed(task).await.map(|outcome| outcome.result)
    }

    /// Routes a task, reporting whether the cache or a backend answered.
    ///
    /// Dispatch failures never fail the route; the result is simulated instead.
    ///
    /// # Errors
    /// `Validation` for empty input, `NoModelAvailable` when filtering leaves no model.
    pub async fn route_detailed(&self, task: &Task) -> Result<RouteOutcome> {
        if task.input_text.trim().is_empty() {
            return Err(RoutingError::Validation("Input is required".to_owned()));
        }

        let category = self.classifier.classify(&task.input_text);

        if let Some(result) = self.cache.get(&task.input_text, category, task.priority) {
            tracing::info!(
                task_id = %task.id,
                model = %result.selected_model,
                %category,
                "route served from cache"
            );
            let tokens = estimate_tokens(&task.input_text);
            self.log_usage(task, &result, tokens).await;
            let is_real_response = !is_placeholder(&result);
            return Ok(RouteOutcome {
                result,
                cache_hit: true,
                is_real_response,
            });
        }

        let model = self.selector.select(task, category)?;

        let dispatched = if self.dispatcher.can_serve(&model) {
            match self
                .dispatcher
                .dispatch_model(&model, &task.input_text, &self.dispatch_options)
                .await
            {
                Ok(response) if !response.content.is_empty() => Some(response),
                Ok(_) => {
                    tracing::warn!(model = %model.id, "backend returned empty content, simulating");
                    None
                }
                Err(error) => {
                    tracing::warn!(model = %model.id, "dispatch failed, simulating: {error}");
                    None
                }
            }
        } else {
            tracing::debug!(
                model = %model.id,
                provider = %model.provider_name,
                "no live provider, simulating"
            );
            None
        };

        let is_real_response = dispatched.is_some();
        let (result, tokens) = match dispatched {
            Some(response) => {
                let tokens = response.tokens_used;
                (Self::from_response(category, response), tokens)
            }
            None => (
                Self::synthesize(&model, category, &task.input_text),
                estimate_tokens(&task.input_text),
            ),
        };

        tracing::info!(
            task_id = %task.id,
            model = %result.selected_model,
            %category,
            priority = %task.priority,
            cost = result.cost_usd,
            real = is_real_response,
            "task routed"
        );

        self.cache
            .put(&task.input_text, category, task.priority, result.clone());
        self.log_usage(task, &result, tokens).await;

        Ok(RouteOutcome {
            result,
            cache_hit: false,
            is_real_response,
        })
    }

    fn from_response(category: TaskCategory, response: ProviderResponse) -> RouteResult {
        RouteResult {
            selected_model: response.model_id,
            cost_usd: response.cost_usd,
            estimated_time_ms: response.latency_ms as f64,
            task_category: category,
            response_text: Some(response.content),
        }
    }

    /// Deterministic result used when no backend answers.
    fn synthesize(model: &Model, category: TaskCategory, input: &str) -> RouteResult {
        let cost_usd = estimate_tokens(input) as f64 * model.cost_per_token;
        let estimated_time_ms =
            (1000.0 / f64::from(model.speed_rating.max(1))).max(MIN_ESTIMATED_TIME_MS);
        RouteResult {
            selected_model: model.id.clone(),
            cost_usd,
            estimated_time_ms,
            task_category: category,
            response_text: Some(placeholder_response(&model.id, cost_usd, estimated_time_ms)),
        }
    }

    async fn log_usage(&self, task: &Task, result: &RouteResult, tokens_used: u64) {
        let record = UsageRecord {
            model_used: result.selected_model.clone(),
            cost: result.cost_usd,
            latency_ms: result.estimated_time_ms.round() as u64,
            tokens_used,
            prompt_preview: UsageRecord::preview(&task.input_text),
        };
        if let Err(error) = self.usage_logger.log_usage(&record).await {
            tracing::warn!(task_id = %task.id, "failed to log usage: {error}");
        }
    }

    /// Stops the cache sweep, if one is attached.
    pub async fn shutdown(mut self) {
        if let Some(handle) = self.cleanup.take() {
            handle.shutdown().await;
        }
    }
}
