//! Shared fixtures for routewise-routing integration tests
#![cfg_attr(
    test,
    allow(
        dead_code,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::missing_panics_doc,
        reason = "Test allows"
    )
)]

use routewise_core::{Model, TaskCategory};
use routewise_providers::MockProvider;
use routewise_routing::{ModelCatalog, ProviderRegistry, ResponseCache, RouteOrchestrator};
use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests (idempotent).
/// Honors `RUST_LOG` if set, otherwise defaults to "debug".
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = env::var("RUST_LOG").unwrap_or_else(|_| "debug".to_owned());
        if fmt()
            .with_env_filter(EnvFilter::new(filter))
            .with_test_writer()
            .try_init()
            .is_err()
        {
            // tracing already initialized in this process
        }
    });
}

/// Two summary-capable models where cost decides the balanced/summary ranking.
pub fn summary_models(provider: &str) -> Vec<Model> {
    vec![
        Model::new("gpt-4", "GPT-4", provider)
            .with_ratings(9, 8)
            .with_cost_per_token(0.000_6),
        Model::new("mistral-7b", "Mistral 7B", provider)
            .with_ratings(7, 9)
            .with_cost_per_token(0.000_02),
    ]
}

/// A mock backend serving `models`, registered under `name`.
pub fn mock_backend(name: &str, models: Vec<Model>) -> MockProvider {
    MockProvider::new(name).with_models(models)
}

/// Orchestrator whose catalog is exactly the mock's models.
pub fn orchestrator_with(mock: &MockProvider) -> RouteOrchestrator {
    use routewise_core::ModelProvider as _;

    let registry =
        Arc::new(ProviderRegistry::default().with_provider(mock.name().to_owned(), Arc::new(mock.clone())));
    let catalog = Arc::new(ModelCatalog::from_models(registry.discovered_models()));
    let cache = Arc::new(ResponseCache::new(100, Duration::from_secs(3600)));
    RouteOrchestrator::new(catalog, registry, cache)
}

/// Orchestrator over a static catalog with no live providers.
pub fn offline_orchestrator(models: Vec<Model>) -> RouteOrchestrator {
    let registry = Arc::new(ProviderRegistry::default());
    let catalog = Arc::new(ModelCatalog::from_models(models));
    let cache = Arc::new(ResponseCache::new(100, Duration::from_secs(3600)));
    RouteOrchestrator::new(catalog, registry, cache)
}

/// A model that only handles the given categories.
pub fn specialist(id: &str, provider: &str, categories: &[TaskCategory]) -> Model {
    Model::new(id, id, provider).with_supported(categories.iter().copied())
}
