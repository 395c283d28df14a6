//! End-to-end routing scenarios against mock backends
#![cfg(test)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::float_cmp,
    reason = "Test code prioritizes clarity over efficiency"
)]

mod common;

use common::{
    init_tracing, mock_backend, offline_orchestrator, orchestrator_with, specialist,
    summary_models,
};
use routewise_core::{
    DispatchOptions, ModelPreferences, Priority, Task, TaskCategory, TaskRequest,
    config::builtin_models,
};
use routewise_providers::MockBehavior;
use routewise_routing::{InMemoryUsageLogger, ModelSelector, RoutingError, UsageLogger};
use std::sync::Arc;

const SPANISH_SUMMARY: &str = "Resume este texto sobre ahorro de energía";

#[tokio::test]
async fn test_summary_scenario_selects_cheap_model() {
    init_tracing();
    let mock = mock_backend("mock", summary_models("mock"));
    let orchestrator = orchestrator_with(&mock);

    assert_eq!(orchestrator.classify(SPANISH_SUMMARY), TaskCategory::Summary);

    let result = orchestrator.route(&Task::new(SPANISH_SUMMARY)).await.unwrap();
    assert_eq!(result.task_category, TaskCategory::Summary);
    assert_eq!(result.selected_model, "mistral-7b");
}

#[tokio::test]
async fn test_per_thousand_prices_clamp_cost_scores() {
    // Quoted per token, 0.03 and 0.002 both clamp the cost score to zero,
    // leaving quality and speed to decide in favor of gpt-4.
    let models = vec![
        routewise_core::Model::new("gpt-4", "GPT-4", "static")
            .with_ratings(9, 8)
            .with_cost_per_token(0.03),
        routewise_core::Model::new("mistral-7b", "Mistral 7B", "static")
            .with_ratings(7, 9)
            .with_cost_per_token(0.002),
    ];
    let orchestrator = offline_orchestrator(models);
    let result = orchestrator.route(&Task::new(SPANISH_SUMMARY)).await.unwrap();
    assert_eq!(result.selected_model, "gpt-4");
}

#[tokio::test]
async fn test_second_identical_route_hits_cache() {
    init_tracing();
    let mock = mock_backend("mock", summary_models("mock"))
        .with_behavior(MockBehavior::Respond("Resumen listo".to_owned()));
    let orchestrator = orchestrator_with(&mock);
    let task = Task::new(SPANISH_SUMMARY);

    let first = orchestrator.route_detailed(&task).await.unwrap();
    assert!(!first.cache_hit);
    assert!(first.is_real_response);
    assert_eq!(first.result.response_text.as_deref(), Some("Resumen listo"));

    let second = orchestrator.route_detailed(&task).await.unwrap();
    assert!(second.cache_hit);
    assert!(second.is_real_response);
    assert_eq!(second.result, first.result);

    assert_eq!(mock.call_count(), 1);
    assert_eq!(
        orchestrator
            .cache()
            .hit_count(SPANISH_SUMMARY, TaskCategory::Summary, Priority::Balanced),
        Some(1)
    );
}

#[tokio::test]
async fn test_different_priority_misses_cache() {
    let mock = mock_backend("mock", summary_models("mock"));
    let orchestrator = orchestrator_with(&mock);

    orchestrator.route(&Task::new(SPANISH_SUMMARY)).await.unwrap();
    let outcome = orchestrator
        .route_detailed(&Task::new(SPANISH_SUMMARY).with_priority(Priority::Performance))
        .await
        .unwrap();

    assert!(!outcome.cache_hit);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn test_failing_provider_falls_back_to_simulation() {
    init_tracing();
    let mock = mock_backend("mock", summary_models("mock"))
        .with_behavior(MockBehavior::Fail("503 Service Unavailable".to_owned()));
    let orchestrator = orchestrator_with(&mock);

    let request = TaskRequest {
        id: None,
        input: SPANISH_SUMMARY.to_owned(),
        priority: None,
        model_preferences: None,
        context: None,
    };
    let response = orchestrator.handle(request).await.unwrap();

    assert!(response.success);
    assert!(!response.is_real_response);
    assert_eq!(response.selected_model, "mistral-7b");
    // 41 characters -> 11 estimated tokens
    let tokens = SPANISH_SUMMARY.chars().count().div_ceil(4) as f64;
    assert!((response.cost - tokens * 0.000_02).abs() < 1e-12);
    assert!((response.estimated_time - 1000.0 / 9.0).abs() < 1e-9);
    assert!(response.response.starts_with("Response generated using mistral-7b."));
    assert_eq!(mock.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_provider_times_out_into_simulation() {
    let mock = mock_backend("mock", summary_models("mock")).with_behavior(MockBehavior::Delay(
        std::time::Duration::from_secs(60),
        "too late".to_owned(),
    ));
    let orchestrator = orchestrator_with(&mock)
        .with_dispatch_timeout(std::time::Duration::from_millis(500));

    let outcome = orchestrator
        .route_detailed(&Task::new(SPANISH_SUMMARY))
        .await
        .unwrap();
    assert!(!outcome.is_real_response);
    assert_ne!(outcome.result.response_text.as_deref(), Some("too late"));

    let error = orchestrator
        .dispatcher()
        .dispatch("mistral-7b", SPANISH_SUMMARY, &DispatchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RoutingError::Core(routewise_core::Error::Timeout { after_ms: 500, .. })
    ));
}

#[tokio::test]
async fn test_cached_simulation_reports_not_real() {
    let orchestrator = offline_orchestrator(builtin_models());
    let task = Task::new("Translate good morning into Italian");

    let first = orchestrator.route_detailed(&task).await.unwrap();
    let second = orchestrator.route_detailed(&task).await.unwrap();

    assert!(!first.is_real_response);
    assert!(second.cache_hit);
    assert!(!second.is_real_response);
}

#[tokio::test]
async fn test_builtin_catalog_prefers_gpt_4o_for_general() {
    // Normalized per-token prices keep every cost score near 10,
    // so quality and speed decide.
    let orchestrator = offline_orchestrator(builtin_models());
    let outcome = orchestrator.route_detailed(&Task::new("hello there")).await.unwrap();

    assert_eq!(outcome.result.task_category, TaskCategory::General);
    assert_eq!(outcome.result.selected_model, "gpt-4o");
    assert!(!outcome.is_real_response);
}

#[tokio::test]
async fn test_empty_input_is_rejected_before_cache() {
    let orchestrator = offline_orchestrator(builtin_models());

    for input in ["", "   \n\t"] {
        let error = orchestrator.route(&Task::new(input)).await.unwrap_err();
        assert!(matches!(error, RoutingError::Validation(_)));
        assert_eq!(error.status_code(), 400);
    }
    assert!(orchestrator.cache().is_empty());
}

#[tokio::test]
async fn test_no_model_for_category_fails_route() {
    let orchestrator = offline_orchestrator(vec![specialist(
        "summarizer",
        "static",
        &[TaskCategory::Summary],
    )]);

    let error = orchestrator
        .route(&Task::new("Please debug this function"))
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        RoutingError::NoModelAvailable {
            category: TaskCategory::Coding
        }
    ));

    let request = TaskRequest {
        id: Some("req-1".to_owned()),
        input: "Please debug this function".to_owned(),
        priority: None,
        model_preferences: None,
        context: None,
    };
    let body = orchestrator.handle(request).await.unwrap_err();
    assert_eq!(body.status, 422);
    assert!(!body.success);
}

#[tokio::test]
async fn test_avoid_models_overrides_best_score() {
    let mock = mock_backend("mock", summary_models("mock"));
    let orchestrator = orchestrator_with(&mock);

    let request = TaskRequest {
        id: None,
        input: SPANISH_SUMMARY.to_owned(),
        priority: None,
        model_preferences: Some(ModelPreferences {
            preferred_models: Vec::new(),
            avoid_models: vec!["mistral-7b".to_owned()],
        }),
        context: None,
    };
    let response = orchestrator.handle(request).await.unwrap();
    assert_eq!(response.selected_model, "gpt-4");
    assert_eq!(mock.get_call_history()[0].model_id, "gpt-4");
}

#[tokio::test]
async fn test_usage_is_logged_per_route() {
    let mock = mock_backend("mock", summary_models("mock"));
    let logger = Arc::new(InMemoryUsageLogger::default());
    let orchestrator =
        orchestrator_with(&mock).with_usage_logger(Arc::clone(&logger) as Arc<dyn UsageLogger>);

    let task = Task::new(SPANISH_SUMMARY);
    orchestrator.route(&task).await.unwrap();
    orchestrator.route(&task).await.unwrap();

    let records = logger.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].model_used, "mistral-7b");
    assert_eq!(records[0].prompt_preview, SPANISH_SUMMARY);
}

#[tokio::test]
async fn test_failing_usage_logger_does_not_fail_route() {
    struct BrokenLogger;

    #[async_trait::async_trait]
    impl UsageLogger for BrokenLogger {
        async fn log_usage(
            &self,
            _record: &routewise_routing::UsageRecord,
        ) -> routewise_core::Result<()> {
            Err(routewise_core::Error::Other("usage store offline".to_owned()))
        }
    }

    let orchestrator =
        offline_orchestrator(builtin_models()).with_usage_logger(Arc::new(BrokenLogger));
    assert!(orchestrator.route(&Task::new("hello")).await.is_ok());
}

#[tokio::test]
async fn test_fallback_catalog_tops_up_sparse_discovery() {
    use routewise_core::ModelProvider as _;
    use routewise_routing::{ModelCatalog, ProviderRegistry, ResponseCache, RouteOrchestrator};

    let mock = mock_backend("mock", vec![routewise_core::Model::new("solo", "Solo", "mock")]);
    let registry = Arc::new(
        ProviderRegistry::default().with_provider(mock.name().to_owned(), Arc::new(mock.clone())),
    );
    let catalog = Arc::new(ModelCatalog::new(builtin_models(), registry.discovered_models()));
    assert_eq!(catalog.len(), 1 + builtin_models().len());

    let orchestrator =
        RouteOrchestrator::new(Arc::clone(&catalog), registry, Arc::new(ResponseCache::default()));
    let selector = ModelSelector::new(catalog);
    let expected = selector
        .select(&Task::new("hello"), TaskCategory::General)
        .unwrap();

    let outcome = orchestrator.route_detailed(&Task::new("hello")).await.unwrap();
    assert_eq!(outcome.result.selected_model, expected.id);
    assert_eq!(outcome.is_real_response, expected.id == "solo");
}
