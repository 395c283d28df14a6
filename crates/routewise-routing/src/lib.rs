//! Routing engine: classification, model selection, response caching, and
//! provider dispatch behind a single [`RouteOrchestrator`].
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp,
        reason = "Allow for tests"
    )
)]

pub mod analyzer;
pub mod api;
pub mod cache;
pub mod dispatch;
pub mod error;
pub mod orchestrator;
pub mod router;
pub mod usage;

pub use analyzer::TaskClassifier;
pub use api::{ErrorResponse, RouteResponse};
pub use cache::{CacheStats, CleanupHandle, PreloadEntry, ResponseCache};
pub use dispatch::{ProviderDispatcher, ProviderRegistry};
pub use error::{Result, RoutingError};
pub use orchestrator::{RouteOrchestrator, RouteOutcome};
pub use router::{ModelCatalog, ModelScorer, ModelSelector, ScoreWeights};
pub use usage::{InMemoryUsageLogger, TracingUsageLogger, UsageLogger, UsageRecord};
