//! Core types and traits for the routewise model router.
//!
//! This crate provides the request/response data model, error handling, the
//! provider trait implemented by every backend, and the router configuration.
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

/// Router configuration loaded from TOML.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// Lock helpers that recover from poisoning.
pub mod sync;
/// Trait definitions for model providers.
pub mod traits;
/// Core data types for tasks, models, and results.
pub mod types;

pub use config::{ApiKeys, CacheConfig, ProviderConfig, RouterConfig};
pub use error::{Error, Result};
pub use sync::{IgnoreLock, IgnoreRwLock};
pub use traits::ModelProvider;
pub use types::{
    DispatchOptions, Model, ModelPreferences, Priority, ProviderResponse, RouteResult, Task,
    TaskCategory, TaskId, TaskRequest, estimate_tokens,
};
