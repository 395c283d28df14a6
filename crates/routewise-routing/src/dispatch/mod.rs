//! Provider dispatch.

/// Catalog-aware dispatch with a per-call deadline
pub mod dispatcher;
/// Named backend instances
pub mod registry;

pub use dispatcher::ProviderDispatcher;
pub use registry::ProviderRegistry;
