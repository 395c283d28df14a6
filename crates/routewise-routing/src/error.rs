use routewise_core::{Error as CoreError, TaskCategory};
use std::result::Result as StdResult;
use thiserror::Error;

pub type Result<T> = StdResult<T, RoutingError>;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// Input rejected before classification.
    #[error("Invalid task: {0}")]
    Validation(String),

    /// Every catalog model was filtered out for the category.
    #[error("No model available for task category {category}")]
    NoModelAvailable { category: TaskCategory },

    /// Dispatch failed; recovered by the synthetic fallback inside a route.
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("{0}")]
    Other(String),
}

impl RoutingError {
    /// HTTP status the transport layer should answer with.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NoModelAvailable { .. } => 422,
            Self::Core(_) | Self::Provider(_) | Self::UnknownModel(_) | Self::Other(_) => 500,
        }
    }
}
