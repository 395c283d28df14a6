//! Request text analysis.

/// Keyword-based task classification
pub mod classifier;

pub use classifier::{LONG_INPUT_THRESHOLD, TaskClassifier};
