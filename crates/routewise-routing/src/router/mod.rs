//! Model catalog, scoring, and selection.

pub mod catalog;
pub mod scorer;
pub mod selector;

pub use catalog::{MIN_DISCOVERED_MODELS, ModelCatalog};
pub use scorer::{ModelScorer, ScoreWeights};
pub use selector::ModelSelector;
