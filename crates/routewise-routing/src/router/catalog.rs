//! Model catalog: static fallback entries merged with provider-discovered models.
//!
//! The catalog is read on every route and rebuilt only by an explicit
//! [`ModelCatalog::refresh`]. Readers take a cheap snapshot of the current
//! list, so a refresh never exposes a half-built catalog to a selection.

use routewise_core::{IgnoreRwLock as _, Model, TaskCategory};
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// Below this many discovered models, static fallback entries are appended.
pub const MIN_DISCOVERED_MODELS: usize = 3;

/// Registry of routable models in discovery order.
pub struct ModelCatalog {
    /// Current immutable snapshot
    models: RwLock<Arc<[Model]>>,
    /// Static entries used to top up a sparse discovery
    fallback: Vec<Model>,
}

impl ModelCatalog {
    /// Builds the catalog from static fallback entries and discovered models.
    pub fn new(fallback: Vec<Model>, discovered: Vec<Model>) -> Self {
        let models = Self::merge(&fallback, discovered);
        tracing::info!("Model catalog built with {} models", models.len());
        Self {
            models: RwLock::new(models.into()),
            fallback,
        }
    }

    /// Catalog consisting only of the given models, with no fallback.
    pub fn from_models(models: Vec<Model>) -> Self {
        Self::new(Vec::new(), models)
    }

    fn merge(fallback: &[Model], discovered: Vec<Model>) -> Vec<Model> {
        let mut seen = HashSet::new();
        let mut models: Vec<Model> = discovered
            .into_iter()
            .filter(|model| seen.insert(model.id.clone()))
            .collect();

        if models.len() < MIN_DISCOVERED_MODELS {
            let discovered_count = models.len();
            models.extend(
                fallback
                    .iter()
                    .filter(|model| seen.insert(model.id.clone()))
                    .cloned(),
            );
            tracing::debug!(
                discovered = discovered_count,
                total = models.len(),
                "appended static fallback models"
            );
        }

        models
    }

    /// Snapshot of every model, in catalog order.
    pub fn all_models(&self) -> Arc<[Model]> {
        Arc::clone(&self.models.read_ignore_poison())
    }

    /// Looks up a model by id.
    pub fn model_by_id(&self, id: &str) -> Option<Model> {
        self.all_models().iter().find(|model| model.id == id).cloned()
    }

    /// Available models that support `category`, in catalog order.
    pub fn models_for(&self, category: TaskCategory) -> Vec<Model> {
        self.all_models()
            .iter()
            .filter(|model| model.available && model.supports(category))
            .cloned()
            .collect()
    }

    /// Rebuilds the catalog from a fresh discovery and swaps it in atomically.
    pub fn refresh(&self, discovered: Vec<Model>) {
        let models: Arc<[Model]> = Self::merge(&self.fallback, discovered).into();
        let count = models.len();
        *self.models.write_ignore_poison() = models;
        tracing::info!("Model catalog refreshed with {count} models");
    }

    pub fn len(&self) -> usize {
        self.models.read_ignore_poison().len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.read_ignore_poison().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: &str, provider: &str) -> Model {
        Model::new(id, id, provider)
    }

    #[test]
    fn test_sparse_discovery_appends_fallback() {
        let catalog = ModelCatalog::new(
            vec![model("static-a", "x"), model("shared", "x")],
            vec![model("shared", "live"), model("live-b", "live")],
        );
        let ids: Vec<_> = catalog.all_models().iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, ["shared", "live-b", "static-a"]);
        assert_eq!(
            catalog.model_by_id("shared").unwrap().provider_name,
            "live"
        );
    }

    #[test]
    fn test_rich_discovery_skips_fallback() {
        let catalog = ModelCatalog::new(
            vec![model("static-a", "x")],
            vec![model("a", "p"), model("b", "p"), model("c", "p")],
        );
        assert_eq!(catalog.len(), 3);
        assert!(catalog.model_by_id("static-a").is_none());
    }

    #[test]
    fn test_models_for_filters_availability_and_support() {
        let catalog = ModelCatalog::from_models(vec![
            model("all", "p"),
            model("offline", "p").with_available(false),
            model("no-code", "p").with_supported([TaskCategory::Summary]),
        ]);
        let coding: Vec<_> = catalog
            .models_for(TaskCategory::Coding)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(coding, ["all"]);
    }

    #[test]
    fn test_refresh_keeps_old_snapshots_intact() {
        let catalog = ModelCatalog::new(vec![model("static", "x")], Vec::new());
        let before = catalog.all_models();

        catalog.refresh(vec![model("a", "p"), model("b", "p"), model("c", "p")]);

        assert_eq!(before.len(), 1);
        assert_eq!(catalog.len(), 3);
        assert!(catalog.model_by_id("static").is_none());
    }
}
