use super::{ModelCatalog, ModelScorer};
use crate::{Result, RoutingError};
use routewise_core::{Model, Task, TaskCategory};
use std::sync::Arc;

/// Picks the best catalog model for a task.
pub struct ModelSelector {
    catalog: Arc<ModelCatalog>,
    scorer: ModelScorer,
}

impl ModelSelector {
    pub fn new(catalog: Arc<ModelCatalog>) -> Self {
        Self {
            catalog,
            scorer: ModelScorer,
        }
    }

    /// Selects from the current catalog snapshot.
    ///
    /// # Errors
    /// Returns `NoModelAvailable` when filtering leaves no candidate.
    pub fn select(&self, task: &Task, category: TaskCategory) -> Result<Model> {
        let snapshot = self.catalog.all_models();
        self.select_from(&snapshot, task, category)
    }

    /// Filters `models` by capability, availability, and the task's
    /// preferences, then returns the highest scorer. Equal scores resolve to
    /// the model that appears first in `models`.
    ///
    /// # Errors
    /// Returns `NoModelAvailable` when filtering leaves no candidate.
    pub fn select_from(
        &self,
        models: &[Model],
        task: &Task,
        category: TaskCategory,
    ) -> Result<Model> {
        let mut best: Option<(&Model, f64)> = None;

        let candidates = models
            .iter()
            .filter(|model| model.available && model.supports(category))
            .filter(|model| {
                task.preferred_models.is_empty() || task.preferred_models.contains(&model.id)
            })
            .filter(|model| !task.avoid_models.contains(&model.id));

        for model in candidates {
            let score = self.scorer.score(model, category, task.priority);
            tracing::trace!(model = %model.id, score, "scored candidate");
            // Strict comparison keeps the earliest model on ties
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((model, score));
            }
        }

        let (model, score) = best.ok_or(RoutingError::NoModelAvailable { category })?;
        tracing::debug!(
            model = %model.id,
            score,
            %category,
            priority = %task.priority,
            "selected model"
        );
        Ok(model.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routewise_core::Priority;

    fn selector() -> ModelSelector {
        ModelSelector::new(Arc::new(ModelCatalog::from_models(Vec::new())))
    }

    fn twins() -> Vec<Model> {
        vec![
            Model::new("first", "First", "p").with_ratings(8, 8),
            Model::new("second", "Second", "p").with_ratings(8, 8),
        ]
    }

    #[test]
    fn test_tie_keeps_catalog_order() {
        let task = Task::new("hello");
        let models = twins();
        let selected = selector()
            .select_from(&models, &task, TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "first");

        let reversed: Vec<_> = models.into_iter().rev().collect();
        let selected = selector()
            .select_from(&reversed, &task, TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "second");
    }

    #[test]
    fn test_avoided_model_never_selected() {
        let models = vec![
            Model::new("best", "Best", "p").with_ratings(10, 10),
            Model::new("okay", "Okay", "p").with_ratings(5, 5),
        ];
        let task = Task::new("hello").with_avoid_models(["best"]);
        let selected = selector()
            .select_from(&models, &task, TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "okay");
    }

    #[test]
    fn test_preferred_models_intersect() {
        let models = vec![
            Model::new("best", "Best", "p").with_ratings(10, 10),
            Model::new("okay", "Okay", "p").with_ratings(5, 5),
        ];
        let task = Task::new("hello").with_preferred_models(["okay", "missing"]);
        let selected = selector()
            .select_from(&models, &task, TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "okay");
    }

    #[test]
    fn test_empty_candidates_fail() {
        let models = vec![
            Model::new("summary-only", "S", "p").with_supported([TaskCategory::Summary]),
            Model::new("offline", "O", "p").with_available(false),
        ];
        let task = Task::new("code this");
        let error = selector()
            .select_from(&models, &task, TaskCategory::Coding)
            .unwrap_err();
        assert!(matches!(
            error,
            RoutingError::NoModelAvailable {
                category: TaskCategory::Coding
            }
        ));
    }

    #[test]
    fn test_preference_and_avoid_conflict_is_empty() {
        let task = Task::new("hello")
            .with_preferred_models(["first"])
            .with_avoid_models(["first"]);
        assert!(
            selector()
                .select_from(&twins(), &task, TaskCategory::General)
                .is_err()
        );
    }

    #[test]
    fn test_cost_priority_prefers_cheaper() {
        let models = vec![
            Model::new("premium", "P", "p")
                .with_ratings(10, 8)
                .with_cost_per_token(0.000_8),
            Model::new("budget", "B", "p")
                .with_ratings(6, 8)
                .with_cost_per_token(0.000_01),
        ];
        let task = Task::new("hello").with_priority(Priority::Cost);
        let selected = selector()
            .select_from(&models, &task, TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "budget");
    }

    #[test]
    fn test_select_reads_catalog() {
        let catalog = Arc::new(ModelCatalog::from_models(twins()));
        let selector = ModelSelector::new(catalog);
        let selected = selector
            .select(&Task::new("hello"), TaskCategory::General)
            .unwrap();
        assert_eq!(selected.id, "first");
    }
}
