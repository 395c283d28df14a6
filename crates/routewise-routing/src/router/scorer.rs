use routewise_core::{Model, Priority, TaskCategory};

/// Relative weights of quality, speed, and cost; always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub quality: f64,
    pub speed: f64,
    pub cost: f64,
}

impl ScoreWeights {
    const fn new(quality: f64, speed: f64, cost: f64) -> Self {
        Self {
            quality,
            speed,
            cost,
        }
    }

    /// Weights for a task. `Cost` and `Performance` priorities override the category.
    pub const fn for_task(category: TaskCategory, priority: Priority) -> Self {
        match priority {
            Priority::Cost => Self::new(0.1, 0.1, 0.8),
            Priority::Performance => Self::new(0.5, 0.4, 0.1),
            Priority::Balanced => match category {
                TaskCategory::Summary => Self::new(0.3, 0.4, 0.3),
                TaskCategory::Translation => Self::new(0.6, 0.2, 0.2),
                TaskCategory::Analysis => Self::new(0.7, 0.15, 0.15),
                TaskCategory::Coding => Self::new(0.5, 0.3, 0.2),
                TaskCategory::General => Self::new(0.4, 0.3, 0.3),
            },
        }
    }
}

/// Fixed weighted scoring of a model for a task.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelScorer;

impl ModelScorer {
    /// `quality*q + speed*s + cost_score*c`.
    pub fn score(&self, model: &Model, category: TaskCategory, priority: Priority) -> f64 {
        let weights = ScoreWeights::for_task(category, priority);
        f64::from(model.quality_rating).mul_add(
            weights.quality,
            f64::from(model.speed_rating)
                .mul_add(weights.speed, Self::cost_score(model) * weights.cost),
        )
    }

    /// `10 - cost_per_token * 10000`, clamped at zero.
    pub fn cost_score(model: &Model) -> f64 {
        (model.cost_per_token.mul_add(-10_000.0, 10.0)).max(0.0)
    }
}
