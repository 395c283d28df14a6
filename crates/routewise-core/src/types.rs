use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Unique identifier for a routed task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(String);

impl TaskId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied optimization target that reweights model scoring.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Minimize monetary cost
    Cost,
    /// Weigh quality, speed, and cost by task category
    #[default]
    Balanced,
    /// Maximize quality and speed
    Performance,
}

impl Priority {
    /// Wire name of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Balanced => "balanced",
            Self::Performance => "performance",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cost" => Ok(Self::Cost),
            "balanced" => Ok(Self::Balanced),
            "performance" => Ok(Self::Performance),
            other => Err(Error::Other(format!("unknown priority: {other}"))),
        }
    }
}

/// Inferred kind of work a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    /// Condense a text
    Summary,
    /// Translate between languages
    Translation,
    /// Examine, evaluate, or compare
    Analysis,
    /// Write or fix source code
    Coding,
    /// Anything else
    General,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Summary,
        Self::Translation,
        Self::Analysis,
        Self::Coding,
        Self::General,
    ];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Translation => "translation",
            Self::Analysis => "analysis",
            Self::Coding => "coding",
            Self::General => "general",
        }
    }
}

impl Display for TaskCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| Error::Other(format!("unknown task category: {value}")))
    }
}

/// Immutable routing request, owned by the call that created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub input_text: String,
    pub priority: Priority,
    pub preferred_models: HashSet<String>,
    pub avoid_models: HashSet<String>,
    /// Opaque caller context, passed through untouched.
    pub context: JsonValue,
}

impl Task {
    #[must_use]
    pub fn new(input_text: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            input_text: input_text.into(),
            priority: Priority::default(),
            preferred_models: HashSet::new(),
            avoid_models: HashSet::new(),
            context: JsonValue::Null,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_preferred_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferred_models = models.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_avoid_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avoid_models = models.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: JsonValue) -> Self {
        self.context = context;
        self
    }
}

/// Model preference block of an inbound payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelPreferences {
    #[serde(default)]
    pub preferred_models: Vec<String>,
    #[serde(default)]
    pub avoid_models: Vec<String>,
}

/// Task-shaped payload handed over by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub input: String,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub model_preferences: Option<ModelPreferences>,
    #[serde(default)]
    pub context: Option<JsonValue>,
}

impl TaskRequest {
    /// Converts the payload into a `Task`, generating an id when absent.
    #[must_use]
    pub fn into_task(self) -> Task {
        let preferences = self.model_preferences.unwrap_or_default();
        let mut task = Task::new(self.input)
            .with_priority(self.priority.unwrap_or_default())
            .with_preferred_models(preferences.preferred_models)
            .with_avoid_models(preferences.avoid_models)
            .with_context(self.context.unwrap_or(JsonValue::Null));
        if let Some(id) = self.id {
            task = task.with_id(TaskId::from(id));
        }
        task
    }
}

impl From<TaskRequest> for Task {
    fn from(request: TaskRequest) -> Self {
        request.into_task()
    }
}

/// A routable backend model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub display_name: String,
    pub provider_name: String,
    /// Price in USD for a single token
    pub cost_per_token: f64,
    pub max_tokens: u32,
    /// Relative speed, 1 (slowest) to 10 (fastest)
    pub speed_rating: u8,
    /// Relative output quality, 1 to 10
    pub quality_rating: u8,
    #[serde(default = "default_available")]
    pub available: bool,
    pub supported_task_types: BTreeSet<TaskCategory>,
}

const fn default_available() -> bool {
    true
}

impl Model {
    /// Creates an available model with mid-range ratings that supports every category.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            provider_name: provider_name.into(),
            cost_per_token: 0.0,
            max_tokens: 4096,
            speed_rating: 5,
            quality_rating: 5,
            available: true,
            supported_task_types: TaskCategory::ALL.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn with_cost_per_token(mut self, cost_per_token: f64) -> Self {
        self.cost_per_token = cost_per_token;
        self
    }

    /// Sets the price from a per-1K-token quote, as providers publish them.
    #[must_use]
    pub fn with_cost_per_k_tokens(mut self, cost_per_k_tokens: f64) -> Self {
        self.cost_per_token = cost_per_k_tokens / 1000.0;
        self
    }

    #[must_use]
    pub fn with_ratings(mut self, quality_rating: u8, speed_rating: u8) -> Self {
        self.quality_rating = quality_rating;
        self.speed_rating = speed_rating;
        self
    }

    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_supported<I>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = TaskCategory>,
    {
        self.supported_task_types = categories.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    /// Price in USD per 1000 tokens.
    #[must_use]
    pub fn cost_per_k_tokens(&self) -> f64 {
        self.cost_per_token * 1000.0
    }

    /// Whether the model accepts tasks of the given category.
    #[must_use]
    pub fn supports(&self, category: TaskCategory) -> bool {
        self.supported_task_types.contains(&category)
    }
}

/// Normalized answer from a provider backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub content: String,
    pub tokens_used: u64,
    pub cost_usd: f64,
    /// Measured wall-clock round trip
    pub latency_ms: u64,
    pub model_id: String,
}

/// Outcome of routing a task; also the unit stored in the response cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub selected_model: String,
    pub cost_usd: f64,
    pub estimated_time_ms: f64,
    pub task_category: TaskCategory,
    pub response_text: Option<String>,
}

/// Recognized per-call options forwarded to a backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchOptions {
    /// Completion token limit
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.7,
        }
    }
}

/// Rough token estimate: one token per four characters, rounded up.
#[must_use]
pub fn estimate_tokens(text: &str) -> u64 {
    (text.chars().count() as u64).div_ceil(4)
}
