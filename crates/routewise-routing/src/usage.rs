//! Usage logging hook.
//!
//! The router reports one record per routed request. Logging is best-effort:
//! a failing logger never fails the route.

use async_trait::async_trait;
use routewise_core::{IgnoreLock as _, Result};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Characters of the prompt kept in [`UsageRecord::prompt_preview`].
pub const PROMPT_PREVIEW_CHARS: usize = 100;

/// One routed request, as reported to the usage logger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub model_used: String,
    pub cost: f64,
    pub latency_ms: u64,
    pub tokens_used: u64,
    pub prompt_preview: String,
}

impl UsageRecord {
    /// First [`PROMPT_PREVIEW_CHARS`] characters, with `...` appended when truncated.
    pub fn preview(prompt: &str) -> String {
        let mut chars = prompt.chars();
        let head: String = chars.by_ref().take(PROMPT_PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Sink for usage records.
#[async_trait]
pub trait UsageLogger: Send + Sync {
    /// Records one routed request.
    ///
    /// # Errors
    /// Implementation-defined; the router logs and ignores failures.
    async fn log_usage(&self, record: &UsageRecord) -> Result<()>;
}

/// Emits usage records as tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUsageLogger;

#[async_trait]
impl UsageLogger for TracingUsageLogger {
    async fn log_usage(&self, record: &UsageRecord) -> Result<()> {
        tracing::info!(
            model = %record.model_used,
            cost = record.cost,
            latency_ms = record.latency_ms,
            tokens = record.tokens_used,
            "usage recorded"
        );
        Ok(())
    }
}

/// Keeps usage records in memory.
#[derive(Debug, Default)]
pub struct InMemoryUsageLogger {
    records: Mutex<Vec<UsageRecord>>,
}

impl InMemoryUsageLogger {
    pub fn records(&self) -> Vec<UsageRecord> {
        self.records.lock_ignore_poison().clone()
    }

    /// Total cost over all recorded requests.
    pub fn total_cost(&self) -> f64 {
        self.records
            .lock_ignore_poison()
            .iter()
            .map(|record| record.cost)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.records.lock_ignore_poison().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UsageLogger for InMemoryUsageLogger {
    async fn log_usage(&self, record: &UsageRecord) -> Result<()> {
        self.records.lock_ignore_poison().push(record.clone());
        Ok(())
    }
}
