//! Provider adapters for external LLM services.
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

/// Anthropic Messages API backend.
pub mod anthropic;
/// Scriptable provider for tests.
pub mod mock;
/// `OpenAI` chat-completions backend, also used for Groq.
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use mock::{MockBehavior, MockCall, MockProvider};
pub use openai::OpenAiCompatibleProvider;

/// Token-proportional cost: `tokens / 1000 * cost_per_k_tokens`.
#[must_use]
pub fn cost_for_tokens(tokens_used: u64, cost_per_k_tokens: f64) -> f64 {
    (tokens_used as f64 / 1000.0) * cost_per_k_tokens
}
