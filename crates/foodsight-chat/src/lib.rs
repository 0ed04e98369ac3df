//! External LLM access for questions the built-in templates cannot answer.
//!
//! Holds the persisted provider configuration (OpenAI/Anthropic/Groq), the
//! SSE streaming clients, and the [`FallbackClient`] used by the insight engine.

pub mod config;
pub mod fallback;
pub mod providers;
pub mod types;

pub use config::LLMConfig;
pub use fallback::FallbackClient;
pub use types::*;
