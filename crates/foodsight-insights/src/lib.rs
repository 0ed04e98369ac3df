//! Business insight engine: rule-based question classification with
//! templated Spanish/English answers and an LLM fallback.
//!
//! A question flows through [`language::is_spanish`], the ordered rule table in
//! [`classifier::QueryClassifier`], and the [`templates::TemplateRegistry`]
//! behind [`dispatcher::ResponseDispatcher`]. [`engine::InsightEngine`] ties
//! them together and is total: it always produces a displayable answer.

pub mod classifier;
pub mod dispatcher;
pub mod engine;
pub mod format;
pub mod language;
pub mod scenario;
pub mod templates;

pub use classifier::{Category, Classification, QueryClassifier};
pub use dispatcher::ResponseDispatcher;
pub use engine::{AnswerSource, InsightAnswer, InsightEngine};
pub use language::is_spanish;
pub use scenario::{simulate, ScenarioInput, ScenarioResult};
