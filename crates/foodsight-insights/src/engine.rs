//! `get_business_insights`: classify, answer from a template, or fall back.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use foodsight_chat::FallbackClient;
use foodsight_data::FixtureDataset;

use crate::classifier::{Classification, QueryClassifier};
use crate::dispatcher::ResponseDispatcher;
use crate::language::is_spanish;

/// Phrases that make an unmatched question a request for the general overview.
pub const BUSINESS_TERMS: &[&str] = &[
    "sales",
    "ventas",
    "business",
    "negocio",
    "revenue",
    "ingresos",
    "performance",
    "desempeño",
    "desempeno",
    "company",
    "empresa",
    "how are",
    "cómo van",
    "como van",
    "cómo vamos",
    "como vamos",
    "numbers",
    "números",
    "numeros",
];

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    Template,
    Overview,
    Llm,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightAnswer {
    pub answer: String,
    pub classification: Classification,
    pub source: AnswerSource,
}

pub fn mentions_business_term(question: &str) -> bool {
    let lower = question.to_lowercase();
    BUSINESS_TERMS.iter().any(|t| lower.contains(t))
}

/// Answers business questions against one immutable dataset.
pub struct InsightEngine {
    dataset: Arc<FixtureDataset>,
    classifier: QueryClassifier,
    dispatcher: ResponseDispatcher,
    fallback: FallbackClient,
    min_confidence: f64,
}

impl InsightEngine {
    pub fn new(dataset: Arc<FixtureDataset>, fallback: FallbackClient, min_confidence: f64) -> Self {
        let classifier = QueryClassifier::for_dataset(&dataset);
        Self {
            dataset,
            classifier,
            dispatcher: ResponseDispatcher::default(),
            fallback,
            min_confidence,
        }
    }

    pub fn dataset(&self) -> &Arc<FixtureDataset> {
        &self.dataset
    }

    pub fn fallback(&self) -> &FallbackClient {
        &self.fallback
    }

    pub fn classify(&self, question: &str) -> Classification {
        self.classifier.classify(question)
    }

    /// Answer a question. Never fails and never returns an empty answer.
    pub async fn get_business_insights(&self, question: &str) -> InsightAnswer {
        let classification = self.classifier.classify(question);
        let ds = self.dataset.as_ref();

        let (answer, source) = if !classification.is_general()
            && classification.confidence >= self.min_confidence
        {
            let text = self.dispatcher.respond(&classification, question, ds);
            (text, AnswerSource::Template)
        } else if question.trim().is_empty() || mentions_business_term(question) {
            (self.dispatcher.overview(question, ds), AnswerSource::Overview)
        } else {
            info!("No template for question; asking fallback LLM");
            let text = self.fallback.answer(question, ds, is_spanish(question)).await;
            (text, AnswerSource::Llm)
        };

        let (answer, source) = if answer.trim().is_empty() {
            debug!("Empty answer replaced by overview");
            (self.dispatcher.overview(question, ds), AnswerSource::Overview)
        } else {
            (answer, source)
        };

        InsightAnswer {
            answer,
            classification,
            source,
        }
    }

    /// Just the answer text.
    pub async fn answer_text(&self, question: &str) -> String {
        self.get_business_insights(question).await.answer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use foodsight_chat::fallback::{CONFIG_APOLOGY_EN, CONFIG_APOLOGY_ES};
    use foodsight_chat::LLMConfig;
    use parking_lot::RwLock;

    use crate::classifier::Category;

    fn engine(min_confidence: f64) -> InsightEngine {
        let fallback = FallbackClient::new(
            Arc::new(RwLock::new(LLMConfig::default())),
            Duration::from_secs(1),
        );
        InsightEngine::new(Arc::new(FixtureDataset::standard()), fallback, min_confidence)
    }

    #[tokio::test]
    async fn test_template_answer() {
        let result = engine(0.5).get_business_insights("out of stock").await;
        assert_eq!(result.source, AnswerSource::Template);
        assert_eq!(result.classification.category, Category::Stockouts);
        assert!(result.answer.contains("Out-of-stock products"));
    }

    #[tokio::test]
    async fn test_business_question_gets_overview() {
        let result = engine(0.5).get_business_insights("¿Cómo van las ventas?").await;
        assert_eq!(result.source, AnswerSource::Overview);
        assert!(result.classification.is_general());
        assert!(result.answer.contains("Análisis exhaustivo"));
        assert!(result.answer.contains("$4,495,400"));
    }

    #[tokio::test]
    async fn test_open_question_without_key_apologizes() {
        let engine = engine(0.5);
        let es = engine.get_business_insights("¿Qué opinas del clima?").await;
        assert_eq!(es.source, AnswerSource::Llm);
        assert_eq!(es.answer, CONFIG_APOLOGY_ES);

        let en = engine.answer_text("Tell me a joke about llamas").await;
        assert_eq!(en, CONFIG_APOLOGY_EN);
    }

    #[tokio::test]
    async fn test_never_empty() {
        let engine = engine(0.5);
        for q in ["", "   ", "\t\n", "🤔🤔🤔", "∑∂ƒ©˙∆˚¬", "?"] {
            let answer = engine.answer_text(q).await;
            assert!(!answer.trim().is_empty(), "empty answer for {:?}", q);
        }
        let blank = engine.get_business_insights("   ").await;
        assert_eq!(blank.source, AnswerSource::Overview);
    }

    #[tokio::test]
    async fn test_low_confidence_is_treated_as_unmatched() {
        // GREETING is 0.70, below this threshold
        let result = engine(0.9)
            .get_business_insights("hola, ¿cómo van las ventas del negocio?")
            .await;
        assert_eq!(result.classification.category, Category::Greeting);
        assert_eq!(result.source, AnswerSource::Overview);
    }
}
