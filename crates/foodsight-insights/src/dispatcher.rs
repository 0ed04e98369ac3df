//! Picks the language variant and renders the template for a classification.

use tracing::debug;

use foodsight_data::FixtureDataset;

use crate::classifier::Classification;
use crate::language::is_spanish;
use crate::templates::{TemplateContext, TemplateRegistry};

pub struct ResponseDispatcher {
    registry: TemplateRegistry,
}

impl ResponseDispatcher {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Render the template for `classification` in the question's language.
    pub fn respond(
        &self,
        classification: &Classification,
        question: &str,
        dataset: &FixtureDataset,
    ) -> String {
        let spanish = is_spanish(question);
        debug!(
            category = classification.category.tag(),
            spanish, "Rendering template"
        );
        let ctx = TemplateContext {
            dataset,
            classification,
        };
        self.registry
            .get(classification.category)
            .render(&ctx, spanish)
    }

    /// The general business overview, in the question's language.
    pub fn overview(&self, question: &str, dataset: &FixtureDataset) -> String {
        self.respond(&Classification::general(), question, dataset)
    }
}

impl Default for ResponseDispatcher {
    fn default() -> Self {
        Self::new(TemplateRegistry::standard())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::QueryClassifier;

    #[test]
    fn test_language_follows_the_question() {
        let ds = FixtureDataset::standard();
        let dispatcher = ResponseDispatcher::default();
        let classifier = QueryClassifier::for_dataset(&ds);

        let q = "¿Qué productos están agotados?";
        let es = dispatcher.respond(&classifier.classify(q), q, &ds);
        assert!(es.contains("Productos agotados"));

        let q = "Which products are out of stock?";
        let en = dispatcher.respond(&classifier.classify(q), q, &ds);
        assert!(en.contains("Out-of-stock products"));
    }

    #[test]
    fn test_overview_markers() {
        let ds = FixtureDataset::standard();
        let dispatcher = ResponseDispatcher::default();
        assert!(dispatcher
            .overview("¿Cómo van las ventas?", &ds)
            .contains("Análisis exhaustivo"));
        assert!(dispatcher
            .overview("How is the business doing overall?", &ds)
            .contains("Comprehensive analysis"));
    }
}
