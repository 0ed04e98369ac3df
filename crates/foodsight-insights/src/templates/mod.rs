//! Template registry: one Spanish and one English renderer per category.
//!
//! Renderers are plain functions over the immutable dataset. Any renderer that
//! picks items out of a filtered list has an explicit empty-state phrase.

mod clients;
mod commercial;
mod general;
mod inventory;
mod products;
mod regions;

use std::collections::HashMap;

use foodsight_data::FixtureDataset;

use crate::classifier::{Category, Classification};

/// Everything a renderer may read.
pub struct TemplateContext<'a> {
    pub dataset: &'a FixtureDataset,
    pub classification: &'a Classification,
}

pub type RenderFn = fn(&TemplateContext<'_>) -> String;

/// The two language variants of one answer.
#[derive(Clone, Copy)]
pub struct Template {
    pub es: RenderFn,
    pub en: RenderFn,
}

impl Template {
    pub fn render(&self, ctx: &TemplateContext<'_>, spanish: bool) -> String {
        if spanish {
            (self.es)(ctx)
        } else {
            (self.en)(ctx)
        }
    }
}

/// Category → template mapping.
pub struct TemplateRegistry {
    templates: HashMap<Category, Template>,
}

impl TemplateRegistry {
    /// Registry populated with every built-in template.
    pub fn standard() -> Self {
        let mut templates = HashMap::new();
        inventory::register(&mut templates);
        products::register(&mut templates);
        clients::register(&mut templates);
        regions::register(&mut templates);
        commercial::register(&mut templates);
        general::register(&mut templates);
        Self { templates }
    }

    /// Template for `category`, or the general overview when none is registered.
    pub fn get(&self, category: Category) -> Template {
        self.templates
            .get(&category)
            .or_else(|| self.templates.get(&Category::GeneralQuery))
            .copied()
            .unwrap_or(Template {
                es: general::overview_es,
                en: general::overview_en,
            })
    }

    pub fn contains(&self, category: Category) -> bool {
        self.templates.contains_key(&category)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

pub(crate) fn insert(
    map: &mut HashMap<Category, Template>,
    category: Category,
    es: RenderFn,
    en: RenderFn,
) {
    map.insert(category, Template { es, en });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_category_registered() {
        let registry = TemplateRegistry::standard();
        for category in Category::all() {
            assert!(registry.contains(*category), "missing template for {}", category);
        }
        assert_eq!(registry.len(), Category::all().len());
    }

    /// Every template renders non-empty, well-formed text on both the standard
    /// and the empty dataset.
    #[test]
    fn test_all_templates_render_on_any_dataset() {
        let registry = TemplateRegistry::standard();
        for dataset in [FixtureDataset::standard(), FixtureDataset::empty()] {
            for category in Category::all() {
                let classification = Classification {
                    category: *category,
                    confidence: 1.0,
                    parameters: Default::default(),
                };
                let ctx = TemplateContext {
                    dataset: &dataset,
                    classification: &classification,
                };
                for spanish in [true, false] {
                    let text = registry.get(*category).render(&ctx, spanish);
                    assert!(!text.trim().is_empty(), "{} rendered empty", category);
                    for bad in ["undefined", "NaN", "inf%", "$-0"] {
                        assert!(!text.contains(bad), "{} rendered {:?}: {}", category, bad, text);
                    }
                }
            }
        }
    }
}
