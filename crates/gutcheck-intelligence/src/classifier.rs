// ABOUTME: Text classifier parsing ingredient statements, allergen tags and additive codes
// ABOUTME: Files every ingredient, allergen and additive into exactly one category
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Text Classifier
//!
//! Three passes over lower-cased text, all driven by [`ClassificationTables`]:
//!
//! - ingredient food group, first match in [`IngredientCategory::PRECEDENCE`]
//! - allergen severity tier (Major, Common, else Mild)
//! - additive type, keyword match in [`AdditiveType::MATCH_ORDER`], then
//!   E-number range, else Other
//!
//! Keywords match whole words (see `contains_term`), so "corn" does not fire
//! on "peppercorn" and "egg" does not fire on "eggplant".

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use gutcheck_core::{
    AdditiveType, AllergenTier, CategoricalData, Categorize, IngredientCategory,
    NutritionRecord, Provenance, RecordDraft,
};
use regex::Regex;
use tracing::debug;

use crate::tables::{AdditiveEntry, ClassificationTables};
use crate::text::{
    collapse_whitespace, contains_any, contains_term, find_e_number, mask_phrases, title_case,
};

/// Nested `( … )` or `[ … ]` group with no inner brackets
static BRACKETED: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\([^()\[\]]*\)|\[[^()\[\]]*\]").ok());

/// "contains 2% or less of", "less than 2% of", with optional "each of"/"the following"
static LESS_THAN_PHRASE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"(?:contains\s+)?(?:(?:less\s+than\s+)?\d+(?:[.,]\d+)?\s*%\s+or\s+less|less\s+than\s+\d+(?:[.,]\d+)?\s*%)\s+of(?:\s+each\s+of)?(?:\s+the\s+following)?",
    )
    .ok()
});

/// Bare percentages ("12%", "2.5 %")
static PERCENTAGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?\s*%").ok());

/// Leading "ingredients:" label
static INGREDIENTS_LABEL: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*ingredients?\s*[:\-]?\s*").ok());

/// Ingredient separators: , ; : & and the word "and"
static SEPARATORS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[,;:&]|\band\b").ok());

/// Locale prefix on taxonomy tags ("en:", "fr:")
static LOCALE_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}:").ok());

fn replace_all(pattern: &LazyLock<Option<Regex>>, text: &str, with: &str) -> String {
    pattern.as_ref().map_or_else(
        || text.to_owned(),
        |re| re.replace_all(text, with).into_owned(),
    )
}

/// Label, qualifier-phrase and percentage cleanup, then split and dedup
fn tokenize(statement: &str) -> Vec<String> {
    let statement = replace_all(&INGREDIENTS_LABEL, statement, "");
    let statement = replace_all(&LESS_THAN_PHRASE, &statement, ",");
    let statement = replace_all(&PERCENTAGE, &statement, " ");

    let tokens: Vec<&str> = SEPARATORS.as_ref().map_or_else(
        || statement.split(',').collect(),
        |re| re.split(&statement).collect(),
    );

    let mut seen = BTreeSet::new();
    tokens
        .into_iter()
        .map(|token| collapse_whitespace(token.trim_matches(|c: char| !c.is_alphanumeric())))
        .filter(|token| token.chars().count() > 1)
        .filter(|token| seen.insert(token.clone()))
        .collect()
}

/// Keyword-table driven classifier
///
/// Cheap to share: holds only immutable tables and lookup maps.
#[derive(Debug, Clone)]
pub struct TextClassifier {
    tables: ClassificationTables,
    additives_by_code: HashMap<String, usize>,
    major: BTreeSet<String>,
    common: BTreeSet<String>,
}

impl TextClassifier {
    /// Build a classifier over validated tables
    #[must_use]
    pub fn new(tables: ClassificationTables) -> Self {
        let additives_by_code = tables
            .additive_catalogue
            .iter()
            .enumerate()
            .map(|(index, entry)| (entry.code.clone(), index))
            .collect();
        let lower = |names: &[String]| -> BTreeSet<String> {
            names.iter().map(|n| n.to_lowercase()).collect()
        };
        let major = lower(&tables.allergen_tiers.major);
        let common = lower(&tables.allergen_tiers.common);
        Self {
            tables,
            additives_by_code,
            major,
            common,
        }
    }

    /// The tables this classifier uses
    #[must_use]
    pub const fn tables(&self) -> &ClassificationTables {
        &self.tables
    }

    // ------------------------------------------------------------------------
    // Parsing
    // ------------------------------------------------------------------------

    /// Split a free-text ingredient statement into clean ingredient names
    ///
    /// Bracketed annotations (nested too), percentages, "contains 2% or less
    /// of" phrases and a leading "Ingredients:" label are removed; the rest
    /// is split on `, ; : &` and "and", trimmed, lower-cased and deduplicated
    /// in first-seen order. Tokens of one character or less are noise.
    #[must_use]
    pub fn parse_ingredient_statement(&self, text: &str) -> Vec<String> {
        let mut statement = text.to_lowercase();

        // Innermost groups first until no brackets are left
        loop {
            let stripped = replace_all(&BRACKETED, &statement, " ");
            if stripped == statement {
                break;
            }
            statement = stripped;
        }
        tokenize(&statement.replace(['(', ')', '[', ']'], " "))
    }

    /// Every term of an ingredient statement, bracketed sub-ingredients included
    ///
    /// Labels nest allergens inside groups ("chocolate chips (sugar, milk
    /// fat, soy lecithin)", "natural flavor (milk)"), so detection reads the
    /// group contents as ingredients of their own.
    #[must_use]
    pub fn detection_terms(&self, text: &str) -> Vec<String> {
        tokenize(&text.to_lowercase().replace(['(', ')', '[', ']'], ","))
    }

    /// Canonical allergen names from provider tags
    ///
    /// `en:milk` → `Dairy`, `en:soybeans` → `Soy`, `en:mustard` → `Mustard`.
    #[must_use]
    pub fn parse_allergen_tags(&self, tags: &[String]) -> BTreeSet<String> {
        tags.iter()
            .filter_map(|tag| {
                let tag = tag.trim().to_lowercase();
                let tag = replace_all(&LOCALE_PREFIX, &tag, "");
                let tag = collapse_whitespace(&tag.replace(['_', '-'], " "));
                if tag.is_empty() {
                    return None;
                }
                Some(
                    self.tables
                        .allergen_synonyms
                        .get(&tag)
                        .cloned()
                        .unwrap_or_else(|| title_case(&tag)),
                )
            })
            .collect()
    }

    /// Allergens implied by the ingredient list
    #[must_use]
    pub fn detect_allergens(&self, ingredients: &[String]) -> BTreeSet<String> {
        let mut found = BTreeSet::new();
        for ingredient in ingredients {
            let ingredient = ingredient.to_lowercase();
            for rule in &self.tables.allergen_rules {
                let visible = mask_phrases(&ingredient, &rule.exclusions);
                if contains_any(&visible, &rule.keywords) {
                    found.insert(rule.name.clone());
                }
            }
        }
        found
    }

    fn catalogue_entry(&self, code: &str) -> Option<&AdditiveEntry> {
        self.additives_by_code
            .get(code)
            .and_then(|&index| self.tables.additive_catalogue.get(index))
    }

    fn display_name(entry: &AdditiveEntry) -> String {
        let mut label = entry.code.clone();
        label.replace_range(..1, "E");
        format!("{} ({label})", entry.name)
    }

    /// Human-readable additive names from provider tags (`en:e322`)
    #[must_use]
    pub fn parse_additive_tags(&self, tags: &[String]) -> Vec<String> {
        let mut names = Vec::new();
        for tag in tags {
            let tag = replace_all(&LOCALE_PREFIX, &tag.trim().to_lowercase(), "");
            let name = match find_e_number(&tag) {
                Some(e_number) => self
                    .catalogue_entry(&e_number.code())
                    .or_else(|| self.catalogue_entry(&e_number.base_code()))
                    .map_or_else(|| e_number.label(), Self::display_name),
                None => title_case(&tag.replace(['_', '-'], " ")),
            };
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Additives named in the ingredient list
    #[must_use]
    pub fn detect_additives(&self, ingredients: &[String]) -> Vec<String> {
        let mut names = Vec::new();
        for ingredient in ingredients {
            let ingredient = ingredient.to_lowercase();
            let by_code = find_e_number(&ingredient).map(|e_number| {
                self.catalogue_entry(&e_number.code())
                    .or_else(|| self.catalogue_entry(&e_number.base_code()))
                    .map_or_else(|| e_number.label(), Self::display_name)
            });
            let by_name = || {
                self.tables
                    .additive_catalogue
                    .iter()
                    .find(|entry| {
                        contains_term(&ingredient, &entry.name.to_lowercase())
                            || contains_any(&ingredient, &entry.keywords)
                    })
                    .map(Self::display_name)
            };
            if let Some(name) = by_code.or_else(by_name) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    // ------------------------------------------------------------------------
    // Enrichment
    // ------------------------------------------------------------------------

    /// Classify a draft's categorical text and assemble the final record
    ///
    /// Allergens are the union of tag allergens and allergens detected in
    /// the statement, bracketed sub-ingredients included; additives likewise.
    /// The ingredient list itself keeps only top-level ingredients.
    #[must_use]
    pub fn enrich(&self, draft: RecordDraft, identifier: &str) -> NutritionRecord {
        let statement = draft.ingredients_text.as_deref().unwrap_or_default();
        let ingredients = self.parse_ingredient_statement(statement);
        let terms = self.detection_terms(statement);

        let mut allergens = self.parse_allergen_tags(&draft.allergen_tags);
        allergens.extend(self.detect_allergens(&terms));

        let mut additives = self.parse_additive_tags(&draft.additive_tags);
        for name in self.detect_additives(&terms) {
            if !additives.contains(&name) {
                additives.push(name);
            }
        }

        debug!(
            provider = %draft.source,
            identifier,
            ingredients = ingredients.len(),
            allergens = allergens.len(),
            additives = additives.len(),
            "Classified provider record"
        );

        let provenance = Provenance::single(draft.source, identifier);
        NutritionRecord::assemble(
            draft,
            CategoricalData {
                ingredients,
                allergens,
                additives,
            },
            self,
            provenance,
        )
    }
}

impl Categorize for TextClassifier {
    fn ingredient_category(&self, ingredient: &str) -> IngredientCategory {
        let ingredient = ingredient.to_lowercase();
        IngredientCategory::PRECEDENCE
            .into_iter()
            .find(|category| {
                self.tables
                    .ingredient_categories
                    .get(category)
                    .is_some_and(|keywords| contains_any(&ingredient, keywords))
            })
            .unwrap_or(IngredientCategory::Other)
    }

    fn allergen_tier(&self, allergen: &str) -> AllergenTier {
        let allergen = allergen.to_lowercase();
        if self.major.contains(&allergen) {
            AllergenTier::Major
        } else if self.common.contains(&allergen) {
            AllergenTier::Common
        } else {
            AllergenTier::Mild
        }
    }

    fn additive_type(&self, additive: &str) -> AdditiveType {
        let additive = additive.to_lowercase();
        let by_keyword = AdditiveType::MATCH_ORDER.into_iter().find(|kind| {
            self.tables
                .additive_types
                .keywords
                .get(kind)
                .is_some_and(|keywords| contains_any(&additive, keywords))
        });
        by_keyword
            .or_else(|| {
                let e_number = find_e_number(&additive)?;
                self.tables
                    .additive_types
                    .e_number_ranges
                    .iter()
                    .find(|range| range.contains(e_number.number))
                    .map(|range| range.additive_type)
            })
            .unwrap_or(AdditiveType::Other)
    }
}
