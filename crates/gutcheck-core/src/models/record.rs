// ABOUTME: The canonical NutritionRecord and the provider-neutral draft it is assembled from
// ABOUTME: Records are immutable; derived category maps are built once from the flat lists
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use tracing::warn;

use super::categories::{
    partition, AdditiveType, AllergenTier, Categorize, CategoryMap, IngredientCategory,
};
use super::nutrients::{Macros, NutrientBasis, NutrientKey, NutrientProfile};
use super::provenance::{DataSource, Provenance, ProviderTag};
use crate::constants::records::UNKNOWN_PRODUCT_NAME;

/// Provider-neutral record fields before text classification
///
/// Produced by the field normalizer. Categorical fields are still raw provider
/// text here; the classifier turns them into [`CategoricalData`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDraft {
    /// Product name, possibly empty
    pub name: String,
    /// Brand or generic description, possibly empty
    pub description: String,
    /// Normalized nutrient values in canonical units
    pub nutrients: NutrientProfile,
    /// Raw ingredient statement
    pub ingredients_text: Option<String>,
    /// Raw allergen tags (`en:milk`, `Soybeans`, …)
    pub allergen_tags: Vec<String>,
    /// Raw additive tags (`en:e322`, …)
    pub additive_tags: Vec<String>,
    /// Provider the payload came from
    pub source: ProviderTag,
}

impl RecordDraft {
    /// Empty draft for a provider
    #[must_use]
    pub fn empty(source: ProviderTag) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            nutrients: NutrientProfile::default(),
            ingredients_text: None,
            allergen_tags: Vec::new(),
            additive_tags: Vec::new(),
            source,
        }
    }
}

/// Classified flat lists handed to record assembly
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoricalData {
    /// Lower-cased ingredients in statement order
    pub ingredients: Vec<String>,
    /// Canonical allergen names
    pub allergens: BTreeSet<String>,
    /// Human-readable additive names
    pub additives: Vec<String>,
}

/// Ingredients, allergens, additives and their derived maps
///
/// Kept together so a hybrid merge moves all of it from one donor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoricalBlock {
    ingredients: Vec<String>,
    allergens: BTreeSet<String>,
    additives: Vec<String>,
    ingredients_by_category: CategoryMap<IngredientCategory>,
    allergens_by_severity: CategoryMap<AllergenTier>,
    additives_by_type: CategoryMap<AdditiveType>,
}

impl CategoricalBlock {
    fn build(data: CategoricalData, categorizer: &impl Categorize) -> Self {
        let ingredients = dedup_in_order(
            data.ingredients
                .iter()
                .map(|entry| entry.trim().to_lowercase()),
        );
        let additives = dedup_in_order(data.additives.iter().map(|entry| entry.trim().to_owned()));
        let allergens: BTreeSet<String> = data
            .allergens
            .into_iter()
            .map(|entry| entry.trim().to_owned())
            .filter(|entry| !entry.is_empty())
            .collect();

        Self {
            ingredients_by_category: partition(&ingredients, |i| {
                categorizer.ingredient_category(i)
            }),
            allergens_by_severity: partition(&allergens, |a| categorizer.allergen_tier(a)),
            additives_by_type: partition(&additives, |a| categorizer.additive_type(a)),
            ingredients,
            allergens,
            additives,
        }
    }

    fn is_empty(&self) -> bool {
        self.ingredients.is_empty() && self.allergens.is_empty() && self.additives.is_empty()
    }
}

fn dedup_in_order(entries: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .filter(|entry| !entry.is_empty())
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// Canonical nutrition record returned by every lookup
///
/// Constructed only through [`NutritionRecord::assemble`],
/// [`NutritionRecord::from_parts`], [`NutritionRecord::unknown`] and
/// [`NutritionRecord::hybrid`], which keeps these invariants:
///
/// - nutrient values are finite and non-negative
/// - every flat-list entry sits in exactly one bucket of its derived map
/// - a record with source [`DataSource::None`] carries no data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionRecord {
    name: String,
    description: String,
    #[serde(flatten)]
    nutrients: NutrientProfile,
    #[serde(flatten)]
    categorical: CategoricalBlock,
    provenance: Provenance,
}

impl NutritionRecord {
    /// Build a record from a normalized draft and its classified lists
    #[must_use]
    pub fn assemble(
        draft: RecordDraft,
        categorical: CategoricalData,
        categorizer: &impl Categorize,
        provenance: Provenance,
    ) -> Self {
        Self::from_parts(
            draft.name,
            draft.description,
            draft.nutrients,
            categorical,
            categorizer,
            provenance,
        )
    }

    /// Build a record from already-normalized parts
    #[must_use]
    pub fn from_parts(
        name: String,
        description: String,
        mut nutrients: NutrientProfile,
        categorical: CategoricalData,
        categorizer: &impl Categorize,
        provenance: Provenance,
    ) -> Self {
        let dropped = nutrients.sanitize();
        if dropped > 0 {
            warn!(
                identifier = %provenance.barcode_or_query,
                dropped,
                "Dropped invalid nutrient values during record assembly"
            );
        }

        let mut name = name.trim().to_owned();
        let description = description.trim().to_owned();
        if name.is_empty() {
            UNKNOWN_PRODUCT_NAME.clone_into(&mut name);
        }

        Self {
            name,
            description,
            nutrients,
            categorical: CategoricalBlock::build(categorical, categorizer),
            provenance,
        }
    }

    /// Placeholder record for an identifier no source recognized
    #[must_use]
    pub fn unknown(identifier: &str) -> Self {
        let identifier = identifier.trim();
        let description = if identifier.is_empty() {
            "No identifier was provided".to_owned()
        } else {
            format!("No nutrition data found for '{identifier}'")
        };
        Self {
            name: UNKNOWN_PRODUCT_NAME.to_owned(),
            description,
            nutrients: NutrientProfile::default(),
            categorical: CategoricalBlock::default(),
            provenance: Provenance::new(DataSource::None, identifier),
        }
    }

    /// Merge two provider records
    ///
    /// Every nutrient value comes from `nutrition_donor`, and so do name and
    /// description unless the donor only has the placeholder name or an empty
    /// description. Ingredients and additives come from `categorical_donor`;
    /// allergens are the union of both donors, since a nutrition donor may
    /// declare allergen tags without an ingredient statement. The derived maps
    /// are rebuilt with `categorizer`.
    #[must_use]
    pub fn hybrid(
        nutrition_donor: Self,
        categorical_donor: Self,
        categorizer: &impl Categorize,
        provenance: Provenance,
    ) -> Self {
        let name = if nutrition_donor.name == UNKNOWN_PRODUCT_NAME {
            categorical_donor.name
        } else {
            nutrition_donor.name
        };
        let description = if nutrition_donor.description.is_empty() {
            categorical_donor.description
        } else {
            nutrition_donor.description
        };

        let donor = categorical_donor.categorical;
        let mut allergens = donor.allergens;
        allergens.extend(nutrition_donor.categorical.allergens);
        let categorical = CategoricalData {
            ingredients: donor.ingredients,
            allergens,
            additives: donor.additives,
        };

        Self {
            name,
            description,
            nutrients: nutrition_donor.nutrients,
            categorical: CategoricalBlock::build(categorical, categorizer),
            provenance,
        }
    }

    /// Stamp the quality score into the provenance, keeping its source
    #[must_use]
    pub fn with_quality_score(mut self, score: u32) -> Self {
        self.provenance.quality_score = Some(score);
        self
    }

    /// Product name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Brand or generic description
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// All nutrient values with their basis
    #[must_use]
    pub const fn nutrients(&self) -> &NutrientProfile {
        &self.nutrients
    }

    /// Energy in kilocalories, if known
    #[must_use]
    pub const fn calories_kcal(&self) -> Option<f64> {
        self.nutrients.calories_kcal
    }

    /// Headline macros
    #[must_use]
    pub const fn macros(&self) -> &Macros {
        &self.nutrients.macros
    }

    /// Extended nutrients keyed by typed nutrient key
    #[must_use]
    pub const fn extended_nutrients(&self) -> &BTreeMap<NutrientKey, f64> {
        &self.nutrients.extended
    }

    /// Quantity the nutrient values describe
    #[must_use]
    pub const fn basis(&self) -> NutrientBasis {
        self.nutrients.basis
    }

    /// Lower-cased ingredients in statement order
    #[must_use]
    pub fn ingredients(&self) -> &[String] {
        &self.categorical.ingredients
    }

    /// Canonical allergen names
    #[must_use]
    pub const fn allergens(&self) -> &BTreeSet<String> {
        &self.categorical.allergens
    }

    /// Human-readable additive names
    #[must_use]
    pub fn additives(&self) -> &[String] {
        &self.categorical.additives
    }

    /// Ingredients grouped by food category
    #[must_use]
    pub const fn ingredients_by_category(&self) -> &CategoryMap<IngredientCategory> {
        &self.categorical.ingredients_by_category
    }

    /// Allergens grouped by severity tier
    #[must_use]
    pub const fn allergens_by_severity(&self) -> &CategoryMap<AllergenTier> {
        &self.categorical.allergens_by_severity
    }

    /// Additives grouped by functional type
    #[must_use]
    pub const fn additives_by_type(&self) -> &CategoryMap<AdditiveType> {
        &self.categorical.additives_by_type
    }

    /// Provenance metadata
    #[must_use]
    pub const fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Overall source of the record
    #[must_use]
    pub const fn source(&self) -> DataSource {
        self.provenance.source
    }

    /// True when at least one nutrient value is known
    #[must_use]
    pub fn has_nutrients(&self) -> bool {
        self.nutrients.has_any()
    }

    /// True when the ingredient list is non-empty
    #[must_use]
    pub fn has_ingredients(&self) -> bool {
        !self.categorical.ingredients.is_empty()
    }

    /// True when the record carries neither nutrients nor categorical data
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.has_nutrients() && self.categorical.is_empty()
    }
}
