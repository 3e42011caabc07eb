// ABOUTME: Deterministic quality score used to rank candidate records from different providers
// ABOUTME: Categorical data outweighs raw nutrient counts because trigger analysis depends on it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use gutcheck_core::NutritionRecord;
use serde::Serialize;

/// Points for a non-empty ingredient list
pub const INGREDIENTS_WEIGHT: u32 = 10;
/// Points for a non-empty additive list
pub const ADDITIVES_WEIGHT: u32 = 5;
/// Points for a non-empty allergen set
pub const ALLERGENS_WEIGHT: u32 = 5;

/// The parts a quality score is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    /// Known nutrient values (calories, macros and extended nutrients)
    pub nutrient_fields: u32,
    /// Ingredient points
    pub ingredients: u32,
    /// Additive points
    pub additives: u32,
    /// Allergen points
    pub allergens: u32,
}

impl QualityBreakdown {
    /// Sum of all parts
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.nutrient_fields + self.ingredients + self.additives + self.allergens
    }
}

/// Scores record completeness
///
/// `score = nutrient_fields + 10·[ingredients] + 5·[additives] + 5·[allergens]`.
/// Pure and deterministic: the same record always scores the same.
pub struct QualityScorer;

impl QualityScorer {
    /// Score breakdown of a record
    #[must_use]
    pub fn breakdown(record: &NutritionRecord) -> QualityBreakdown {
        let weight = |present: bool, points: u32| if present { points } else { 0 };
        QualityBreakdown {
            nutrient_fields: u32::try_from(record.nutrients().known_values()).unwrap_or(u32::MAX),
            ingredients: weight(record.has_ingredients(), INGREDIENTS_WEIGHT),
            additives: weight(!record.additives().is_empty(), ADDITIVES_WEIGHT),
            allergens: weight(!record.allergens().is_empty(), ALLERGENS_WEIGHT),
        }
    }

    /// Quality score of a record
    #[must_use]
    pub fn score(record: &NutritionRecord) -> u32 {
        Self::breakdown(record).total()
    }
}
