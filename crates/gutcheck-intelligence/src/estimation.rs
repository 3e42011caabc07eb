// ABOUTME: Explicit, caller-invoked calorie estimation from macronutrients
// ABOUTME: Never applied during normalization or reconciliation; unknown stays unknown there
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use gutcheck_core::constants::units::{
    ATWATER_CARBS_KCAL_PER_G, ATWATER_FAT_KCAL_PER_G, ATWATER_PROTEIN_KCAL_PER_G,
};
use gutcheck_core::{Macros, NutritionRecord};
use serde::Serialize;

/// Calories of a record and whether they were reported or derived
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "kcal", rename_all = "snake_case")]
pub enum CalorieValue {
    /// The provider reported this value
    Reported(f64),
    /// Derived from protein, carbohydrate and fat with Atwater factors
    Estimated(f64),
    /// Not reported and not derivable
    Unknown,
}

impl CalorieValue {
    /// The numeric value, reported or estimated
    #[must_use]
    pub const fn kcal(self) -> Option<f64> {
        match self {
            Self::Reported(kcal) | Self::Estimated(kcal) => Some(kcal),
            Self::Unknown => None,
        }
    }
}

/// Atwater estimate (4/4/9 kcal per g); needs all three macros
#[must_use]
pub fn estimate_calories(macros: &Macros) -> Option<f64> {
    let protein = macros.protein_g?;
    let carbs = macros.carbs_g?;
    let fat = macros.fat_g?;
    Some(
        protein.mul_add(
            ATWATER_PROTEIN_KCAL_PER_G,
            carbs.mul_add(ATWATER_CARBS_KCAL_PER_G, fat * ATWATER_FAT_KCAL_PER_G),
        ),
    )
}

/// Reported calories, else an Atwater estimate, else unknown
#[must_use]
pub fn calorie_value(record: &NutritionRecord) -> CalorieValue {
    if let Some(kcal) = record.calories_kcal() {
        return CalorieValue::Reported(kcal);
    }
    estimate_calories(record.macros()).map_or(CalorieValue::Unknown, CalorieValue::Estimated)
}
