// ABOUTME: Maps each provider's schema onto the provider-neutral record draft
// ABOUTME: Handles field names, unit conversion, kJ to kcal, salt to sodium, and invalid values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Field Normalizer
//!
//! Rules shared by every provider:
//!
//! - missing fields stay absent, an explicit 0 stays 0
//! - negative and non-finite values are dropped with a warning
//! - values are converted into each nutrient's canonical unit; a value whose
//!   unit is not recognised is dropped rather than guessed

use gutcheck_core::constants::units::{KJ_PER_KCAL, SODIUM_MG_PER_G_SALT};
use gutcheck_core::models::is_valid_amount;
use gutcheck_core::{
    Macros, NutrientBasis, NutrientKey, NutrientProfile, NutrientUnit, ProviderTag, RecordDraft,
};
use serde_json::Value;
use tracing::{debug, warn};

use crate::payload::{FdcFood, OffProduct, RawPayload};

/// Normalize a provider payload into a record draft
#[must_use]
pub fn normalize(payload: &RawPayload) -> RecordDraft {
    match payload {
        RawPayload::OpenFoodFacts(product) => normalize_open_food_facts(product),
        RawPayload::FoodDataCentral(food) => normalize_food_data_central(food),
    }
}

/// Headline macro slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacroField {
    Protein,
    Carbs,
    Fat,
    Fiber,
    Sugar,
    Sodium,
}

impl MacroField {
    const fn unit(self) -> NutrientUnit {
        match self {
            Self::Sodium => NutrientUnit::Milligrams,
            _ => NutrientUnit::Grams,
        }
    }

    fn slot(self, macros: &mut Macros) -> &mut Option<f64> {
        match self {
            Self::Protein => &mut macros.protein_g,
            Self::Carbs => &mut macros.carbs_g,
            Self::Fat => &mut macros.fat_g,
            Self::Fiber => &mut macros.fiber_g,
            Self::Sugar => &mut macros.sugar_g,
            Self::Sodium => &mut macros.sodium_mg,
        }
    }
}

/// Where a provider nutrient lands in the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Calories,
    Macro(MacroField),
    Extended(NutrientKey),
}

impl Target {
    fn unit(self) -> NutrientUnit {
        match self {
            // energy never goes through mass conversion
            Self::Calories => NutrientUnit::Grams,
            Self::Macro(field) => field.unit(),
            Self::Extended(key) => key.unit(),
        }
    }
}

fn store(profile: &mut NutrientProfile, target: Target, value: f64) {
    match target {
        Target::Calories => profile.calories_kcal = Some(value),
        Target::Macro(field) => *field.slot(&mut profile.macros) = Some(value),
        Target::Extended(key) => {
            profile.extended.insert(key, value);
        }
    }
}

fn accept(provider: ProviderTag, field: &str, value: f64) -> Option<f64> {
    if is_valid_amount(value) {
        Some(value)
    } else {
        warn!(provider = %provider, field, value, "Dropping invalid nutrient value");
        None
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

// ============================================================================
// Open Food Facts
// ============================================================================

/// Open Food Facts `nutriments` keys (without the `_100g` suffix), all in grams
const OFF_MASS_FIELDS: [(&str, Target); 19] = [
    ("proteins", Target::Macro(MacroField::Protein)),
    ("carbohydrates", Target::Macro(MacroField::Carbs)),
    ("fat", Target::Macro(MacroField::Fat)),
    ("fiber", Target::Macro(MacroField::Fiber)),
    ("sugars", Target::Macro(MacroField::Sugar)),
    ("sodium", Target::Macro(MacroField::Sodium)),
    ("saturated-fat", Target::Extended(NutrientKey::SaturatedFatG)),
    ("trans-fat", Target::Extended(NutrientKey::TransFatG)),
    ("monounsaturated-fat", Target::Extended(NutrientKey::MonounsaturatedFatG)),
    ("polyunsaturated-fat", Target::Extended(NutrientKey::PolyunsaturatedFatG)),
    ("added-sugars", Target::Extended(NutrientKey::AddedSugarsG)),
    ("cholesterol", Target::Extended(NutrientKey::CholesterolMg)),
    ("potassium", Target::Extended(NutrientKey::PotassiumMg)),
    ("calcium", Target::Extended(NutrientKey::CalciumMg)),
    ("iron", Target::Extended(NutrientKey::IronMg)),
    ("magnesium", Target::Extended(NutrientKey::MagnesiumMg)),
    ("vitamin-c", Target::Extended(NutrientKey::VitaminCMg)),
    ("vitamin-a", Target::Extended(NutrientKey::VitaminAUg)),
    ("vitamin-d", Target::Extended(NutrientKey::VitaminDUg)),
];

fn json_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn off_value(product: &OffProduct, key: &str) -> Option<f64> {
    let field = format!("{key}_100g");
    let value = json_number(product.nutriments.get(&field)?)?;
    accept(ProviderTag::OpenFoodFacts, &field, value)
}

fn off_nutrients(product: &OffProduct) -> NutrientProfile {
    let mut profile = NutrientProfile {
        basis: NutrientBasis::Per100g,
        serving_size: non_empty(product.serving_size.as_deref()).map(str::to_owned),
        ..NutrientProfile::default()
    };

    profile.calories_kcal = off_value(product, "energy-kcal").or_else(|| {
        off_value(product, "energy").map(|kj| {
            debug!("Converting Open Food Facts energy from kJ to kcal");
            kj / KJ_PER_KCAL
        })
    });

    for (key, target) in OFF_MASS_FIELDS {
        if let Some(grams) = off_value(product, key) {
            store(
                &mut profile,
                target,
                NutrientUnit::Grams.convert(grams, target.unit()),
            );
        }
    }

    if profile.macros.sodium_mg.is_none() {
        if let Some(salt_g) = off_value(product, "salt") {
            debug!(salt_g, "Deriving sodium from salt");
            profile.macros.sodium_mg = Some(salt_g * SODIUM_MG_PER_G_SALT);
        }
    }

    profile
}

fn normalize_open_food_facts(product: &OffProduct) -> RecordDraft {
    let name = non_empty(product.product_name.as_deref())
        .or_else(|| non_empty(product.product_name_en.as_deref()))
        .unwrap_or_default()
        .to_owned();
    let description = non_empty(product.brands.as_deref())
        .or_else(|| non_empty(product.generic_name.as_deref()))
        .unwrap_or_default()
        .to_owned();
    let ingredients_text = non_empty(product.ingredients_text.as_deref())
        .or_else(|| non_empty(product.ingredients_text_en.as_deref()))
        .map(str::to_owned);

    RecordDraft {
        name,
        description,
        nutrients: off_nutrients(product),
        ingredients_text,
        allergen_tags: product.allergens_tags.clone(),
        additive_tags: product.additives_tags.clone(),
        source: ProviderTag::OpenFoodFacts,
    }
}

// ============================================================================
// FoodData Central
// ============================================================================

/// FDC sugar nutrient ids; 2000 ("Total Sugars") wins over 1063
const FDC_TOTAL_SUGARS: u32 = 2000;

fn fdc_target(nutrient_id: u32) -> Option<Target> {
    let target = match nutrient_id {
        1008 => Target::Calories,
        1003 => Target::Macro(MacroField::Protein),
        1005 => Target::Macro(MacroField::Carbs),
        1004 => Target::Macro(MacroField::Fat),
        1079 => Target::Macro(MacroField::Fiber),
        FDC_TOTAL_SUGARS | 1063 => Target::Macro(MacroField::Sugar),
        1093 => Target::Macro(MacroField::Sodium),
        1258 => Target::Extended(NutrientKey::SaturatedFatG),
        1257 => Target::Extended(NutrientKey::TransFatG),
        1292 => Target::Extended(NutrientKey::MonounsaturatedFatG),
        1293 => Target::Extended(NutrientKey::PolyunsaturatedFatG),
        1235 => Target::Extended(NutrientKey::AddedSugarsG),
        1253 => Target::Extended(NutrientKey::CholesterolMg),
        1092 => Target::Extended(NutrientKey::PotassiumMg),
        1087 => Target::Extended(NutrientKey::CalciumMg),
        1089 => Target::Extended(NutrientKey::IronMg),
        1090 => Target::Extended(NutrientKey::MagnesiumMg),
        1162 => Target::Extended(NutrientKey::VitaminCMg),
        1106 => Target::Extended(NutrientKey::VitaminAUg),
        1114 => Target::Extended(NutrientKey::VitaminDUg),
        _ => return None,
    };
    Some(target)
}

fn fdc_energy_kcal(amount: f64, unit: &str) -> Option<f64> {
    match unit.trim().to_ascii_lowercase().as_str() {
        "kcal" => Some(amount),
        "kj" => Some(amount / KJ_PER_KCAL),
        _ => None,
    }
}

fn fdc_nutrients(food: &FdcFood) -> NutrientProfile {
    let provider = ProviderTag::FoodDataCentral;
    let mut profile = NutrientProfile {
        basis: NutrientBasis::Per100g,
        serving_size: fdc_serving_size(food),
        ..NutrientProfile::default()
    };

    for nutrient in &food.food_nutrients {
        let Some(target) = fdc_target(nutrient.nutrient_id) else {
            continue;
        };
        let Some(amount) = nutrient.value else {
            continue;
        };
        let field = nutrient
            .nutrient_name
            .as_deref()
            .unwrap_or("unnamed nutrient");
        let Some(amount) = accept(provider, field, amount) else {
            continue;
        };
        let unit = nutrient.unit_name.as_deref().unwrap_or_default();

        let converted = if target == Target::Calories {
            fdc_energy_kcal(amount, unit)
        } else {
            NutrientUnit::from_label(unit).map(|from| from.convert(amount, target.unit()))
        };
        let Some(converted) = converted else {
            warn!(
                provider = %provider,
                field,
                unit,
                "Dropping nutrient with unrecognised unit"
            );
            continue;
        };

        let is_secondary_sugar = target == Target::Macro(MacroField::Sugar)
            && nutrient.nutrient_id != FDC_TOTAL_SUGARS
            && profile.macros.sugar_g.is_some();
        if !is_secondary_sugar {
            store(&mut profile, target, converted);
        }
    }

    profile
}

fn fdc_serving_size(food: &FdcFood) -> Option<String> {
    match (food.serving_size, non_empty(food.serving_size_unit.as_deref())) {
        (Some(size), Some(unit)) => Some(format!("{size} {}", unit.to_lowercase())),
        _ => non_empty(food.household_serving_full_text.as_deref()).map(str::to_owned),
    }
}

fn normalize_food_data_central(food: &FdcFood) -> RecordDraft {
    let description = non_empty(food.brand_owner.as_deref())
        .or_else(|| non_empty(food.brand_name.as_deref()))
        .unwrap_or_default()
        .to_owned();

    RecordDraft {
        name: food.description.trim().to_owned(),
        description,
        nutrients: fdc_nutrients(food),
        ingredients_text: non_empty(food.ingredients.as_deref()).map(str::to_owned),
        allergen_tags: Vec::new(),
        additive_tags: Vec::new(),
        source: ProviderTag::FoodDataCentral,
    }
}
