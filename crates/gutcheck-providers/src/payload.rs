// ABOUTME: Provider-native payload types exactly as Open Food Facts and FoodData Central return them
// ABOUTME: No field renaming or unit conversion happens here; see the normalizer for that
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::collections::BTreeMap;

use gutcheck_core::ProviderTag;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A successful provider response in the provider's own schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", content = "product", rename_all = "snake_case")]
pub enum RawPayload {
    /// Open Food Facts product
    OpenFoodFacts(Box<OffProduct>),
    /// `FoodData` Central branded food
    FoodDataCentral(Box<FdcFood>),
}

impl RawPayload {
    /// Provider that produced this payload
    #[must_use]
    pub const fn provider(&self) -> ProviderTag {
        match self {
            Self::OpenFoodFacts(_) => ProviderTag::OpenFoodFacts,
            Self::FoodDataCentral(_) => ProviderTag::FoodDataCentral,
        }
    }
}

impl From<OffProduct> for RawPayload {
    fn from(product: OffProduct) -> Self {
        Self::OpenFoodFacts(Box::new(product))
    }
}

impl From<FdcFood> for RawPayload {
    fn from(food: FdcFood) -> Self {
        Self::FoodDataCentral(Box::new(food))
    }
}

/// Open Food Facts product object
///
/// `nutriments` values are usually numbers but older products store numeric
/// strings, so they are kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OffProduct {
    /// Barcode
    #[serde(default)]
    pub code: Option<String>,
    /// Product name in the requested language
    #[serde(default)]
    pub product_name: Option<String>,
    /// English product name
    #[serde(default)]
    pub product_name_en: Option<String>,
    /// Generic name ("Mayonnaise")
    #[serde(default)]
    pub generic_name: Option<String>,
    /// Comma-separated brand list
    #[serde(default)]
    pub brands: Option<String>,
    /// Ingredient statement
    #[serde(default)]
    pub ingredients_text: Option<String>,
    /// English ingredient statement
    #[serde(default)]
    pub ingredients_text_en: Option<String>,
    /// Allergen taxonomy tags (`en:milk`)
    #[serde(default)]
    pub allergens_tags: Vec<String>,
    /// Additive taxonomy tags (`en:e322`)
    #[serde(default)]
    pub additives_tags: Vec<String>,
    /// Labelled serving size ("15 g")
    #[serde(default)]
    pub serving_size: Option<String>,
    /// Nutrient values keyed `<name>_100g`, `<name>_unit`, …
    #[serde(default)]
    pub nutriments: BTreeMap<String, Value>,
}

/// Open Food Facts product endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct OffProductResponse {
    /// 1 when found, 0 when not
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub product: Option<OffProduct>,
}

/// Open Food Facts search endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct OffSearchResponse {
    #[serde(default)]
    pub products: Vec<OffProduct>,
}

/// `FoodData` Central branded food from the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcFood {
    /// `FoodData` Central ID
    pub fdc_id: u64,
    /// Food description (product name)
    #[serde(default)]
    pub description: String,
    /// Data type ("Branded")
    #[serde(default)]
    pub data_type: Option<String>,
    /// GTIN/UPC barcode
    #[serde(default)]
    pub gtin_upc: Option<String>,
    /// Brand owner
    #[serde(default)]
    pub brand_owner: Option<String>,
    /// Brand name
    #[serde(default)]
    pub brand_name: Option<String>,
    /// Ingredient statement, typically upper-case
    #[serde(default)]
    pub ingredients: Option<String>,
    /// Serving size amount
    #[serde(default)]
    pub serving_size: Option<f64>,
    /// Serving size unit ("g", "ml")
    #[serde(default)]
    pub serving_size_unit: Option<String>,
    /// Household serving text ("1 Tbsp")
    #[serde(default)]
    pub household_serving_full_text: Option<String>,
    /// Nutrient values per 100 g
    #[serde(default)]
    pub food_nutrients: Vec<FdcNutrient>,
}

/// One nutrient row of a `FoodData` Central search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FdcNutrient {
    /// Nutrient ID (1008 energy, 1003 protein, …)
    pub nutrient_id: u32,
    /// Nutrient name
    #[serde(default)]
    pub nutrient_name: Option<String>,
    /// Unit of `value` ("G", "MG", "UG", "KCAL", "kJ")
    #[serde(default)]
    pub unit_name: Option<String>,
    /// Amount per 100 g
    #[serde(default)]
    pub value: Option<f64>,
}

/// `FoodData` Central search endpoint response
#[derive(Debug, Deserialize)]
pub(crate) struct FdcSearchResponse {
    #[serde(default)]
    pub foods: Vec<FdcFood>,
}
