// ABOUTME: Shared test utilities for reconciliation engine integration tests
// ABOUTME: Builds provider payload fixtures, scripted mock providers and engines over them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn
)]
//! Shared test utilities for `gutcheck`

use std::sync::{Arc, Once};
use std::time::Duration;

use gutcheck::{EngineSettings, ReconciliationEngine};
use gutcheck_intelligence::{ClassificationTables, TextClassifier};
use gutcheck_providers::{FdcFood, FdcNutrient, MockProvider, OffProduct, ProviderClient};
use serde_json::json;

/// Barcode of the mayonnaise fixture in the static fallback table
pub const MAYO_BARCODE: &str = "041220120000";

/// Barcode of the spring water fixture
pub const WATER_BARCODE: &str = "012345678905";

/// Barcode no provider and no fixture knows
pub const UNKNOWN_BARCODE: &str = "000000000017";

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

pub fn classifier() -> Arc<TextClassifier> {
    Arc::new(TextClassifier::new(
        ClassificationTables::embedded().unwrap(),
    ))
}

pub fn settings() -> EngineSettings {
    EngineSettings {
        provider_timeout: Duration::from_secs(5),
        ..EngineSettings::default()
    }
}

/// Engine over explicit providers with the given settings
pub fn engine_with(
    primary: Arc<MockProvider>,
    secondary: Option<Arc<MockProvider>>,
    settings: EngineSettings,
) -> ReconciliationEngine {
    init_test_logging();
    ReconciliationEngine::new(
        primary,
        secondary.map(|mock| mock as Arc<dyn ProviderClient>),
        classifier(),
        settings,
    )
}

/// Engine with default test settings
pub fn engine(
    primary: Arc<MockProvider>,
    secondary: Option<Arc<MockProvider>>,
) -> ReconciliationEngine {
    engine_with(primary, secondary, settings())
}

/// Open Food Facts product with rich categorical data
pub fn off_mayonnaise() -> OffProduct {
    serde_json::from_value(json!({
        "code": MAYO_BARCODE,
        "product_name": "Real Mayonnaise",
        "brands": "Hellmann's",
        "ingredients_text": "Soybean oil, water, whole eggs, vinegar, egg yolks, salt, sugar, \
                             lemon juice concentrate, calcium disodium EDTA",
        "allergens_tags": ["en:eggs"],
        "additives_tags": ["en:e385"],
        "nutriments": {
            "energy-kcal_100g": 680,
            "fat_100g": 75,
            "saturated-fat_100g": 11,
            "carbohydrates_100g": 0.6,
            "sugars_100g": 0.6,
            "proteins_100g": 1.1,
            "salt_100g": 1.5
        }
    }))
    .unwrap()
}

/// Open Food Facts product with nutrients only
pub fn off_nutrients_only(calories: f64, fat: f64) -> OffProduct {
    serde_json::from_value(json!({
        "code": MAYO_BARCODE,
        "product_name": "Mayonnaise",
        "nutriments": {
            "energy-kcal_100g": calories,
            "fat_100g": fat
        }
    }))
    .unwrap()
}

/// `FoodData` Central food with the given ingredient statement and no nutrients
pub fn fdc_ingredients_only(ingredients: &str) -> FdcFood {
    FdcFood {
        fdc_id: 2_041_155,
        description: "MAYONNAISE".to_owned(),
        data_type: Some("Branded".to_owned()),
        gtin_upc: Some(MAYO_BARCODE.to_owned()),
        brand_owner: Some("Unilever".to_owned()),
        ingredients: Some(ingredients.to_owned()),
        ..FdcFood::default()
    }
}

/// `FoodData` Central food with a few nutrients and a short ingredient list
pub fn fdc_mayonnaise() -> FdcFood {
    FdcFood {
        food_nutrients: vec![
            nutrient(1008, "KCAL", 714.0),
            nutrient(1004, "G", 78.6),
            nutrient(1003, "G", 0.0),
            nutrient(1093, "MG", 571.0),
        ],
        ..fdc_ingredients_only("SOYBEAN OIL, WATER, EGG YOLKS, VINEGAR")
    }
}

pub fn nutrient(nutrient_id: u32, unit: &str, value: f64) -> FdcNutrient {
    FdcNutrient {
        nutrient_id,
        nutrient_name: None,
        unit_name: Some(unit.to_owned()),
        value: Some(value),
    }
}
