// ABOUTME: Static fixture table consulted when no provider produced a usable record
// ABOUTME: Builds fresh per-serving records keyed by exact identifier, sourced as StaticTable
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use gutcheck_core::{
    CategoricalData, DataSource, Macros, NutrientBasis, NutrientProfile, NutritionRecord,
    Provenance,
};
use gutcheck_intelligence::{QualityScorer, TextClassifier};

/// One product the engine can answer for without any provider
struct Fixture {
    identifier: &'static str,
    name: &'static str,
    description: &'static str,
    serving_size: &'static str,
    calories_kcal: f64,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    sodium_mg: f64,
    ingredients: &'static [&'static str],
}

const FIXTURES: &[Fixture] = &[
    Fixture {
        identifier: "041220120000",
        name: "Real Mayonnaise",
        description: "Mayonnaise dressing",
        serving_size: "1 tbsp (13 g)",
        calories_kcal: 90.0,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 10.0,
        sodium_mg: 70.0,
        ingredients: &[
            "soybean oil",
            "water",
            "whole eggs",
            "vinegar",
            "egg yolks",
            "salt",
            "sugar",
            "lemon juice concentrate",
            "calcium disodium edta",
        ],
    },
    Fixture {
        identifier: "012345678905",
        name: "Spring Water",
        description: "Natural spring water",
        serving_size: "1 bottle (500 ml)",
        calories_kcal: 0.0,
        protein_g: 0.0,
        carbs_g: 0.0,
        fat_g: 0.0,
        sodium_mg: 0.0,
        ingredients: &["spring water"],
    },
];

/// Identifiers the fixture table can answer for
#[must_use]
pub fn fixture_identifiers() -> Vec<&'static str> {
    FIXTURES.iter().map(|fixture| fixture.identifier).collect()
}

/// Fixture record for `identifier`, if the table has one
///
/// The identifier must match exactly after trimming. Allergens and additives
/// are detected from the fixture's ingredient list with `classifier`, so the
/// record carries the same derived maps a provider record would.
#[must_use]
pub fn fallback_record(identifier: &str, classifier: &TextClassifier) -> Option<NutritionRecord> {
    let identifier = identifier.trim();
    let fixture = FIXTURES
        .iter()
        .find(|fixture| fixture.identifier == identifier)?;

    let ingredients: Vec<String> = fixture
        .ingredients
        .iter()
        .map(|&ingredient| ingredient.to_owned())
        .collect();
    let categorical = CategoricalData {
        allergens: classifier.detect_allergens(&ingredients),
        additives: classifier.detect_additives(&ingredients),
        ingredients,
    };
    let nutrients = NutrientProfile {
        calories_kcal: Some(fixture.calories_kcal),
        macros: Macros {
            protein_g: Some(fixture.protein_g),
            carbs_g: Some(fixture.carbs_g),
            fat_g: Some(fixture.fat_g),
            sodium_mg: Some(fixture.sodium_mg),
            ..Macros::default()
        },
        basis: NutrientBasis::PerServing,
        serving_size: Some(fixture.serving_size.to_owned()),
        ..NutrientProfile::default()
    };

    let record = NutritionRecord::from_parts(
        fixture.name.to_owned(),
        fixture.description.to_owned(),
        nutrients,
        categorical,
        classifier,
        Provenance::new(DataSource::StaticTable, identifier),
    );
    let score = QualityScorer::score(&record);
    Some(record.with_quality_score(score))
}
