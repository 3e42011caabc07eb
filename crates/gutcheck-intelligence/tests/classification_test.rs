// ABOUTME: Property-style tests for the text classifier over realistic ingredient statements
// ABOUTME: Checks partition round-trips, precedence stability, and custom table files
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::collections::BTreeSet;
use std::io::Write;

use gutcheck_core::{
    AllergenTier, Categorize, IngredientCategory, ProviderTag, RecordDraft,
};
use gutcheck_intelligence::{risk_score, ClassificationTables, QualityScorer, TextClassifier};

const STATEMENTS: [&str; 4] = [
    "Water, Soybean Oil, Whole Eggs, Vinegar, Egg Yolks, Salt, Sugar, Lemon Juice Concentrate, \
     Calcium Disodium EDTA (Used to Protect Quality), Natural Flavors",
    "Enriched Wheat Flour [Flour, Niacin, Reduced Iron, Thiamine Mononitrate (Vitamin B1)], \
     Sugar, Cocoa Butter, Whole Milk Powder, Soy Lecithin, Vanilla",
    "Oats, Peanut Butter (Peanuts, Salt), Honey & Almonds; Contains less than 2% of Sea Salt",
    "Rice, Chicken Broth, Carrots, Onions, Garlic, Spices, Potassium Sorbate and Xanthan Gum",
];

fn classifier() -> TextClassifier {
    TextClassifier::new(ClassificationTables::embedded().unwrap())
}

fn draft(statement: &str) -> RecordDraft {
    let mut draft = RecordDraft::empty(ProviderTag::OpenFoodFacts);
    draft.name = "Test product".to_owned();
    draft.ingredients_text = Some(statement.to_owned());
    draft
}

#[test]
fn test_derived_maps_partition_flat_lists() {
    let classifier = classifier();
    for statement in STATEMENTS {
        let record = classifier.enrich(draft(statement), "test");

        let mut flattened: Vec<&String> = record
            .ingredients_by_category()
            .values()
            .flat_map(BTreeSet::iter)
            .collect();
        let mut original: Vec<&String> = record.ingredients().iter().collect();
        flattened.sort();
        original.sort();
        assert_eq!(flattened, original, "ingredient partition for {statement}");

        let allergens: BTreeSet<&String> = record
            .allergens_by_severity()
            .values()
            .flat_map(BTreeSet::iter)
            .collect();
        let expected: BTreeSet<&String> = record.allergens().iter().collect();
        assert_eq!(allergens, expected);

        let additive_count: usize = record.additives_by_type().values().map(BTreeSet::len).sum();
        assert_eq!(additive_count, record.additives().len());
    }
}

#[test]
fn test_grain_and_dairy_keywords_resolve_to_grains() {
    let classifier = classifier();
    for ingredient in ["wheat flour and milk blend", "oat milk", "rice cream", "barley milk drink"] {
        assert_eq!(
            classifier.ingredient_category(ingredient),
            IngredientCategory::Grains,
            "{ingredient}"
        );
    }
}

#[test]
fn test_chocolate_statement_allergens() {
    let record = classifier().enrich(draft(STATEMENTS[1]), "chocolate");
    let allergens = record.allergens();
    assert!(allergens.contains("Wheat"));
    assert!(allergens.contains("Dairy"));
    assert!(allergens.contains("Soy"));
    assert!(record.additives().contains(&"Lecithins (E322)".to_owned()));
    assert!(!record.ingredients().iter().any(|i| i.contains("niacin")));
}

#[test]
fn test_allergens_nested_in_sub_ingredient_groups() {
    let statement = "Sugar, Chocolate Chips (Sugar, Chocolate Liquor, Cocoa Butter, Milk Fat, \
                     Soy Lecithin), Natural Flavor (Milk), Enriched Flour (Wheat Flour, Niacin)";
    let mut fdc_draft = draft(statement);
    fdc_draft.source = ProviderTag::FoodDataCentral;

    let record = classifier().enrich(fdc_draft, "cookies");

    assert_eq!(
        record.ingredients(),
        ["sugar", "chocolate chips", "natural flavor", "enriched flour"]
    );
    let allergens: Vec<&str> = record.allergens().iter().map(String::as_str).collect();
    assert_eq!(allergens, ["Dairy", "Soy", "Wheat"]);
    assert!(record.additives().contains(&"Lecithins (E322)".to_owned()));
}

#[test]
fn test_granola_statement_excludes_peanut_butter_dairy() {
    let record = classifier().enrich(draft(STATEMENTS[2]), "granola");
    let allergens = record.allergens();
    assert!(allergens.contains("Peanuts"));
    assert!(allergens.contains("Tree Nuts"));
    assert!(!allergens.contains("Dairy"));
    assert_eq!(
        record.ingredients(),
        ["oats", "peanut butter", "honey", "almonds", "sea salt"]
    );
}

#[test]
fn test_risk_and_quality_for_mayonnaise() {
    let record = classifier().enrich(draft(STATEMENTS[0]), "041220120000");
    let risk = risk_score(record.allergens_by_severity());
    // Eggs and Soy are both big-nine allergens
    assert_eq!(risk.major, 2);
    assert_eq!(risk.score, 6);
    assert_eq!(
        record
            .allergens_by_severity()
            .get(&AllergenTier::Major)
            .map(BTreeSet::len),
        Some(2)
    );
    // ingredients + additives + allergens, no nutrients
    assert_eq!(QualityScorer::score(&record), 20);
}

#[test]
fn test_custom_table_file_changes_classification() {
    let embedded = ClassificationTables::embedded().unwrap();
    let mut json: serde_json::Value =
        serde_json::from_str(include_str!("../data/classification_tables.json")).unwrap();
    json["allergen_tiers"]["common"]
        .as_array_mut()
        .unwrap()
        .push(serde_json::Value::String("Mustard".to_owned()));

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.to_string().as_bytes()).unwrap();

    let custom = TextClassifier::new(ClassificationTables::from_path(file.path()).unwrap());
    let default = TextClassifier::new(embedded);
    assert_eq!(default.allergen_tier("Mustard"), AllergenTier::Mild);
    assert_eq!(custom.allergen_tier("Mustard"), AllergenTier::Common);
}
