// ABOUTME: Integration tests for the reconciliation state machine over scripted providers
// ABOUTME: Covers confirmation policy, fallback chain, ranking, hybrid merge and unknown records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::{
    engine, engine_with, fdc_ingredients_only, fdc_mayonnaise, off_mayonnaise, off_nutrients_only,
    settings, MAYO_BARCODE, UNKNOWN_BARCODE, WATER_BARCODE,
};
use gutcheck::{AttemptOutcome, DataSource, EngineSettings, NutrientBasis, ProviderTag};
use gutcheck_intelligence::QualityScorer;
use gutcheck_providers::{MockProvider, MockResponse, OffProduct};
use serde_json::json;

fn off() -> MockProvider {
    MockProvider::new(ProviderTag::OpenFoodFacts)
}

fn fdc() -> MockProvider {
    MockProvider::new(ProviderTag::FoodDataCentral)
}

#[tokio::test]
async fn test_secondary_is_consulted_by_default() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_mayonnaise()));
    let secondary = Arc::new(fdc().with_payload(MAYO_BARCODE, fdc_mayonnaise()));
    let engine = engine(primary.clone(), Some(secondary.clone()));

    let outcome = engine.reconcile_outcome(MAYO_BARCODE).await;

    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);
    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.attempts[0].provider, ProviderTag::OpenFoodFacts);
    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Found { score: 27 });
    assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Found { score: 19 });

    let record = outcome.record;
    assert_eq!(record.source(), DataSource::OpenFoodFacts);
    assert_eq!(record.name(), "Real Mayonnaise");
    assert_eq!(record.calories_kcal(), Some(680.0));
    assert_eq!(record.provenance().quality_score, Some(27));
}

#[tokio::test]
async fn test_confirmation_disabled_skips_secondary_after_hit() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_nutrients_only(90.0, 10.0)));
    let secondary = Arc::new(fdc().with_payload(MAYO_BARCODE, fdc_mayonnaise()));
    let engine = engine_with(
        primary.clone(),
        Some(secondary.clone()),
        EngineSettings {
            confirm_with_secondary: false,
            ..settings()
        },
    );

    let record = engine.reconcile(MAYO_BARCODE).await;

    assert_eq!(secondary.calls(), 0);
    assert_eq!(record.source(), DataSource::OpenFoodFacts);
    assert_eq!(record.calories_kcal(), Some(90.0));
}

#[tokio::test]
async fn test_primary_not_found_falls_through_to_secondary() {
    let primary = Arc::new(off());
    let secondary = Arc::new(fdc().with_payload(MAYO_BARCODE, fdc_mayonnaise()));
    let engine = engine_with(
        primary,
        Some(secondary),
        EngineSettings {
            confirm_with_secondary: false,
            ..settings()
        },
    );

    let outcome = engine.reconcile_outcome(MAYO_BARCODE).await;

    assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::NotFound);
    assert_eq!(outcome.record.source(), DataSource::FoodDataCentral);
    assert_eq!(outcome.record.calories_kcal(), Some(714.0));
    assert_eq!(outcome.record.macros().sodium_mg, Some(571.0));
}

#[tokio::test]
async fn test_transient_and_malformed_failures_fall_through() {
    for failure in [
        MockResponse::Transient("HTTP 503".to_owned()),
        MockResponse::Malformed("expected value at line 1".to_owned()),
    ] {
        let primary = Arc::new(off().with_response(MAYO_BARCODE, failure));
        let secondary = Arc::new(fdc().with_payload(MAYO_BARCODE, fdc_mayonnaise()));
        let outcome = engine(primary, Some(secondary))
            .reconcile_outcome(MAYO_BARCODE)
            .await;

        assert!(matches!(
            outcome.attempts[0].outcome,
            AttemptOutcome::Failed {
                kind: "transient" | "malformed_response"
            }
        ));
        assert_eq!(outcome.record.source(), DataSource::FoodDataCentral);
    }
}

#[tokio::test]
async fn test_higher_score_with_nutrients_donates_nutrients() {
    // FDC scores 19, the nutrients-only OFF record scores 2
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_nutrients_only(90.0, 10.0)));
    let secondary = Arc::new(fdc().with_payload(MAYO_BARCODE, fdc_mayonnaise()));

    let record = engine(primary, Some(secondary)).reconcile(MAYO_BARCODE).await;

    assert_eq!(record.source(), DataSource::FoodDataCentral);
    assert_eq!(record.calories_kcal(), Some(714.0));
    assert_eq!(record.macros().fat_g, Some(78.6));
}

#[tokio::test]
async fn test_hybrid_merge_of_nutrients_and_ingredients() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_nutrients_only(90.0, 10.0)));
    let secondary = Arc::new(
        fdc().with_payload(MAYO_BARCODE, fdc_ingredients_only("soybean oil, eggs")),
    );

    let record = engine(primary, Some(secondary)).reconcile(MAYO_BARCODE).await;

    assert_eq!(record.source(), DataSource::Hybrid);
    assert_eq!(record.calories_kcal(), Some(90.0));
    assert_eq!(record.macros().fat_g, Some(10.0));
    assert_eq!(record.name(), "Mayonnaise");
    assert_eq!(
        record.allergens().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Eggs", "Soy"]
    );
    assert_eq!(record.ingredients(), ["soybean oil", "eggs"]);

    let provenance = record.provenance();
    assert_eq!(provenance.nutrition_from, Some(ProviderTag::OpenFoodFacts));
    assert_eq!(provenance.categories_from, Some(ProviderTag::FoodDataCentral));
    assert_eq!(provenance.quality_score, Some(QualityScorer::score(&record)));
}

#[tokio::test]
async fn test_hybrid_borrows_name_when_nutrition_donor_has_none() {
    let nameless: OffProduct = serde_json::from_value(json!({
        "code": MAYO_BARCODE,
        "allergens_tags": ["en:milk"],
        "nutriments": { "energy-kcal_100g": 680, "fat_100g": 75 }
    }))
    .unwrap();
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, nameless));
    let secondary = Arc::new(
        fdc().with_payload(MAYO_BARCODE, fdc_ingredients_only("soybean oil, eggs")),
    );

    let record = engine(primary, Some(secondary)).reconcile(MAYO_BARCODE).await;

    assert_eq!(record.source(), DataSource::Hybrid);
    assert_eq!(record.name(), "MAYONNAISE");
    assert!(!record.description().is_empty());
    assert_eq!(record.calories_kcal(), Some(680.0));
    assert_eq!(
        record.allergens().iter().map(String::as_str).collect::<Vec<_>>(),
        vec!["Dairy", "Eggs", "Soy"]
    );
}

#[tokio::test]
async fn test_equal_scores_favour_primary() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_nutrients_only(90.0, 10.0)));
    let secondary = Arc::new(fdc().with_payload(
        MAYO_BARCODE,
        gutcheck_providers::FdcFood {
            food_nutrients: vec![
                common::nutrient(1008, "KCAL", 714.0),
                common::nutrient(1004, "G", 78.6),
            ],
            ingredients: None,
            ..fdc_mayonnaise()
        },
    ));

    let record = engine(primary, Some(secondary)).reconcile(MAYO_BARCODE).await;

    assert_eq!(record.source(), DataSource::OpenFoodFacts);
    assert_eq!(record.calories_kcal(), Some(90.0));
}

#[tokio::test]
async fn test_static_fixture_when_every_provider_fails() {
    let primary = Arc::new(off().with_default(MockResponse::Transient("down".to_owned())));
    let secondary = Arc::new(fdc());

    let record = engine(primary, Some(secondary)).reconcile(MAYO_BARCODE).await;

    assert_eq!(record.source(), DataSource::StaticTable);
    assert_eq!(record.calories_kcal(), Some(90.0));
    assert_eq!(record.macros().fat_g, Some(10.0));
    assert_eq!(record.basis(), NutrientBasis::PerServing);
    assert!(record.allergens().contains("Eggs"));
}

#[tokio::test]
async fn test_water_fixture_keeps_zero_calories() {
    let record = engine(Arc::new(off()), Some(Arc::new(fdc())))
        .reconcile(WATER_BARCODE)
        .await;

    assert_eq!(record.source(), DataSource::StaticTable);
    assert_eq!(record.calories_kcal(), Some(0.0));
}

#[tokio::test]
async fn test_unknown_product_when_nothing_matches() {
    let primary = Arc::new(off());
    let secondary = Arc::new(fdc());
    let outcome = engine(primary.clone(), Some(secondary.clone()))
        .reconcile_outcome(UNKNOWN_BARCODE)
        .await;

    assert_eq!(primary.calls(), 1);
    assert_eq!(secondary.calls(), 1);
    let record = outcome.record;
    assert_eq!(record.source(), DataSource::None);
    assert_eq!(record.name(), "Unknown Product");
    assert!(record.description().contains(UNKNOWN_BARCODE));
    assert!(record.is_empty());
    assert!(!record.has_nutrients());
    assert!(record.allergens().is_empty());
}

#[tokio::test]
async fn test_all_zero_barcode_is_unknown() {
    let outcome = engine(Arc::new(off()), Some(Arc::new(fdc())))
        .reconcile_outcome("000000000000")
        .await;

    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.record.source(), DataSource::None);
    assert_eq!(outcome.record.name(), "Unknown Product");
    assert!(outcome.record.description().contains("000000000000"));
    assert!(outcome.record.is_empty());
}

#[tokio::test]
async fn test_blank_identifier_skips_providers() {
    let primary = Arc::new(off());
    let secondary = Arc::new(fdc());
    let outcome = engine(primary.clone(), Some(secondary.clone()))
        .reconcile_outcome("   ")
        .await;

    assert_eq!(primary.calls(), 0);
    assert_eq!(secondary.calls(), 0);
    assert!(outcome.attempts.is_empty());
    assert_eq!(outcome.record.source(), DataSource::None);
}

#[tokio::test]
async fn test_free_text_query_is_trimmed() {
    let primary = Arc::new(off().with_payload("greek yogurt", off_nutrients_only(59.0, 0.4)));
    let record = engine(primary, None).reconcile("  greek yogurt ").await;

    assert_eq!(record.source(), DataSource::OpenFoodFacts);
    assert_eq!(record.provenance().barcode_or_query, "greek yogurt");
}

#[tokio::test]
async fn test_single_provider_engine() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_mayonnaise()));
    let outcome = engine(primary, None).reconcile_outcome(MAYO_BARCODE).await;

    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.record.source(), DataSource::OpenFoodFacts);
}

#[tokio::test]
async fn test_records_are_fresh_per_lookup() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_mayonnaise()));
    let engine = engine(primary, None);

    let first = engine.reconcile(MAYO_BARCODE).await;
    let second = engine.reconcile(MAYO_BARCODE).await;

    assert_eq!(first.name(), second.name());
    assert_eq!(first.ingredients(), second.ingredients());
    assert!(first.provenance().retrieved_at <= second.provenance().retrieved_at);
}

#[tokio::test]
async fn test_record_serializes_with_provenance() {
    let primary = Arc::new(off().with_payload(MAYO_BARCODE, off_mayonnaise()));
    let record = engine(primary, None).reconcile(MAYO_BARCODE).await;

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["name"], "Real Mayonnaise");
    assert_eq!(json["provenance"]["source"], "open_food_facts");
    assert_eq!(json["provenance"]["barcodeOrQuery"], MAYO_BARCODE);
    assert!(json["allergens"].as_array().is_some_and(|a| !a.is_empty()));
}
