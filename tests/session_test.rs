// ABOUTME: Meal session tests over reconciled fixture records
// ABOUTME: Covers serving-scaled totals, allergen union, editing, save and cancel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{classifier, MAYO_BARCODE, WATER_BARCODE};
use gutcheck::reconciliation::fallback_record;
use gutcheck::{MealSession, NutritionRecord, SessionError};

fn mayonnaise() -> NutritionRecord {
    fallback_record(MAYO_BARCODE, &classifier()).unwrap()
}

fn water() -> NutritionRecord {
    fallback_record(WATER_BARCODE, &classifier()).unwrap()
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[test]
fn test_totals_scale_with_servings() {
    let mut meal = MealSession::new("sandwich");
    meal.add(mayonnaise(), 2.0).unwrap();
    meal.add(water(), 1.0).unwrap();

    let totals = meal.totals();

    assert_eq!(totals.item_count, 2);
    assert_eq!(totals.items_without_calories, 0);
    assert!(close(totals.calories_kcal, 180.0));
    assert!(close(totals.fat_g, 20.0));
    assert!(close(totals.sodium_mg, 140.0));
    assert!(close(totals.protein_g, 0.0));
}

#[test]
fn test_allergens_are_the_union_of_items() {
    let mut meal = MealSession::new("sandwich");
    meal.add(water(), 1.0).unwrap();
    assert!(meal.allergens().is_empty());

    meal.add(mayonnaise(), 0.5).unwrap();
    let allergens: Vec<String> = meal.allergens().into_iter().collect();

    assert_eq!(allergens, ["Eggs", "Soy"]);
}

#[test]
fn test_editing_items() {
    let mut meal = MealSession::new("salad");
    let mayo = meal.add(mayonnaise(), 1.0).unwrap();
    let water = meal.add(water(), 1.0).unwrap();

    meal.set_servings(mayo, 3.0).unwrap();
    assert!(close(meal.totals().calories_kcal, 270.0));
    assert_eq!(
        meal.set_servings(mayo, -1.0),
        Err(SessionError::InvalidServings(-1.0))
    );

    let removed = meal.remove(mayo).unwrap();
    assert_eq!(removed.record().name(), "Real Mayonnaise");
    assert!(close(removed.servings(), 3.0));
    assert_eq!(meal.items().len(), 1);
    assert_eq!(meal.items()[0].id(), water);
    assert_eq!(meal.remove(mayo).err(), Some(SessionError::UnknownItem(mayo)));
}

#[test]
fn test_save_consumes_session() {
    let mut meal = MealSession::new("breakfast");
    let id = meal.id();
    let started_at = meal.started_at();
    meal.add(mayonnaise(), 1.0).unwrap();

    let saved = meal.save();

    assert_eq!(saved.id, id);
    assert_eq!(saved.name, "breakfast");
    assert!(saved.saved_at >= started_at);
    assert_eq!(saved.items.len(), 1);
    assert!(close(saved.totals.calories_kcal, 90.0));
    assert!(saved.allergens.contains("Eggs"));

    let json = serde_json::to_value(&saved).unwrap();
    assert_eq!(json["name"], "breakfast");
    assert_eq!(json["totals"]["itemCount"], 1);
    assert_eq!(json["items"][0]["servings"], 1.0);
    assert_eq!(json["items"][0]["record"]["name"], "Real Mayonnaise");
}

#[test]
fn test_sessions_are_independent() {
    let mut lunch = MealSession::new("lunch");
    let dinner = MealSession::new("dinner");
    lunch.add(mayonnaise(), 1.0).unwrap();

    assert_ne!(lunch.id(), dinner.id());
    assert!(dinner.is_empty());
    assert!(!lunch.is_empty());

    dinner.cancel();
    assert_eq!(lunch.items().len(), 1);
}
