// ABOUTME: Caller-owned meal session accumulating reconciled records with serving counts
// ABOUTME: Computes scaled nutrient totals and the allergen union; save or cancel consume it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Meal Session
//!
//! A meal under construction is a plain value owned by whoever builds it.
//! There is no process-wide "current meal": two sessions never share state,
//! and finishing one (`save` or `cancel`) consumes it.
//!
//! Servings are multiples of each record's nutrient basis, so one serving of
//! a per-100 g record is 100 g and one serving of a per-serving record is the
//! labelled serving.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use gutcheck_core::{is_valid_amount, NutritionRecord};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Identifier of one item within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Session operation errors
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// Servings must be finite and greater than zero
    #[error("Invalid serving count: {0}")]
    InvalidServings(f64),
    /// No item with this id in the session
    #[error("No item {0} in this meal")]
    UnknownItem(ItemId),
}

/// One record in a meal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealItem {
    id: ItemId,
    record: NutritionRecord,
    servings: f64,
}

impl MealItem {
    /// Item id
    #[must_use]
    pub const fn id(&self) -> ItemId {
        self.id
    }

    /// The reconciled record
    #[must_use]
    pub const fn record(&self) -> &NutritionRecord {
        &self.record
    }

    /// Serving multiplier
    #[must_use]
    pub const fn servings(&self) -> f64 {
        self.servings
    }
}

/// Summed nutrients of a meal
///
/// Each total covers the items that report that value; unknown values are
/// skipped, never counted as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealTotals {
    /// Energy in kilocalories
    pub calories_kcal: f64,
    /// Protein in grams
    pub protein_g: f64,
    /// Carbohydrate in grams
    pub carbs_g: f64,
    /// Fat in grams
    pub fat_g: f64,
    /// Fiber in grams
    pub fiber_g: f64,
    /// Sugars in grams
    pub sugar_g: f64,
    /// Sodium in milligrams
    pub sodium_mg: f64,
    /// Number of items in the meal
    pub item_count: usize,
    /// Items whose calories are unknown
    pub items_without_calories: usize,
}

/// A finished meal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedMeal {
    /// Session id
    pub id: Uuid,
    /// Meal name
    pub name: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// When the session was saved
    pub saved_at: DateTime<Utc>,
    /// Items in insertion order
    pub items: Vec<MealItem>,
    /// Nutrient totals at save time
    pub totals: MealTotals,
    /// Union of item allergens
    pub allergens: BTreeSet<String>,
}

/// Meal under construction
#[derive(Debug, Clone)]
pub struct MealSession {
    id: Uuid,
    name: String,
    started_at: DateTime<Utc>,
    items: Vec<MealItem>,
}

fn check_servings(servings: f64) -> Result<f64, SessionError> {
    if is_valid_amount(servings) && servings > 0.0 {
        Ok(servings)
    } else {
        Err(SessionError::InvalidServings(servings))
    }
}

fn add_scaled(total: &mut f64, value: Option<f64>, servings: f64) {
    if let Some(value) = value {
        *total = value.mul_add(servings, *total);
    }
}

impl MealSession {
    /// Start an empty meal
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            started_at: Utc::now(),
            items: Vec::new(),
        }
    }

    /// Session id
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Meal name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the session started
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Add a record eaten `servings` times
    ///
    /// # Errors
    ///
    /// `InvalidServings` unless `servings` is finite and positive.
    pub fn add(&mut self, record: NutritionRecord, servings: f64) -> Result<ItemId, SessionError> {
        let servings = check_servings(servings)?;
        let id = ItemId(Uuid::new_v4());
        debug!(meal = %self.id, item = %id, product = record.name(), servings, "Added meal item");
        self.items.push(MealItem {
            id,
            record,
            servings,
        });
        Ok(id)
    }

    /// Remove an item, returning it
    ///
    /// # Errors
    ///
    /// `UnknownItem` when the id is not in this session.
    pub fn remove(&mut self, id: ItemId) -> Result<MealItem, SessionError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))?;
        Ok(self.items.remove(index))
    }

    /// Change the serving count of an item
    ///
    /// # Errors
    ///
    /// `InvalidServings` or `UnknownItem`.
    pub fn set_servings(&mut self, id: ItemId, servings: f64) -> Result<(), SessionError> {
        let servings = check_servings(servings)?;
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or(SessionError::UnknownItem(id))?;
        item.servings = servings;
        Ok(())
    }

    /// Items in insertion order
    #[must_use]
    pub fn items(&self) -> &[MealItem] {
        &self.items
    }

    /// True when nothing has been added
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Nutrient totals scaled by servings
    #[must_use]
    pub fn totals(&self) -> MealTotals {
        let mut totals = MealTotals {
            item_count: self.items.len(),
            ..MealTotals::default()
        };
        for item in &self.items {
            let record = &item.record;
            let macros = record.macros();
            if record.calories_kcal().is_none() {
                totals.items_without_calories += 1;
            }
            add_scaled(&mut totals.calories_kcal, record.calories_kcal(), item.servings);
            add_scaled(&mut totals.protein_g, macros.protein_g, item.servings);
            add_scaled(&mut totals.carbs_g, macros.carbs_g, item.servings);
            add_scaled(&mut totals.fat_g, macros.fat_g, item.servings);
            add_scaled(&mut totals.fiber_g, macros.fiber_g, item.servings);
            add_scaled(&mut totals.sugar_g, macros.sugar_g, item.servings);
            add_scaled(&mut totals.sodium_mg, macros.sodium_mg, item.servings);
        }
        totals
    }

    /// Every allergen of every item
    #[must_use]
    pub fn allergens(&self) -> BTreeSet<String> {
        self.items
            .iter()
            .flat_map(|item| item.record.allergens().iter().cloned())
            .collect()
    }

    /// Finish the meal
    #[must_use]
    pub fn save(self) -> SavedMeal {
        let totals = self.totals();
        let allergens = self.allergens();
        debug!(meal = %self.id, items = self.items.len(), "Saved meal");
        SavedMeal {
            id: self.id,
            name: self.name,
            started_at: self.started_at,
            saved_at: Utc::now(),
            items: self.items,
            totals,
            allergens,
        }
    }

    /// Discard the meal
    pub fn cancel(self) {
        debug!(meal = %self.id, items = self.items.len(), "Cancelled meal");
    }
}
