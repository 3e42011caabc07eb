// ABOUTME: Canonical nutrition data model shared by every GutCheck crate
// ABOUTME: Re-exports nutrient, category, provenance, query and record types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Models
//!
//! The record shape is the same whichever provider produced it. Providers
//! produce a [`RecordDraft`]; only [`NutritionRecord`] constructors turn a draft
//! into the immutable record callers receive.

mod categories;
mod nutrients;
mod provenance;
mod query;
mod record;

pub use categories::{
    partition, AdditiveType, AllergenTier, Categorize, CategoryMap, IngredientCategory,
};
pub use nutrients::{
    is_valid_amount, Macros, NutrientBasis, NutrientKey, NutrientProfile, NutrientUnit,
};
pub use provenance::{DataSource, Provenance, ProviderTag};
pub use query::LookupQuery;
pub use record::{CategoricalData, NutritionRecord, RecordDraft};
