// ABOUTME: Core types and constants for the GutCheck nutrition reconciliation engine
// ABOUTME: Foundation crate with the canonical record model, error taxonomy, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![deny(unsafe_code)]

//! # GutCheck Core
//!
//! Foundation crate shared by the provider clients, the text classifier and the
//! reconciliation engine. It changes rarely, so the heavier crates above it
//! compile incrementally.
//!
//! ## Modules
//!
//! - **errors**: `ProviderError` (per-lookup, absorbed by the fallback chain) and
//!   `ConfigError` (fatal, startup only)
//! - **models**: the canonical `NutritionRecord`, its draft form, nutrient keys,
//!   category enums and provenance
//! - **constants**: fixed names, unit factors and timeout bounds

/// Error taxonomy for provider lookups and startup configuration
pub mod errors;

/// Canonical nutrition data model
pub mod models;

/// Application constants organized by domain
pub mod constants;

pub use errors::{ConfigError, FailureKind, ProviderError, ProviderResult};
pub use models::{
    is_valid_amount, AdditiveType, AllergenTier, CategoricalData, Categorize, CategoryMap,
    DataSource, IngredientCategory, LookupQuery, Macros, NutrientBasis, NutrientKey,
    NutrientProfile, NutrientUnit, NutritionRecord, Provenance, ProviderTag, RecordDraft,
};
