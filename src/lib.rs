// ABOUTME: Main library entry point for the GutCheck nutrition reconciliation engine
// ABOUTME: Wires provider clients, classification and scoring into one lookup operation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![deny(unsafe_code)]

//! # GutCheck
//!
//! Given a barcode or a free-text food query, GutCheck asks several
//! independent nutrition databases, normalizes their answers into one
//! canonical [`NutritionRecord`], ranks them with a deterministic quality
//! score and merges the best parts into a single result.
//!
//! ## Architecture
//!
//! - **`gutcheck-core`**: record model, error taxonomy, constants
//! - **`gutcheck-providers`**: Open Food Facts and USDA `FoodData` Central
//!   clients plus the field normalizer
//! - **`gutcheck-intelligence`**: ingredient/allergen/additive classifier,
//!   quality scorer, allergen risk
//! - **this crate**: the [`ReconciliationEngine`], its static fallback table,
//!   environment configuration, logging and the [`MealSession`] accumulator
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gutcheck::{GutcheckConfig, ReconciliationEngine};
//!
//! # async fn run() -> Result<(), gutcheck::ConfigError> {
//! let config = GutcheckConfig::from_env()?;
//! let engine = ReconciliationEngine::from_config(&config)?;
//! let record = engine.reconcile("041220120000").await;
//! println!("{} ({:?})", record.name(), record.source());
//! # Ok(())
//! # }
//! ```

/// Environment-driven startup configuration
pub mod config;

/// Structured logging setup and lookup event helpers
pub mod logging;

/// Multi-provider lookup, ranking and merge
pub mod reconciliation;

/// Caller-owned meal accumulator
pub mod session;

pub use config::GutcheckConfig;
pub use reconciliation::{
    AttemptOutcome, EngineSettings, ProviderAttempt, ReconciliationEngine, ReconciliationOutcome,
};
pub use session::{ItemId, MealItem, MealSession, MealTotals, SavedMeal, SessionError};

pub use gutcheck_core::{
    AdditiveType, AllergenTier, ConfigError, DataSource, IngredientCategory, LookupQuery,
    NutrientBasis, NutrientKey, NutritionRecord, Provenance, ProviderError, ProviderTag,
};
