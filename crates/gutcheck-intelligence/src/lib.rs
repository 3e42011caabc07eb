// ABOUTME: Nutrition intelligence for GutCheck: classification, quality scoring, and risk
// ABOUTME: Turns raw ingredient, allergen and additive text into categorized record data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![deny(unsafe_code)]

//! # GutCheck Intelligence
//!
//! - **classifier**: `TextClassifier`, which parses ingredient statements and
//!   provider tags and files every entry into one category
//! - **tables**: the keyword tables driving the classifier, loaded from JSON
//! - **scorer**: deterministic record quality score used to rank candidates
//! - **risk**: allergen risk score from severity tiers
//! - **estimation**: caller-invoked Atwater calorie estimate

/// Ingredient, allergen and additive text classification
pub mod classifier;
/// Caller-invoked calorie estimation
pub mod estimation;
/// Allergen risk score
pub mod risk;
/// Record quality scoring
pub mod scorer;
/// Keyword tables
pub mod tables;

mod text;

pub use classifier::TextClassifier;
pub use estimation::{calorie_value, estimate_calories, CalorieValue};
pub use risk::{risk_score, AllergenRisk};
pub use scorer::{QualityBreakdown, QualityScorer};
pub use tables::ClassificationTables;
