// ABOUTME: Nutrition provider clients and the normalizer that maps their schemas onto one draft
// ABOUTME: Open Food Facts and USDA FoodData Central behind the ProviderClient trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![deny(unsafe_code)]

//! # GutCheck Providers
//!
//! Every external nutrition database sits behind [`ProviderClient`]. A client
//! only fetches and decodes; it returns the provider's own schema wrapped in a
//! [`RawPayload`]. [`normalize`] is the single place where provider field
//! names, units and energy conventions are mapped onto a
//! [`gutcheck_core::RecordDraft`].

/// Provider client trait
pub mod client;
/// USDA `FoodData` Central client
pub mod food_data_central;
/// Shared HTTP client and error mapping
pub mod http_client;
/// Scripted in-memory provider
pub mod mock;
/// Provider schema to draft mapping
pub mod normalizer;
/// Open Food Facts client
pub mod open_food_facts;
/// Provider-native payload types
pub mod payload;

pub use client::ProviderClient;
pub use food_data_central::{FoodDataCentralClient, FoodDataCentralConfig};
pub use http_client::{initialize_shared_client, shared_client};
pub use mock::{MockProvider, MockResponse};
pub use normalizer::normalize;
pub use open_food_facts::{OpenFoodFactsClient, OpenFoodFactsConfig};
pub use payload::{FdcFood, FdcNutrient, OffProduct, RawPayload};
