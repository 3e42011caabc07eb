// ABOUTME: Provider identity, record data source, and provenance metadata
// ABOUTME: Records which provider contributed the nutrients and which the categorical data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// An external nutrition data provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderTag {
    /// Open Food Facts community product database
    OpenFoodFacts,
    /// USDA `FoodData` Central branded foods database
    FoodDataCentral,
}

impl ProviderTag {
    /// Stable snake-case name used in configuration and logs
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::OpenFoodFacts => "open_food_facts",
            Self::FoodDataCentral => "food_data_central",
        }
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProviderTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open_food_facts" | "openfoodfacts" | "off" => Ok(Self::OpenFoodFacts),
            "food_data_central" | "fooddatacentral" | "fdc" | "usda" => Ok(Self::FoodDataCentral),
            other => Err(ConfigError::Parse(format!("Unknown provider '{other}'"))),
        }
    }
}

/// Where the fields of a finished record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Every field from Open Food Facts
    OpenFoodFacts,
    /// Every field from `FoodData` Central
    FoodDataCentral,
    /// Nutrients from one provider, categorical data from the other
    Hybrid,
    /// Built-in fixture record for a known identifier
    StaticTable,
    /// No data at all; a placeholder record
    None,
}

impl From<ProviderTag> for DataSource {
    fn from(tag: ProviderTag) -> Self {
        match tag {
            ProviderTag::OpenFoodFacts => Self::OpenFoodFacts,
            ProviderTag::FoodDataCentral => Self::FoodDataCentral,
        }
    }
}

/// Provenance metadata attached to every record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Provenance {
    /// Overall source of the record
    pub source: DataSource,
    /// Identifier the caller looked up
    pub barcode_or_query: String,
    /// Provider that donated the nutrient values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition_from: Option<ProviderTag>,
    /// Provider that donated ingredients, allergens and additives
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories_from: Option<ProviderTag>,
    /// Quality score of the winning candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u32>,
    /// When the record was assembled
    pub retrieved_at: DateTime<Utc>,
}

impl Provenance {
    /// Provenance with the given source and no contributor details
    #[must_use]
    pub fn new(source: DataSource, barcode_or_query: impl Into<String>) -> Self {
        Self {
            source,
            barcode_or_query: barcode_or_query.into(),
            nutrition_from: None,
            categories_from: None,
            quality_score: None,
            retrieved_at: Utc::now(),
        }
    }

    /// Provenance of a record taken entirely from one provider
    #[must_use]
    pub fn single(provider: ProviderTag, barcode_or_query: impl Into<String>) -> Self {
        Self {
            nutrition_from: Some(provider),
            categories_from: Some(provider),
            ..Self::new(provider.into(), barcode_or_query)
        }
    }

    /// Attach the quality score of the selected candidate
    #[must_use]
    pub const fn with_quality_score(mut self, score: u32) -> Self {
        self.quality_score = Some(score);
        self
    }
}
