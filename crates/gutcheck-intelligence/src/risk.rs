// ABOUTME: Allergen risk score weighted by severity tier
// ABOUTME: score = 3 x Major + 2 x Common + 1 x Mild
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use gutcheck_core::{AllergenTier, CategoryMap, NutritionRecord};
use serde::Serialize;

/// Allergen counts per tier and the weighted score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenRisk {
    /// Weighted score
    pub score: u32,
    /// Major-tier allergens
    pub major: u32,
    /// Common-tier allergens
    pub common: u32,
    /// Mild-tier allergens
    pub mild: u32,
}

impl AllergenRisk {
    /// Risk of a record's allergens
    #[must_use]
    pub fn of(record: &NutritionRecord) -> Self {
        risk_score(record.allergens_by_severity())
    }
}

/// Weighted allergen risk from a severity map
#[must_use]
pub fn risk_score(allergens_by_severity: &CategoryMap<AllergenTier>) -> AllergenRisk {
    let count = |tier: AllergenTier| {
        allergens_by_severity
            .get(&tier)
            .map_or(0, |entries| u32::try_from(entries.len()).unwrap_or(u32::MAX))
    };
    let (major, common, mild) = (
        count(AllergenTier::Major),
        count(AllergenTier::Common),
        count(AllergenTier::Mild),
    );
    let score = AllergenTier::ALL
        .into_iter()
        .map(|tier| tier.weight().saturating_mul(count(tier)))
        .fold(0_u32, u32::saturating_add);
    AllergenRisk {
        score,
        major,
        common,
        mild,
    }
}
