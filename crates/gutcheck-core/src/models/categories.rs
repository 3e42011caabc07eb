// ABOUTME: Category enums for ingredients, allergen severity tiers, and additive types
// ABOUTME: Defines the Categorize seam the text classifier implements for record assembly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mapping from a category label to the entries filed under it
pub type CategoryMap<C> = BTreeMap<C, BTreeSet<String>>;

/// Food group of an ingredient
///
/// Declaration order is the precedence order used when an ingredient matches
/// keywords of several groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IngredientCategory {
    /// Cereals, flours, starches
    Grains,
    /// Meat, fish, eggs, legumes, nuts
    Proteins,
    /// Milk and milk products
    Dairy,
    /// Vegetables and alliums
    Vegetables,
    /// Fruits and fruit juices
    Fruits,
    /// Oils and solid fats
    #[serde(rename = "Fats/Oils")]
    FatsOils,
    /// Salt, herbs, spices, seasonings
    Spices,
    /// Anything unmatched (water, additives, …)
    Other,
}

impl IngredientCategory {
    /// Matching precedence, highest first
    pub const PRECEDENCE: [Self; 8] = [
        Self::Grains,
        Self::Proteins,
        Self::Dairy,
        Self::Vegetables,
        Self::Fruits,
        Self::FatsOils,
        Self::Spices,
        Self::Other,
    ];

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grains => "Grains",
            Self::Proteins => "Proteins",
            Self::Dairy => "Dairy",
            Self::Vegetables => "Vegetables",
            Self::Fruits => "Fruits",
            Self::FatsOils => "Fats/Oils",
            Self::Spices => "Spices",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for IngredientCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Clinical/regulatory significance of an allergen
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AllergenTier {
    /// The regulatory "big nine"
    Major,
    /// Gluten, lactose, corn
    Common,
    /// Every other detected allergen
    Mild,
}

impl AllergenTier {
    /// All tiers, most severe first
    pub const ALL: [Self; 3] = [Self::Major, Self::Common, Self::Mild];

    /// Weight of one allergen of this tier in the risk score
    #[must_use]
    pub const fn weight(self) -> u32 {
        match self {
            Self::Major => 3,
            Self::Common => 2,
            Self::Mild => 1,
        }
    }

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Major => "Major",
            Self::Common => "Common",
            Self::Mild => "Mild",
        }
    }
}

impl fmt::Display for AllergenTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Functional type of a food additive
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AdditiveType {
    /// Preservatives and antioxidants
    Preservatives,
    /// Colours
    Colorings,
    /// Flavour enhancers
    #[serde(rename = "Flavor_Enhancers")]
    FlavorEnhancers,
    /// Intense and bulk sweeteners
    Sweeteners,
    /// Emulsifiers, stabilisers, thickeners
    Emulsifiers,
    /// Unmatched additives
    Other,
}

impl AdditiveType {
    /// Keyword matching order
    pub const MATCH_ORDER: [Self; 5] = [
        Self::Preservatives,
        Self::Colorings,
        Self::FlavorEnhancers,
        Self::Sweeteners,
        Self::Emulsifiers,
    ];

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Preservatives => "Preservatives",
            Self::Colorings => "Colorings",
            Self::FlavorEnhancers => "Flavor_Enhancers",
            Self::Sweeteners => "Sweeteners",
            Self::Emulsifiers => "Emulsifiers",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AdditiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Files one entry into exactly one category
///
/// Record assembly asks for a single category per entry, which is what keeps
/// the derived maps a partition of the flat lists.
pub trait Categorize {
    /// Food group of a lower-cased ingredient
    fn ingredient_category(&self, ingredient: &str) -> IngredientCategory;

    /// Severity tier of a canonical allergen name
    fn allergen_tier(&self, allergen: &str) -> AllergenTier;

    /// Functional type of a human-readable additive name
    fn additive_type(&self, additive: &str) -> AdditiveType;
}

/// Bucket every entry with `classify`, producing a partition of `entries`
pub fn partition<'a, C, I, F>(entries: I, classify: F) -> CategoryMap<C>
where
    C: Ord,
    I: IntoIterator<Item = &'a String>,
    F: Fn(&str) -> C,
{
    let mut map: CategoryMap<C> = BTreeMap::new();
    for entry in entries {
        map.entry(classify(entry)).or_default().insert(entry.clone());
    }
    map
}
