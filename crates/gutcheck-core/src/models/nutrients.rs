// ABOUTME: Typed nutrient keys, canonical units, and the nutrient profile of a record
// ABOUTME: Every extended nutrient carries its unit so mg/g confusion cannot reach the record
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mass unit for nutrient amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientUnit {
    /// Grams
    Grams,
    /// Milligrams
    Milligrams,
    /// Micrograms
    Micrograms,
}

impl NutrientUnit {
    /// Size of one unit expressed in grams
    #[must_use]
    pub const fn grams_per_unit(self) -> f64 {
        match self {
            Self::Grams => 1.0,
            Self::Milligrams => 1e-3,
            Self::Micrograms => 1e-6,
        }
    }

    /// Parse a provider unit label ("g", "MG", "µg", "mcg", …)
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "g" | "gram" | "grams" => Some(Self::Grams),
            "mg" | "milligram" | "milligrams" => Some(Self::Milligrams),
            "ug" | "mcg" | "µg" | "μg" | "microgram" | "micrograms" => Some(Self::Micrograms),
            _ => None,
        }
    }

    /// Convert `amount` expressed in `self` into `target`
    #[must_use]
    pub fn convert(self, amount: f64, target: Self) -> f64 {
        if self == target {
            return amount;
        }
        amount * self.grams_per_unit() / target.grams_per_unit()
    }

    /// Short label used in display strings
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Grams => "g",
            Self::Milligrams => "mg",
            Self::Micrograms => "µg",
        }
    }
}

/// Nutrients tracked beyond calories and the six headline macros
///
/// New nutrients are added as variants; the record stores them in a map so
/// the record shape does not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NutrientKey {
    /// Saturated fat
    SaturatedFatG,
    /// Trans fat
    TransFatG,
    /// Monounsaturated fat
    MonounsaturatedFatG,
    /// Polyunsaturated fat
    PolyunsaturatedFatG,
    /// Added sugars
    AddedSugarsG,
    /// Cholesterol
    CholesterolMg,
    /// Potassium
    PotassiumMg,
    /// Calcium
    CalciumMg,
    /// Iron
    IronMg,
    /// Magnesium
    MagnesiumMg,
    /// Vitamin C
    VitaminCMg,
    /// Vitamin A (retinol activity equivalents)
    VitaminAUg,
    /// Vitamin D
    VitaminDUg,
}

impl NutrientKey {
    /// All keys in stable order
    pub const ALL: [Self; 13] = [
        Self::SaturatedFatG,
        Self::TransFatG,
        Self::MonounsaturatedFatG,
        Self::PolyunsaturatedFatG,
        Self::AddedSugarsG,
        Self::CholesterolMg,
        Self::PotassiumMg,
        Self::CalciumMg,
        Self::IronMg,
        Self::MagnesiumMg,
        Self::VitaminCMg,
        Self::VitaminAUg,
        Self::VitaminDUg,
    ];

    /// Canonical unit the record stores this nutrient in
    #[must_use]
    pub const fn unit(self) -> NutrientUnit {
        match self {
            Self::SaturatedFatG
            | Self::TransFatG
            | Self::MonounsaturatedFatG
            | Self::PolyunsaturatedFatG
            | Self::AddedSugarsG => NutrientUnit::Grams,
            Self::CholesterolMg
            | Self::PotassiumMg
            | Self::CalciumMg
            | Self::IronMg
            | Self::MagnesiumMg
            | Self::VitaminCMg => NutrientUnit::Milligrams,
            Self::VitaminAUg | Self::VitaminDUg => NutrientUnit::Micrograms,
        }
    }

    /// Serialized key name, e.g. `saturatedFatG`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SaturatedFatG => "saturatedFatG",
            Self::TransFatG => "transFatG",
            Self::MonounsaturatedFatG => "monounsaturatedFatG",
            Self::PolyunsaturatedFatG => "polyunsaturatedFatG",
            Self::AddedSugarsG => "addedSugarsG",
            Self::CholesterolMg => "cholesterolMg",
            Self::PotassiumMg => "potassiumMg",
            Self::CalciumMg => "calciumMg",
            Self::IronMg => "ironMg",
            Self::MagnesiumMg => "magnesiumMg",
            Self::VitaminCMg => "vitaminCMg",
            Self::VitaminAUg => "vitaminAUg",
            Self::VitaminDUg => "vitaminDUg",
        }
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Headline macronutrients; `None` means unknown, never zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macros {
    /// Protein in grams
    pub protein_g: Option<f64>,
    /// Carbohydrate in grams
    pub carbs_g: Option<f64>,
    /// Fat in grams
    pub fat_g: Option<f64>,
    /// Dietary fiber in grams
    pub fiber_g: Option<f64>,
    /// Total sugars in grams
    pub sugar_g: Option<f64>,
    /// Sodium in milligrams
    pub sodium_mg: Option<f64>,
}

impl Macros {
    fn fields(&self) -> [Option<f64>; 6] {
        [
            self.protein_g,
            self.carbs_g,
            self.fat_g,
            self.fiber_g,
            self.sugar_g,
            self.sodium_mg,
        ]
    }

    fn fields_mut(&mut self) -> [&mut Option<f64>; 6] {
        [
            &mut self.protein_g,
            &mut self.carbs_g,
            &mut self.fat_g,
            &mut self.fiber_g,
            &mut self.sugar_g,
            &mut self.sodium_mg,
        ]
    }

    /// Number of macros with a known value
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.fields().iter().filter(|v| v.is_some()).count()
    }

    /// True when no macro is known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.known_count() == 0
    }
}

/// What quantity of food the nutrient values describe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NutrientBasis {
    /// Values per 100 g (or 100 ml) of product
    #[default]
    Per100g,
    /// Values per labelled serving
    PerServing,
}

/// Every nutrient value of a record, moved as one unit during a merge
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NutrientProfile {
    /// Energy in kilocalories
    pub calories_kcal: Option<f64>,
    /// Headline macros
    pub macros: Macros,
    /// Extended nutrients; a key is present only when its value is known
    #[serde(rename = "extendedNutrients")]
    pub extended: BTreeMap<NutrientKey, f64>,
    /// Quantity the values refer to
    pub basis: NutrientBasis,
    /// Labelled serving size as reported ("15 g", "1 tbsp")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving_size: Option<String>,
}

impl NutrientProfile {
    /// Count of known nutrient values (calories, macros and extended nutrients)
    #[must_use]
    pub fn known_values(&self) -> usize {
        usize::from(self.calories_kcal.is_some()) + self.macros.known_count() + self.extended.len()
    }

    /// True when at least one nutrient value is known
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.known_values() > 0
    }

    /// Drop negative or non-finite values, returning how many were removed
    pub fn sanitize(&mut self) -> usize {
        let mut removed = 0;
        if self.calories_kcal.is_some_and(|v| !is_valid_amount(v)) {
            self.calories_kcal = None;
            removed += 1;
        }
        for field in self.macros.fields_mut() {
            if field.is_some_and(|v| !is_valid_amount(v)) {
                *field = None;
                removed += 1;
            }
        }
        let before = self.extended.len();
        self.extended.retain(|_, v| is_valid_amount(*v));
        removed + (before - self.extended.len())
    }
}

/// A nutrient amount is usable when finite and non-negative
#[must_use]
pub fn is_valid_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
