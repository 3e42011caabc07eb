// ABOUTME: Keyword tables that drive ingredient, allergen and additive classification
// ABOUTME: Embedded JSON by default, overridable from a file; validated at load time
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Classification Tables
//!
//! Classification rules are data, not code: the embedded
//! `classification_tables.json` is the default and a deployment may replace
//! it with its own file. Keywords are lower-cased on load and the whole set is
//! validated before a classifier can be built from it.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use gutcheck_core::{AdditiveType, ConfigError, IngredientCategory};
use serde::Deserialize;
use tracing::info;

const EMBEDDED_TABLES: &str = include_str!("../data/classification_tables.json");

/// Allergen detection rule for ingredient text
#[derive(Debug, Clone, Deserialize)]
pub struct AllergenRule {
    /// Canonical allergen name ("Dairy")
    pub name: String,
    /// Keywords that indicate the allergen
    pub keywords: Vec<String>,
    /// Phrases that contain a keyword but do not indicate the allergen
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// Canonical allergen names per non-default tier
#[derive(Debug, Clone, Deserialize)]
pub struct AllergenTierTable {
    /// Major allergens
    pub major: Vec<String>,
    /// Common allergens
    pub common: Vec<String>,
}

/// One additive catalogue entry
#[derive(Debug, Clone, Deserialize)]
pub struct AdditiveEntry {
    /// Lower-case E-number code ("e322", "e150a")
    pub code: String,
    /// Human-readable name ("Lecithins")
    pub name: String,
    /// Extra ingredient phrases that name this additive
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Inclusive E-number range mapped to an additive type
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ENumberRange {
    /// First number in the range
    pub start: u32,
    /// Last number in the range
    pub end: u32,
    /// Type of additives in the range
    pub additive_type: AdditiveType,
}

impl ENumberRange {
    /// Whether `number` falls in this range
    #[must_use]
    pub const fn contains(&self, number: u32) -> bool {
        self.start <= number && number <= self.end
    }
}

/// Additive type rules
#[derive(Debug, Clone, Deserialize)]
pub struct AdditiveTypeTable {
    /// Keywords per type, tried in `AdditiveType::MATCH_ORDER`
    pub keywords: BTreeMap<AdditiveType, Vec<String>>,
    /// E-number ranges, tried when no keyword matches
    pub e_number_ranges: Vec<ENumberRange>,
}

/// Complete keyword table set
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassificationTables {
    /// Ingredient keywords per food group
    pub ingredient_categories: BTreeMap<IngredientCategory, Vec<String>>,
    /// Allergen detection rules
    pub allergen_rules: Vec<AllergenRule>,
    /// Allergen tag synonyms, keyed by lower-case tag text
    pub allergen_synonyms: BTreeMap<String, String>,
    /// Allergen tiers
    pub allergen_tiers: AllergenTierTable,
    /// Additive catalogue
    pub additive_catalogue: Vec<AdditiveEntry>,
    /// Additive type rules
    pub additive_types: AdditiveTypeTable,
}

fn lowercase_all(words: &mut [String]) {
    for word in words {
        *word = word.trim().to_lowercase();
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidTables(message.into())
}

impl ClassificationTables {
    /// The tables compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTables` if the embedded document fails
    /// validation.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_json(EMBEDDED_TABLES)
    }

    /// Parse and validate tables from a JSON document
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTables` for malformed JSON or
    /// inconsistent tables.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tables: Self =
            serde_json::from_str(json).map_err(|e| invalid(format!("JSON parse error: {e}")))?;
        let tables = tables.normalized();
        tables.validate()?;
        Ok(tables)
    }

    /// Load tables from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` when the file cannot be read and
    /// `ConfigError::InvalidTables` when its content is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tables = Self::from_json(&json)?;
        info!(path = %path.display(), "Loaded classification tables from file");
        Ok(tables)
    }

    fn normalized(mut self) -> Self {
        for keywords in self.ingredient_categories.values_mut() {
            lowercase_all(keywords);
        }
        for rule in &mut self.allergen_rules {
            rule.name = rule.name.trim().to_owned();
            lowercase_all(&mut rule.keywords);
            lowercase_all(&mut rule.exclusions);
        }
        self.allergen_synonyms = self
            .allergen_synonyms
            .into_iter()
            .map(|(tag, name)| (tag.trim().to_lowercase(), name.trim().to_owned()))
            .collect();
        for entry in &mut self.additive_catalogue {
            entry.code = entry.code.trim().to_lowercase();
            entry.name = entry.name.trim().to_owned();
            lowercase_all(&mut entry.keywords);
        }
        for keywords in self.additive_types.keywords.values_mut() {
            lowercase_all(keywords);
        }
        self
    }

    /// Check the tables for internal consistency
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTables` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ingredient_categories.contains_key(&IngredientCategory::Other) {
            return Err(invalid("'Other' is the fallback category and takes no keywords"));
        }
        for (category, keywords) in &self.ingredient_categories {
            if keywords.iter().any(String::is_empty) {
                return Err(invalid(format!("empty keyword in category {category}")));
            }
        }

        let mut names = HashSet::new();
        for rule in &self.allergen_rules {
            if rule.name.is_empty() {
                return Err(invalid("allergen rule without a name"));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(invalid(format!("duplicate allergen rule '{}'", rule.name)));
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(String::is_empty) {
                return Err(invalid(format!("allergen '{}' needs non-empty keywords", rule.name)));
            }
        }

        let mut codes = HashSet::new();
        for entry in &self.additive_catalogue {
            let valid_code = entry.code.strip_prefix('e').is_some_and(|rest| {
                let digits = rest.trim_end_matches(|c: char| c.is_ascii_lowercase());
                (3..=4).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
            });
            if !valid_code {
                return Err(invalid(format!("invalid E-number code '{}'", entry.code)));
            }
            if !codes.insert(entry.code.as_str()) {
                return Err(invalid(format!("duplicate additive code '{}'", entry.code)));
            }
            if entry.name.is_empty() {
                return Err(invalid(format!("additive '{}' has no name", entry.code)));
            }
        }

        let mut ranges = self.additive_types.e_number_ranges.clone();
        ranges.sort_by_key(|range| range.start);
        for range in &ranges {
            if range.start > range.end {
                return Err(invalid(format!(
                    "E-number range {}-{} is reversed",
                    range.start, range.end
                )));
            }
        }
        if let Some(pair) = ranges.windows(2).find(|pair| pair[0].end >= pair[1].start) {
            return Err(invalid(format!(
                "E-number ranges {}-{} and {}-{} overlap",
                pair[0].start, pair[0].end, pair[1].start, pair[1].end
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_embedded_tables_are_valid() {
        let tables = ClassificationTables::embedded().unwrap();
        assert!(tables
            .ingredient_categories
            .contains_key(&IngredientCategory::FatsOils));
        assert!(tables.allergen_rules.iter().any(|rule| rule.name == "Dairy"));
        assert_eq!(tables.allergen_tiers.major.len(), 9);
    }

    #[test]
    fn test_keywords_are_lowercased_on_load() {
        let json = EMBEDDED_TABLES.replace("\"wheat\", \"flour\"", "\"WHEAT\", \"Flour\"");
        let tables = ClassificationTables::from_json(&json).unwrap();
        let grains = &tables.ingredient_categories[&IngredientCategory::Grains];
        assert_eq!(grains[0], "wheat");
        assert_eq!(grains[1], "flour");
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let json = EMBEDDED_TABLES.replace(
            "{ \"start\": 200, \"end\": 399",
            "{ \"start\": 150, \"end\": 399",
        );
        let err = ClassificationTables::from_json(&json).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTables(_)));
    }

    #[test]
    fn test_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(EMBEDDED_TABLES.as_bytes()).unwrap();
        let tables = ClassificationTables::from_path(file.path()).unwrap();
        assert!(!tables.additive_catalogue.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = ClassificationTables::from_path("/nonexistent/tables.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ClassificationTables::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTables(_)));
    }
}
