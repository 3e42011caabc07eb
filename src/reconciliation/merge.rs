// ABOUTME: Candidate ranking and donor selection for records returned by several providers
// ABOUTME: Picks one record or builds a hybrid from a nutrition donor and a categorical donor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::cmp::Reverse;

use gutcheck_core::{Categorize, DataSource, NutritionRecord, Provenance, ProviderTag};
use gutcheck_intelligence::QualityScorer;
use tracing::debug;

/// A provider record that survived normalization and classification
#[derive(Debug, Clone)]
pub(crate) struct Candidate {
    pub provider: ProviderTag,
    pub score: u32,
    pub record: NutritionRecord,
}

impl Candidate {
    pub(crate) fn new(provider: ProviderTag, record: NutritionRecord) -> Self {
        let score = QualityScorer::score(&record);
        Self {
            provider,
            score,
            record,
        }
    }
}

/// Reduce the candidates to one record
///
/// `candidates` must be in query order; ties in score keep that order, so the
/// first provider queried wins a tie. Returns `None` when there is nothing to
/// select from. `categorizer` rebuilds the derived maps of a hybrid.
pub(crate) fn select_or_merge(
    mut candidates: Vec<Candidate>,
    identifier: &str,
    categorizer: &impl Categorize,
) -> Option<NutritionRecord> {
    // sort_by_key is stable
    candidates.sort_by_key(|candidate| Reverse(candidate.score));

    let nutrition_idx = candidates
        .iter()
        .position(|candidate| candidate.record.has_nutrients())
        .unwrap_or(0);
    let nutrition_donor = candidates.get(nutrition_idx)?;

    let categorical_idx = if nutrition_donor.record.has_ingredients() {
        nutrition_idx
    } else {
        candidates
            .iter()
            .enumerate()
            .find(|(idx, candidate)| *idx != nutrition_idx && candidate.record.has_ingredients())
            .map_or(nutrition_idx, |(idx, _)| idx)
    };

    if categorical_idx == nutrition_idx {
        let winner = candidates.swap_remove(nutrition_idx);
        debug!(
            identifier,
            provider = %winner.provider,
            score = winner.score,
            candidates = candidates.len() + 1,
            "Selected single provider record"
        );
        return Some(winner.record.with_quality_score(winner.score));
    }

    let (nutrition, categorical) = take_pair(candidates, nutrition_idx, categorical_idx)?;
    debug!(
        identifier,
        nutrition_from = %nutrition.provider,
        nutrition_score = nutrition.score,
        categories_from = %categorical.provider,
        categories_score = categorical.score,
        "Merged provider records into hybrid"
    );

    let provenance = Provenance {
        nutrition_from: Some(nutrition.provider),
        categories_from: Some(categorical.provider),
        ..Provenance::new(DataSource::Hybrid, identifier)
    };
    let merged =
        NutritionRecord::hybrid(nutrition.record, categorical.record, categorizer, provenance);
    let score = QualityScorer::score(&merged);
    Some(merged.with_quality_score(score))
}

/// Move two distinct candidates out of the list
fn take_pair(
    candidates: Vec<Candidate>,
    first: usize,
    second: usize,
) -> Option<(Candidate, Candidate)> {
    let mut slots: Vec<Option<Candidate>> = candidates.into_iter().map(Some).collect();
    let a = slots.get_mut(first)?.take()?;
    let b = slots.get_mut(second)?.take()?;
    Some((a, b))
}

#[cfg(test)]
mod tests {
    use gutcheck_core::{NutrientBasis, NutrientProfile, RecordDraft};
    use gutcheck_intelligence::{ClassificationTables, TextClassifier};

    use super::*;

    fn classifier() -> TextClassifier {
        TextClassifier::new(ClassificationTables::embedded().unwrap())
    }

    fn record(
        provider: ProviderTag,
        calories: Option<f64>,
        fat: Option<f64>,
        ingredients: Option<&str>,
    ) -> NutritionRecord {
        let mut draft = RecordDraft::empty(provider);
        draft.name = format!("{provider} product");
        draft.nutrients = NutrientProfile {
            calories_kcal: calories,
            basis: NutrientBasis::Per100g,
            ..NutrientProfile::default()
        };
        draft.nutrients.macros.fat_g = fat;
        draft.ingredients_text = ingredients.map(str::to_owned);
        classifier().enrich(draft, "041220120000")
    }

    #[test]
    fn test_single_candidate_keeps_its_provider() {
        let candidate = Candidate::new(
            ProviderTag::FoodDataCentral,
            record(ProviderTag::FoodDataCentral, Some(90.0), Some(10.0), None),
        );
        let merged = select_or_merge(vec![candidate], "041220120000", &classifier()).unwrap();
        assert_eq!(merged.source(), DataSource::FoodDataCentral);
        assert_eq!(merged.provenance().quality_score, Some(2));
    }

    #[test]
    fn test_tie_favours_first_queried() {
        let a = Candidate::new(
            ProviderTag::OpenFoodFacts,
            record(ProviderTag::OpenFoodFacts, Some(100.0), None, Some("water")),
        );
        let b = Candidate::new(
            ProviderTag::FoodDataCentral,
            record(ProviderTag::FoodDataCentral, Some(200.0), None, Some("water")),
        );
        assert_eq!(a.score, b.score);
        let merged = select_or_merge(vec![a, b], "041220120000", &classifier()).unwrap();
        assert_eq!(merged.source(), DataSource::OpenFoodFacts);
        assert_eq!(merged.calories_kcal(), Some(100.0));
    }

    #[test]
    fn test_hybrid_takes_nutrients_and_categories_from_different_donors() {
        let a = Candidate::new(
            ProviderTag::OpenFoodFacts,
            record(ProviderTag::OpenFoodFacts, Some(90.0), Some(10.0), None),
        );
        let b = Candidate::new(
            ProviderTag::FoodDataCentral,
            record(ProviderTag::FoodDataCentral, None, None, Some("soybean oil, eggs")),
        );
        let merged = select_or_merge(vec![a, b], "041220120000", &classifier()).unwrap();

        assert_eq!(merged.source(), DataSource::Hybrid);
        assert_eq!(merged.calories_kcal(), Some(90.0));
        assert_eq!(merged.macros().fat_g, Some(10.0));
        assert!(merged.allergens().contains("Eggs"));
        assert!(merged.allergens().contains("Soy"));
        assert_eq!(merged.provenance().nutrition_from, Some(ProviderTag::OpenFoodFacts));
        assert_eq!(merged.provenance().categories_from, Some(ProviderTag::FoodDataCentral));
    }

    #[test]
    fn test_hybrid_takes_name_and_tags_from_both_donors() {
        // OFF: nutrients and an allergen tag, but no name or ingredients
        let mut off = RecordDraft::empty(ProviderTag::OpenFoodFacts);
        off.nutrients.calories_kcal = Some(680.0);
        off.allergen_tags = vec!["en:milk".to_owned()];
        let off = classifier().enrich(off, "041220120000");
        assert_eq!(off.name(), "Unknown Product");

        let mut fdc = RecordDraft::empty(ProviderTag::FoodDataCentral);
        fdc.name = "MAYONNAISE".to_owned();
        fdc.description = "Unilever".to_owned();
        fdc.ingredients_text = Some("soybean oil, eggs".to_owned());
        let fdc = classifier().enrich(fdc, "041220120000");

        let merged = select_or_merge(
            vec![
                Candidate::new(ProviderTag::OpenFoodFacts, off),
                Candidate::new(ProviderTag::FoodDataCentral, fdc),
            ],
            "041220120000",
            &classifier(),
        )
        .unwrap();

        assert_eq!(merged.source(), DataSource::Hybrid);
        assert_eq!(merged.calories_kcal(), Some(680.0));
        assert_eq!(merged.name(), "MAYONNAISE");
        assert_eq!(merged.description(), "Unilever");
        let allergens: Vec<&str> = merged.allergens().iter().map(String::as_str).collect();
        assert_eq!(allergens, ["Dairy", "Eggs", "Soy"]);
        assert_eq!(merged.provenance().quality_score, Some(QualityScorer::score(&merged)));
    }

    #[test]
    fn test_empty_candidate_list_selects_nothing() {
        assert!(select_or_merge(Vec::new(), "x", &classifier()).is_none());
    }
}
