// ABOUTME: Word-boundary keyword matching and small text helpers for the classifier
// ABOUTME: Keywords match whole words, allowing a plural "s" or "es" suffix
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::sync::LazyLock;

use regex::Regex;

/// E-number inside free text: "e322", "E 150a", "(E471)"
static E_NUMBER_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)\be\s?(\d{3,4})([a-z])?\b").ok());

fn at_word_boundary(rest: &str) -> bool {
    !matches!(rest.chars().next(), Some(c) if c.is_alphanumeric())
}

/// True when `term` occurs in `haystack` as a whole word or phrase
///
/// Both inputs are expected lower-case. A trailing "s"/"es" on the
/// haystack side still counts as a match, so "egg" matches "eggs".
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let before_ok = !matches!(
            haystack[..start].chars().next_back(),
            Some(c) if c.is_alphanumeric()
        );
        let after = &haystack[start + term.len()..];
        before_ok
            && (at_word_boundary(after)
                || after.strip_prefix('s').is_some_and(at_word_boundary)
                || after.strip_prefix("es").is_some_and(at_word_boundary))
    })
}

/// True when any of `terms` matches
pub fn contains_any(haystack: &str, terms: &[String]) -> bool {
    terms.iter().any(|term| contains_term(haystack, term))
}

/// Blank out every occurrence of the given phrases
pub fn mask_phrases(text: &str, phrases: &[String]) -> String {
    phrases
        .iter()
        .filter(|phrase| !phrase.is_empty())
        .fold(text.to_owned(), |acc, phrase| acc.replace(phrase.as_str(), " "))
}

/// Collapse runs of whitespace into single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// "tree nuts" -> "Tree Nuts"
pub fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// An E-number found in text, e.g. (322, Some('a'))
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ENumber {
    pub number: u32,
    pub suffix: Option<char>,
}

impl ENumber {
    /// Catalogue key: "e150a"
    pub fn code(self) -> String {
        self.suffix.map_or_else(
            || format!("e{}", self.number),
            |suffix| format!("e{}{suffix}", self.number),
        )
    }

    /// Catalogue key without the letter suffix: "e150"
    pub fn base_code(self) -> String {
        format!("e{}", self.number)
    }

    /// Display form: "E150a"
    pub fn label(self) -> String {
        let mut code = self.code();
        code.replace_range(..1, "E");
        code
    }
}

/// Find the first E-number in `text`
pub fn find_e_number(text: &str) -> Option<ENumber> {
    let captures = E_NUMBER_PATTERN.as_ref()?.captures(text)?;
    let number = captures.get(1)?.as_str().parse().ok()?;
    let suffix = captures
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase());
    Some(ENumber { number, suffix })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_match_whole_words_and_plurals() {
        assert!(contains_term("whole eggs", "egg"));
        assert!(contains_term("tomatoes", "tomato"));
        assert!(!contains_term("eggplant", "egg"));
        assert!(!contains_term("peppercorn", "corn"));
        assert!(contains_term("corn syrup", "corn"));
    }

    #[test]
    fn test_masking_hides_excluded_phrases() {
        let masked = mask_phrases("peanut butter", &["peanut butter".to_owned()]);
        assert!(!contains_term(&masked, "butter"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("tree  nuts"), "Tree Nuts");
        assert_eq!(title_case("MUSTARD"), "Mustard");
    }

    #[test]
    fn test_e_number_extraction() {
        let e = find_e_number("Lecithins (E322)").unwrap();
        assert_eq!(e.number, 322);
        assert_eq!(e.code(), "e322");

        let e = find_e_number("en:e150a").unwrap();
        assert_eq!(e.code(), "e150a");
        assert_eq!(e.base_code(), "e150");
        assert_eq!(e.label(), "E150a");

        assert!(find_e_number("vitamin e").is_none());
    }
}
