// ABOUTME: Lookup identifier classification into barcode or free-text query
// ABOUTME: Providers route barcodes and text searches to different endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::fmt;

use crate::constants::barcodes::{MAX_DIGITS, MIN_DIGITS};

/// What the caller asked to look up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LookupQuery {
    /// A product barcode (8-14 digits)
    Barcode(String),
    /// Free-text product search
    Text(String),
}

impl LookupQuery {
    /// Classify a raw identifier; `None` when it is blank
    #[must_use]
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let is_barcode = (MIN_DIGITS..=MAX_DIGITS).contains(&trimmed.len())
            && trimmed.bytes().all(|b| b.is_ascii_digit());
        Some(if is_barcode {
            Self::Barcode(trimmed.to_owned())
        } else {
            Self::Text(trimmed.to_owned())
        })
    }

    /// The identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Barcode(code) => code,
            Self::Text(text) => text,
        }
    }
}

impl fmt::Display for LookupQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
