// ABOUTME: Constants for record construction, unit conversion, and provider timeouts
// ABOUTME: Pure data constants organized by domain for the GutCheck engine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! Constants module
//!
//! Values that several crates need to agree on. Tunable behaviour lives in
//! configuration, not here.

/// Names used when a record has to be synthesized without provider data
pub mod records {
    /// Display name for a product no provider recognized
    pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown Product";
}

/// Energy and mass conversion factors
pub mod units {
    /// Kilojoules per kilocalorie (thermochemical calorie)
    pub const KJ_PER_KCAL: f64 = 4.184;

    /// Milligrams of sodium per gram of salt (salt is ~40% sodium by mass)
    pub const SODIUM_MG_PER_G_SALT: f64 = 400.0;

    /// Atwater factor for protein (kcal per gram)
    pub const ATWATER_PROTEIN_KCAL_PER_G: f64 = 4.0;

    /// Atwater factor for carbohydrate (kcal per gram)
    pub const ATWATER_CARBS_KCAL_PER_G: f64 = 4.0;

    /// Atwater factor for fat (kcal per gram)
    pub const ATWATER_FAT_KCAL_PER_G: f64 = 9.0;
}

/// Provider call timeout bounds
pub mod timeouts {
    /// Default per-provider call timeout in milliseconds
    pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 8_000;

    /// Smallest per-provider timeout accepted by configuration
    pub const MIN_PROVIDER_TIMEOUT_MS: u64 = 1_000;

    /// Largest per-provider timeout accepted by configuration
    pub const MAX_PROVIDER_TIMEOUT_MS: u64 = 60_000;

    /// Default TCP connect timeout in milliseconds
    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 3_000;
}

/// Barcode shape accepted by `LookupQuery::parse`
pub mod barcodes {
    /// Shortest accepted barcode (EAN-8)
    pub const MIN_DIGITS: usize = 8;

    /// Longest accepted barcode (GTIN-14)
    pub const MAX_DIGITS: usize = 14;
}

/// Batch lookup parallelism bounds
pub mod batch {
    /// Default number of identifiers reconciled at once
    pub const DEFAULT_CONCURRENCY: usize = 4;

    /// Smallest accepted batch concurrency
    pub const MIN_CONCURRENCY: usize = 1;

    /// Largest accepted batch concurrency
    pub const MAX_CONCURRENCY: usize = 64;
}
