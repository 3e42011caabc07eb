// ABOUTME: Startup configuration errors for GutCheck
// ABOUTME: The only error family that aborts processing instead of falling back
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use thiserror::Error;

/// Invalid or missing startup configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting (credential, path, …) is absent
    #[error("Missing required configuration: {0}")]
    MissingField(&'static str),

    /// A setting could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// A setting parsed but is outside its accepted range
    #[error("Value out of range: {0}")]
    ValueOutOfRange(String),

    /// Classification keyword tables are inconsistent
    #[error("Invalid classification tables: {0}")]
    InvalidTables(String),

    /// A configuration file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that was read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
