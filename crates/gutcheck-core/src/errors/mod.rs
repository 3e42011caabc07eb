// ABOUTME: Error taxonomy for provider lookups and startup configuration
// ABOUTME: Per-lookup errors are absorbed by reconciliation; configuration errors are fatal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Error Types
//!
//! Two families with different propagation rules:
//!
//! - [`ProviderError`] describes why one provider call produced no payload. The
//!   reconciliation engine consumes these; callers never see them.
//! - [`ConfigError`] describes invalid startup configuration and is the only
//!   error that aborts processing.

/// Startup configuration errors
pub mod config;
/// Provider lookup errors
pub mod provider;

pub use config::ConfigError;
pub use provider::{FailureKind, ProviderError, ProviderResult};
