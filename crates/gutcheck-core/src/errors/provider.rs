// ABOUTME: Structured error types for nutrition provider lookups
// ABOUTME: Distinguishes "product not found" from transport, timeout, and payload failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use thiserror::Error;

use crate::models::ProviderTag;

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// How the fallback chain treats a failure
///
/// Both kinds fall through to the next provider; they differ in how they
/// are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The provider answered and does not know the identifier
    NotFound,
    /// Network, timeout, server-side or payload failure
    Transient,
}

/// Why a single provider call produced no payload
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider has no product for this identifier
    #[error("{provider}: no product matches '{identifier}'")]
    NotFound {
        /// Provider that was queried
        provider: ProviderTag,
        /// Barcode or query text
        identifier: String,
    },

    /// Transport failure or non-success HTTP status
    #[error("{provider}: transient failure: {reason}")]
    Transient {
        /// Provider that was queried
        provider: ProviderTag,
        /// Human-readable reason
        reason: String,
        /// HTTP status when the provider answered
        status: Option<u16>,
    },

    /// The call did not complete within the configured timeout
    #[error("{provider}: no response within {timeout_ms} ms")]
    Timeout {
        /// Provider that was queried
        provider: ProviderTag,
        /// Timeout that elapsed
        timeout_ms: u64,
    },

    /// The provider answered with a payload that could not be parsed
    #[error("{provider}: malformed response: {reason}")]
    MalformedResponse {
        /// Provider that was queried
        provider: ProviderTag,
        /// Parser message
        reason: String,
    },
}

impl ProviderError {
    /// Create a "not found" error
    #[must_use]
    pub fn not_found(provider: ProviderTag, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            provider,
            identifier: identifier.into(),
        }
    }

    /// Create a transient error without an HTTP status
    #[must_use]
    pub fn transient(provider: ProviderTag, reason: impl Into<String>) -> Self {
        Self::Transient {
            provider,
            reason: reason.into(),
            status: None,
        }
    }

    /// Create a transient error for a non-success HTTP status
    #[must_use]
    pub fn http_status(provider: ProviderTag, status: u16, body: &str) -> Self {
        let reason = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            // Provider error pages can be large; keep the log line readable
            let snippet: String = body.chars().take(200).collect();
            format!("HTTP {status}: {snippet}")
        };
        Self::Transient {
            provider,
            reason,
            status: Some(status),
        }
    }

    /// Create a malformed-response error
    #[must_use]
    pub fn malformed(provider: ProviderTag, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            provider,
            reason: reason.into(),
        }
    }

    /// Provider that produced this error
    #[must_use]
    pub const fn provider(&self) -> ProviderTag {
        match self {
            Self::NotFound { provider, .. }
            | Self::Transient { provider, .. }
            | Self::Timeout { provider, .. }
            | Self::MalformedResponse { provider, .. } => *provider,
        }
    }

    /// Fallback classification of this error
    ///
    /// Timeouts and malformed payloads count as transient.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Transient { .. } | Self::Timeout { .. } | Self::MalformedResponse { .. } => {
                FailureKind::Transient
            }
        }
    }

    /// Whether this is a transient failure rather than an unknown identifier
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self.kind(), FailureKind::Transient)
    }

    /// Short machine-readable label used as a structured log field
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Transient { .. } => "transient",
            Self::Timeout { .. } => "timeout",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }
}
