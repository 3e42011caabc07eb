// ABOUTME: Logging configuration and structured lookup events for observability and debugging
// ABOUTME: Configures log level, format and noise filters; emits provider and reconciliation events
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! Structured logging setup
//!
//! Logs go to stderr so the lookup harness can print JSON records on stdout.

use std::env;
use std::io;
use std::time::Duration;

use anyhow::Result;
use gutcheck_core::{FailureKind, NutritionRecord, ProviderError, ProviderTag};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to startup events
pub const SERVICE_NAME: &str = "gutcheck";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for terminals
    Compact,
}

impl LogFormat {
    /// Parse a `LOG_FORMAT` value, defaulting to pretty
    #[must_use]
    pub fn from_str_or_default(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: LogFormat::Pretty,
            include_location: false,
            service_name: SERVICE_NAME.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            level: env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
            format: env::var("LOG_FORMAT")
                .map_or(LogFormat::Pretty, |value| LogFormat::from_str_or_default(&value)),
            include_location: env::var("LOG_INCLUDE_LOCATION").is_ok(),
            ..Self::default()
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let directive = |text: &str, fallback: tracing::Level| -> Directive {
            text.parse().unwrap_or_else(|_| fallback.into())
        };
        EnvFilter::new(&self.level)
            .add_directive(directive("hyper=warn", tracing::Level::WARN))
            .add_directive(directive("hyper_util=warn", tracing::Level::WARN))
            .add_directive(directive("reqwest=warn", tracing::Level::WARN))
            .add_directive(directive("rustls=warn", tracing::Level::WARN))
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stderr);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_file(false)
                    .with_line_number(false)
                    .with_target(false)
                    .with_writer(io::stderr);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
            },
            "logging": {
                "level": self.level,
                "format": format!("{:?}", self.format),
                "location": self.include_location,
            }
        });
        debug!("Logging configured: {}", config_summary);
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

/// Lookup-specific logging events
pub struct LookupLogger;

impl LookupLogger {
    /// A provider returned a product
    pub fn provider_found(provider: ProviderTag, identifier: &str, score: u32, elapsed: Duration) {
        debug!(
            provider = %provider,
            identifier,
            score,
            elapsed_ms = millis(elapsed),
            outcome = "found",
            "Provider returned a product"
        );
    }

    /// A provider call produced no payload
    ///
    /// Unknown identifiers are routine and logged at debug; everything else
    /// is a warning, with malformed payloads and timeouts under their own
    /// event names.
    pub fn provider_failed(error: &ProviderError, identifier: &str, elapsed: Duration) {
        let provider = error.provider();
        let elapsed_ms = millis(elapsed);
        match (error.kind(), error) {
            (FailureKind::NotFound, _) => debug!(
                provider = %provider,
                identifier,
                elapsed_ms,
                outcome = error.label(),
                "Provider has no product for identifier"
            ),
            (_, ProviderError::MalformedResponse { reason, .. }) => warn!(
                provider = %provider,
                identifier,
                elapsed_ms,
                outcome = error.label(),
                event = "provider_malformed_response",
                reason = %reason,
                "Provider returned a malformed response"
            ),
            (_, ProviderError::Timeout { timeout_ms, .. }) => warn!(
                provider = %provider,
                identifier,
                elapsed_ms,
                timeout_ms = *timeout_ms,
                outcome = error.label(),
                event = "provider_timeout",
                "Provider call timed out"
            ),
            _ => warn!(
                provider = %provider,
                identifier,
                elapsed_ms,
                outcome = error.label(),
                event = "provider_transient_failure",
                error = %error,
                "Provider call failed"
            ),
        }
    }

    /// A lookup produced its final record
    pub fn reconciled(identifier: &str, record: &NutritionRecord, attempts: usize) {
        let provenance = record.provenance();
        info!(
            identifier,
            source = ?provenance.source,
            nutrition_from = provenance.nutrition_from.map(ProviderTag::name),
            categories_from = provenance.categories_from.map(ProviderTag::name),
            quality_score = provenance.quality_score,
            attempts,
            "Lookup reconciled"
        );
    }
}
