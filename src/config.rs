// ABOUTME: Environment-driven startup configuration for providers, timeouts and classification
// ABOUTME: Defaults, then GUTCHECK_* overrides, then validation; errors are fatal ConfigErrors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Configuration
//!
//! Environment-only: every setting has a default and a `GUTCHECK_*`
//! variable that overrides it. [`GutcheckConfig::from_env`] applies the
//! overrides and validates the result; anything wrong is a [`ConfigError`]
//! reported once at startup, never during a lookup.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use gutcheck_core::constants::batch::{DEFAULT_CONCURRENCY, MAX_CONCURRENCY, MIN_CONCURRENCY};
use gutcheck_core::constants::timeouts::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_PROVIDER_TIMEOUT_MS, MAX_PROVIDER_TIMEOUT_MS,
    MIN_PROVIDER_TIMEOUT_MS,
};
use gutcheck_core::{ConfigError, ProviderTag};
use gutcheck_intelligence::ClassificationTables;
use gutcheck_providers::{FoodDataCentralConfig, OpenFoodFactsConfig};

use crate::reconciliation::EngineSettings;

/// Environment variable names
pub mod env_vars {
    /// USDA `FoodData` Central API key
    pub const FDC_API_KEY: &str = "GUTCHECK_FDC_API_KEY";
    /// USDA `FoodData` Central base URL
    pub const FDC_BASE_URL: &str = "GUTCHECK_FDC_BASE_URL";
    /// Whether `FoodData` Central is queried at all
    pub const FDC_ENABLED: &str = "GUTCHECK_FDC_ENABLED";
    /// Open Food Facts base URL
    pub const OFF_BASE_URL: &str = "GUTCHECK_OFF_BASE_URL";
    /// `User-Agent` sent to Open Food Facts
    pub const OFF_USER_AGENT: &str = "GUTCHECK_OFF_USER_AGENT";
    /// Provider queried first
    pub const PRIMARY_PROVIDER: &str = "GUTCHECK_PRIMARY_PROVIDER";
    /// Per-provider call timeout in milliseconds
    pub const PROVIDER_TIMEOUT_MS: &str = "GUTCHECK_PROVIDER_TIMEOUT_MS";
    /// TCP connect timeout in milliseconds
    pub const CONNECT_TIMEOUT_MS: &str = "GUTCHECK_CONNECT_TIMEOUT_MS";
    /// Query the secondary provider even when the primary succeeded
    pub const CONFIRM_WITH_SECONDARY: &str = "GUTCHECK_CONFIRM_WITH_SECONDARY";
    /// Query both providers concurrently
    pub const PARALLEL_QUERIES: &str = "GUTCHECK_PARALLEL_QUERIES";
    /// Parallelism of batch lookups
    pub const BATCH_CONCURRENCY: &str = "GUTCHECK_BATCH_CONCURRENCY";
    /// Path of a classification table JSON file
    pub const CLASSIFICATION_TABLES: &str = "GUTCHECK_CLASSIFICATION_TABLES";

    /// Every variable read by `GutcheckConfig::from_env`
    pub const ALL: [&str; 12] = [
        FDC_API_KEY,
        FDC_BASE_URL,
        FDC_ENABLED,
        OFF_BASE_URL,
        OFF_USER_AGENT,
        PRIMARY_PROVIDER,
        PROVIDER_TIMEOUT_MS,
        CONNECT_TIMEOUT_MS,
        CONFIRM_WITH_SECONDARY,
        PARALLEL_QUERIES,
        BATCH_CONCURRENCY,
        CLASSIFICATION_TABLES,
    ];
}

/// Complete startup configuration
#[derive(Debug, Clone)]
pub struct GutcheckConfig {
    /// Open Food Facts base URL
    pub off_base_url: String,
    /// `User-Agent` sent to Open Food Facts
    pub off_user_agent: String,
    /// Whether `FoodData` Central is queried
    pub fdc_enabled: bool,
    /// USDA API key, required when `fdc_enabled`
    pub fdc_api_key: Option<String>,
    /// `FoodData` Central base URL
    pub fdc_base_url: String,
    /// Provider queried first
    pub primary_provider: ProviderTag,
    /// Per-provider call timeout in milliseconds
    pub provider_timeout_ms: u64,
    /// TCP connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Query the secondary provider even when the primary succeeded
    pub confirm_with_secondary: bool,
    /// Query both providers concurrently
    pub parallel_queries: bool,
    /// Identifiers reconciled at once in a batch
    pub batch_concurrency: usize,
    /// Classification table file; the embedded tables when `None`
    pub classification_tables: Option<PathBuf>,
}

impl Default for GutcheckConfig {
    fn default() -> Self {
        let off = OpenFoodFactsConfig::default();
        let fdc = FoodDataCentralConfig::default();
        Self {
            off_base_url: off.base_url,
            off_user_agent: off.user_agent,
            fdc_enabled: true,
            fdc_api_key: None,
            fdc_base_url: fdc.base_url,
            primary_provider: ProviderTag::OpenFoodFacts,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            confirm_with_secondary: true,
            parallel_queries: false,
            batch_concurrency: DEFAULT_CONCURRENCY,
            classification_tables: None,
        }
    }
}

impl GutcheckConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for unparsable or out-of-range values, an
    /// unknown provider name, or a missing API key while `FoodData` Central
    /// is enabled.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::default().apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .trim()
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}: '{val}'")))?;
        }
        Ok(())
    }

    /// Boolean overrides accept true/false, 1/0, yes/no, on/off
    fn apply_env_flag(env_var_name: &str, target: &mut bool) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = match val.trim().to_lowercase().as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => {
                    return Err(ConfigError::Parse(format!(
                        "Invalid {env_var_name}: '{val}' is not a boolean"
                    )))
                }
            };
        }
        Ok(())
    }

    fn apply_env_string(env_var_name: &str, target: &mut String) {
        if let Ok(val) = env::var(env_var_name) {
            let val = val.trim();
            if !val.is_empty() {
                val.clone_into(target);
            }
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Open Food Facts
        Self::apply_env_string(env_vars::OFF_BASE_URL, &mut self.off_base_url);
        Self::apply_env_string(env_vars::OFF_USER_AGENT, &mut self.off_user_agent);

        // FoodData Central
        Self::apply_env_flag(env_vars::FDC_ENABLED, &mut self.fdc_enabled)?;
        Self::apply_env_string(env_vars::FDC_BASE_URL, &mut self.fdc_base_url);
        self.fdc_api_key = env::var(env_vars::FDC_API_KEY)
            .ok()
            .map(|key| key.trim().to_owned())
            .filter(|key| !key.is_empty());

        // Engine behaviour
        Self::apply_env_var(env_vars::PRIMARY_PROVIDER, &mut self.primary_provider)?;
        Self::apply_env_var(env_vars::PROVIDER_TIMEOUT_MS, &mut self.provider_timeout_ms)?;
        Self::apply_env_var(env_vars::CONNECT_TIMEOUT_MS, &mut self.connect_timeout_ms)?;
        Self::apply_env_flag(
            env_vars::CONFIRM_WITH_SECONDARY,
            &mut self.confirm_with_secondary,
        )?;
        Self::apply_env_flag(env_vars::PARALLEL_QUERIES, &mut self.parallel_queries)?;
        Self::apply_env_var(env_vars::BATCH_CONCURRENCY, &mut self.batch_concurrency)?;

        // Classification tables
        if let Ok(path) = env::var(env_vars::CLASSIFICATION_TABLES) {
            let path = path.trim();
            if !path.is_empty() {
                self.classification_tables = Some(PathBuf::from(path));
            }
        }

        Ok(self)
    }

    /// Check values against their accepted ranges
    ///
    /// # Errors
    ///
    /// Returns the first problem found as a `ConfigError`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PROVIDER_TIMEOUT_MS..=MAX_PROVIDER_TIMEOUT_MS).contains(&self.provider_timeout_ms)
        {
            return Err(ConfigError::ValueOutOfRange(format!(
                "provider timeout {} ms is outside {MIN_PROVIDER_TIMEOUT_MS}-{MAX_PROVIDER_TIMEOUT_MS} ms",
                self.provider_timeout_ms
            )));
        }

        if self.connect_timeout_ms == 0 || self.connect_timeout_ms > MAX_PROVIDER_TIMEOUT_MS {
            return Err(ConfigError::ValueOutOfRange(format!(
                "connect timeout {} ms is outside 1-{MAX_PROVIDER_TIMEOUT_MS} ms",
                self.connect_timeout_ms
            )));
        }

        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&self.batch_concurrency) {
            return Err(ConfigError::ValueOutOfRange(format!(
                "batch concurrency {} is outside {MIN_CONCURRENCY}-{MAX_CONCURRENCY}",
                self.batch_concurrency
            )));
        }

        if self.off_base_url.trim().is_empty() {
            return Err(ConfigError::MissingField(env_vars::OFF_BASE_URL));
        }

        if self.fdc_enabled {
            if self.fdc_api_key.is_none() {
                return Err(ConfigError::MissingField(env_vars::FDC_API_KEY));
            }
            if self.fdc_base_url.trim().is_empty() {
                return Err(ConfigError::MissingField(env_vars::FDC_BASE_URL));
            }
        } else if self.primary_provider == ProviderTag::FoodDataCentral {
            return Err(ConfigError::ValueOutOfRange(format!(
                "primary provider {} is disabled by {}",
                self.primary_provider,
                env_vars::FDC_ENABLED
            )));
        }

        Ok(())
    }

    /// Engine behaviour derived from this configuration
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            provider_timeout: Duration::from_millis(self.provider_timeout_ms),
            confirm_with_secondary: self.confirm_with_secondary,
            parallel_queries: self.parallel_queries,
            batch_concurrency: self.batch_concurrency,
        }
    }

    /// Open Food Facts client settings
    #[must_use]
    pub fn open_food_facts_config(&self) -> OpenFoodFactsConfig {
        OpenFoodFactsConfig {
            base_url: self.off_base_url.clone(),
            user_agent: self.off_user_agent.clone(),
            timeout_ms: self.provider_timeout_ms,
        }
    }

    /// `FoodData` Central client settings, `None` when the provider is disabled
    #[must_use]
    pub fn food_data_central_config(&self) -> Option<FoodDataCentralConfig> {
        if !self.fdc_enabled {
            return None;
        }
        let api_key = self.fdc_api_key.clone()?;
        Some(FoodDataCentralConfig {
            api_key,
            base_url: self.fdc_base_url.clone(),
            timeout_ms: self.provider_timeout_ms,
            ..FoodDataCentralConfig::default()
        })
    }

    /// Classification tables from the configured file, or the embedded set
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` or `ConfigError::InvalidTables` when the
    /// configured file cannot be read or fails validation.
    pub fn load_tables(&self) -> Result<ClassificationTables, ConfigError> {
        self.classification_tables.as_ref().map_or_else(
            ClassificationTables::embedded,
            ClassificationTables::from_path,
        )
    }

    /// One-line human-readable summary, safe to log (the API key is masked)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "primary={} fdc_enabled={} fdc_api_key={} timeout_ms={} confirm_with_secondary={} parallel_queries={} batch_concurrency={} tables={}",
            self.primary_provider,
            self.fdc_enabled,
            if self.fdc_api_key.is_some() { "set" } else { "unset" },
            self.provider_timeout_ms,
            self.confirm_with_secondary,
            self.parallel_queries,
            self.batch_concurrency,
            self.classification_tables
                .as_ref()
                .map_or_else(|| "embedded".to_owned(), |path| path.display().to_string()),
        )
    }
}
