// ABOUTME: Environment configuration tests for GutcheckConfig::from_env and engine startup
// ABOUTME: Serialized because they mutate process-wide GUTCHECK_* environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::io::Write;
use std::time::Duration;

use gutcheck::config::env_vars;
use gutcheck::{ConfigError, GutcheckConfig, ProviderTag, ReconciliationEngine};
use serial_test::serial;

const EMBEDDED_TABLES: &str =
    include_str!("../crates/gutcheck-intelligence/data/classification_tables.json");

fn clear_env() {
    for name in env_vars::ALL {
        env::remove_var(name);
    }
}

fn with_env(vars: &[(&str, &str)]) {
    clear_env();
    for (name, value) in vars {
        env::set_var(name, value);
    }
}

#[test]
#[serial]
fn test_defaults_with_api_key() {
    with_env(&[(env_vars::FDC_API_KEY, "DEMO_KEY")]);

    let config = GutcheckConfig::from_env().unwrap();

    assert_eq!(config.primary_provider, ProviderTag::OpenFoodFacts);
    assert_eq!(config.provider_timeout_ms, 8_000);
    assert_eq!(config.connect_timeout_ms, 3_000);
    assert!(config.confirm_with_secondary);
    assert!(!config.parallel_queries);
    assert_eq!(config.batch_concurrency, 4);
    assert_eq!(config.off_base_url, "https://world.openfoodfacts.org");
    assert_eq!(config.fdc_base_url, "https://api.nal.usda.gov/fdc/v1");
    assert!(config.off_user_agent.starts_with("GutCheck/"));
    assert!(config.classification_tables.is_none());
    assert_eq!(
        config.food_data_central_config().unwrap().api_key,
        "DEMO_KEY"
    );
    clear_env();
}

#[test]
#[serial]
fn test_missing_api_key_is_fatal() {
    with_env(&[]);
    assert!(matches!(
        GutcheckConfig::from_env(),
        Err(ConfigError::MissingField(name)) if name == env_vars::FDC_API_KEY
    ));

    with_env(&[(env_vars::FDC_API_KEY, "   ")]);
    assert!(GutcheckConfig::from_env().is_err());
    clear_env();
}

#[test]
#[serial]
fn test_fdc_can_be_disabled() {
    with_env(&[(env_vars::FDC_ENABLED, "false")]);

    let config = GutcheckConfig::from_env().unwrap();

    assert!(!config.fdc_enabled);
    assert!(config.food_data_central_config().is_none());
    clear_env();
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    with_env(&[
        (env_vars::FDC_API_KEY, "DEMO_KEY"),
        (env_vars::PRIMARY_PROVIDER, "usda"),
        (env_vars::PROVIDER_TIMEOUT_MS, "2500"),
        (env_vars::CONFIRM_WITH_SECONDARY, "0"),
        (env_vars::PARALLEL_QUERIES, "yes"),
        (env_vars::BATCH_CONCURRENCY, "16"),
        (env_vars::OFF_BASE_URL, "http://localhost:9000"),
    ]);

    let config = GutcheckConfig::from_env().unwrap();
    let settings = config.engine_settings();

    assert_eq!(config.primary_provider, ProviderTag::FoodDataCentral);
    assert_eq!(settings.provider_timeout, Duration::from_millis(2_500));
    assert!(!settings.confirm_with_secondary);
    assert!(settings.parallel_queries);
    assert_eq!(settings.batch_concurrency, 16);
    assert_eq!(config.open_food_facts_config().base_url, "http://localhost:9000");
    assert_eq!(config.open_food_facts_config().timeout_ms, 2_500);
    clear_env();
}

#[test]
#[serial]
fn test_unparsable_values_are_rejected() {
    for (name, value) in [
        (env_vars::PROVIDER_TIMEOUT_MS, "soon"),
        (env_vars::PRIMARY_PROVIDER, "nutritionix"),
        (env_vars::PARALLEL_QUERIES, "maybe"),
        (env_vars::BATCH_CONCURRENCY, "-1"),
    ] {
        with_env(&[(env_vars::FDC_API_KEY, "DEMO_KEY"), (name, value)]);
        assert!(
            matches!(GutcheckConfig::from_env(), Err(ConfigError::Parse(_))),
            "{name}={value}"
        );
    }
    clear_env();
}

#[test]
#[serial]
fn test_out_of_range_values_are_rejected() {
    for (name, value) in [
        (env_vars::PROVIDER_TIMEOUT_MS, "500"),
        (env_vars::PROVIDER_TIMEOUT_MS, "120000"),
        (env_vars::BATCH_CONCURRENCY, "0"),
        (env_vars::BATCH_CONCURRENCY, "65"),
        (env_vars::CONNECT_TIMEOUT_MS, "0"),
    ] {
        with_env(&[(env_vars::FDC_API_KEY, "DEMO_KEY"), (name, value)]);
        assert!(
            matches!(
                GutcheckConfig::from_env(),
                Err(ConfigError::ValueOutOfRange(_))
            ),
            "{name}={value}"
        );
    }
    clear_env();
}

#[test]
#[serial]
fn test_missing_table_file_fails_engine_startup() {
    with_env(&[
        (env_vars::FDC_ENABLED, "false"),
        (env_vars::CLASSIFICATION_TABLES, "/nonexistent/tables.json"),
    ]);

    let config = GutcheckConfig::from_env().unwrap();
    let err = ReconciliationEngine::from_config(&config).err().unwrap();

    assert!(matches!(err, ConfigError::Io { .. }));
    clear_env();
}

#[test]
#[serial]
fn test_invalid_table_file_fails_engine_startup() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"{\"ingredient_categories\": {}}").unwrap();
    with_env(&[
        (env_vars::FDC_ENABLED, "false"),
        (env_vars::CLASSIFICATION_TABLES, file.path().to_str().unwrap()),
    ]);

    let config = GutcheckConfig::from_env().unwrap();
    let err = ReconciliationEngine::from_config(&config).err().unwrap();

    assert!(matches!(err, ConfigError::InvalidTables(_)));
    clear_env();
}

#[test]
#[serial]
fn test_custom_table_file_builds_engine() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(EMBEDDED_TABLES.as_bytes()).unwrap();
    with_env(&[
        (env_vars::FDC_API_KEY, "DEMO_KEY"),
        (env_vars::CLASSIFICATION_TABLES, file.path().to_str().unwrap()),
    ]);

    let config = GutcheckConfig::from_env().unwrap();
    let engine = ReconciliationEngine::from_config(&config).unwrap();

    assert_eq!(engine.settings().provider_timeout, Duration::from_secs(8));
    assert!(!engine.classifier().tables().allergen_rules.is_empty());
    clear_env();
}
