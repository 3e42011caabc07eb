// ABOUTME: USDA FoodData Central API client for branded food lookups
// ABOUTME: Barcodes are matched against gtinUpc in search results, ignoring leading zeros
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! USDA `FoodData` Central API Client
//!
//! Queries the Branded Foods data set through the search endpoint, which
//! returns nutrient values per 100 g alongside the GTIN/UPC of each product.
//! The API is free and requires an API key.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>

use async_trait::async_trait;
use gutcheck_core::constants::timeouts::DEFAULT_PROVIDER_TIMEOUT_MS;
use gutcheck_core::{LookupQuery, ProviderError, ProviderResult, ProviderTag};
use reqwest::Client;
use tracing::debug;

use crate::client::ProviderClient;
use crate::http_client::{decode_json, map_transport_error, shared_client};
use crate::payload::{FdcSearchResponse, RawPayload};

const PROVIDER: ProviderTag = ProviderTag::FoodDataCentral;

/// `FoodData` Central client configuration
#[derive(Debug, Clone)]
pub struct FoodDataCentralConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: String,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Search results requested per lookup (1-200)
    pub page_size: u32,
    /// Request timeout reported in timeout errors
    pub timeout_ms: u64,
}

impl Default for FoodDataCentralConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.nal.usda.gov/fdc/v1".to_owned(),
            page_size: 25,
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

/// USDA `FoodData` Central API client
pub struct FoodDataCentralClient {
    config: FoodDataCentralConfig,
    http_client: Client,
}

impl FoodDataCentralClient {
    /// Create a client on the shared connection pool
    #[must_use]
    pub fn new(config: FoodDataCentralConfig) -> Self {
        Self::with_http_client(config, shared_client().clone())
    }

    /// Create a client with a specific HTTP client
    #[must_use]
    pub const fn with_http_client(config: FoodDataCentralConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    async fn search(&self, query: &str, page_size: u32) -> ProviderResult<FdcSearchResponse> {
        let url = format!("{}/foods/search", self.config.base_url.trim_end_matches('/'));
        let page_size = page_size.clamp(1, 200).to_string();
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("query", query),
                ("dataType", "Branded"),
                ("pageSize", page_size.as_str()),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER, self.config.timeout_ms, &e))?;
        decode_json(PROVIDER, query, self.config.timeout_ms, response).await
    }

    /// Find the branded food whose GTIN/UPC matches `barcode`
    ///
    /// # Errors
    ///
    /// `NotFound` when no search result carries a matching GTIN, or when the
    /// barcode is all zeros and so can match nothing.
    pub async fn food_by_barcode(&self, barcode: &str) -> ProviderResult<RawPayload> {
        let wanted = strip_leading_zeros(barcode.trim());
        if wanted.is_empty() {
            return Err(ProviderError::not_found(PROVIDER, barcode));
        }
        let body = self.search(barcode, self.config.page_size).await?;
        body.foods
            .into_iter()
            .find(|food| {
                food.gtin_upc
                    .as_deref()
                    .is_some_and(|gtin| strip_leading_zeros(gtin.trim()) == wanted)
            })
            .map(RawPayload::from)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, barcode))
    }

    /// Search branded foods by text and return the first hit
    ///
    /// # Errors
    ///
    /// `NotFound` when the search returns no foods.
    pub async fn search_first(&self, text: &str) -> ProviderResult<RawPayload> {
        let body = self.search(text, 1).await?;
        body.foods
            .into_iter()
            .next()
            .map(RawPayload::from)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, text))
    }
}

fn strip_leading_zeros(code: &str) -> &str {
    code.trim_start_matches('0')
}

#[async_trait]
impl ProviderClient for FoodDataCentralClient {
    fn tag(&self) -> ProviderTag {
        PROVIDER
    }

    async fn lookup(&self, query: &LookupQuery) -> ProviderResult<RawPayload> {
        debug!(provider = %PROVIDER, identifier = %query, "Querying FoodData Central");
        match query {
            LookupQuery::Barcode(code) => self.food_by_barcode(code).await,
            LookupQuery::Text(text) => self.search_first(text).await,
        }
    }
}
