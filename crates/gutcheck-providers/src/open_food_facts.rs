// ABOUTME: Open Food Facts API client for barcode and free-text product lookups
// ABOUTME: Returns the raw product object; a status of 0 or HTTP 404 means the product is unknown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! Open Food Facts API Client
//!
//! Open Food Facts is a community-maintained product database with rich
//! ingredient, allergen and additive data. It needs no API key but asks
//! clients to send a descriptive `User-Agent`.
//!
//! # API Reference
//! <https://openfoodfacts.github.io/openfoodfacts-server/api/>

use async_trait::async_trait;
use gutcheck_core::constants::timeouts::DEFAULT_PROVIDER_TIMEOUT_MS;
use gutcheck_core::{LookupQuery, ProviderError, ProviderResult, ProviderTag};
use reqwest::header::USER_AGENT;
use reqwest::Client;
use tracing::debug;

use crate::client::ProviderClient;
use crate::http_client::{decode_json, map_transport_error, shared_client};
use crate::payload::{OffProductResponse, OffSearchResponse, RawPayload};

const PROVIDER: ProviderTag = ProviderTag::OpenFoodFacts;

/// Open Food Facts client configuration
#[derive(Debug, Clone)]
pub struct OpenFoodFactsConfig {
    /// Base URL (default: <https://world.openfoodfacts.org>)
    pub base_url: String,
    /// `User-Agent` sent with every request
    pub user_agent: String,
    /// Request timeout reported in timeout errors
    pub timeout_ms: u64,
}

impl Default for OpenFoodFactsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://world.openfoodfacts.org".to_owned(),
            user_agent: format!("GutCheck/{} (nutrition lookup)", env!("CARGO_PKG_VERSION")),
            timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
        }
    }
}

/// Open Food Facts API client
pub struct OpenFoodFactsClient {
    config: OpenFoodFactsConfig,
    http_client: Client,
}

impl OpenFoodFactsClient {
    /// Create a client on the shared connection pool
    #[must_use]
    pub fn new(config: OpenFoodFactsConfig) -> Self {
        Self::with_http_client(config, shared_client().clone())
    }

    /// Create a client with a specific HTTP client
    #[must_use]
    pub const fn with_http_client(config: OpenFoodFactsConfig, http_client: Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        identifier: &str,
    ) -> ProviderResult<T> {
        let response = request
            .header(USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| map_transport_error(PROVIDER, self.config.timeout_ms, &e))?;
        decode_json(PROVIDER, identifier, self.config.timeout_ms, response).await
    }

    /// Look up a product by barcode
    ///
    /// # Errors
    ///
    /// `NotFound` when Open Food Facts reports status 0, answers 404 or
    /// omits the product object; other failures per [`ProviderClient::lookup`].
    pub async fn product_by_barcode(&self, barcode: &str) -> ProviderResult<RawPayload> {
        let url = format!("{}/api/v2/product/{barcode}.json", self.base_url());
        let body: OffProductResponse = self
            .get_json(self.http_client.get(&url), barcode)
            .await?;

        if body.status == Some(0) {
            return Err(ProviderError::not_found(PROVIDER, barcode));
        }
        body.product
            .map(RawPayload::from)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, barcode))
    }

    /// Search products by free text and return the first hit
    ///
    /// # Errors
    ///
    /// `NotFound` when the search returns no products.
    pub async fn search_first(&self, text: &str) -> ProviderResult<RawPayload> {
        let url = format!("{}/cgi/search.pl", self.base_url());
        let request = self.http_client.get(&url).query(&[
            ("search_terms", text),
            ("search_simple", "1"),
            ("action", "process"),
            ("json", "1"),
            ("page_size", "1"),
        ]);
        let body: OffSearchResponse = self.get_json(request, text).await?;

        body.products
            .into_iter()
            .next()
            .map(RawPayload::from)
            .ok_or_else(|| ProviderError::not_found(PROVIDER, text))
    }
}

#[async_trait]
impl ProviderClient for OpenFoodFactsClient {
    fn tag(&self) -> ProviderTag {
        PROVIDER
    }

    async fn lookup(&self, query: &LookupQuery) -> ProviderResult<RawPayload> {
        debug!(provider = %PROVIDER, identifier = %query, "Querying Open Food Facts");
        match query {
            LookupQuery::Barcode(code) => self.product_by_barcode(code).await,
            LookupQuery::Text(text) => self.search_first(text).await,
        }
    }
}
