// ABOUTME: Shared HTTP client with connection pooling for provider API calls
// ABOUTME: Maps transport failures and HTTP statuses onto the provider error taxonomy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::sync::OnceLock;
use std::time::Duration;

use gutcheck_core::constants::timeouts::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_PROVIDER_TIMEOUT_MS,
};
use gutcheck_core::{ProviderError, ProviderResult, ProviderTag};
use reqwest::{Client, ClientBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::warn;

/// Configured timeout values for the shared client (request, connect) in ms
static CLIENT_TIMEOUTS: OnceLock<(u64, u64)> = OnceLock::new();

/// Global shared HTTP client with configured timeouts
static SHARED_CLIENT: OnceLock<Client> = OnceLock::new();

/// Initialize the shared HTTP client timeout configuration
///
/// Must be called once at startup before any provider client is created.
/// If not called, the default provider and connect timeouts are used.
pub fn initialize_shared_client(timeout_ms: u64, connect_timeout_ms: u64) {
    let _ = CLIENT_TIMEOUTS.set((timeout_ms, connect_timeout_ms));
}

/// Get the shared HTTP client for provider API calls
///
/// This client uses connection pooling and configured timeouts.
pub fn shared_client() -> &'static Client {
    SHARED_CLIENT.get_or_init(|| {
        let (timeout, connect_timeout) = CLIENT_TIMEOUTS
            .get()
            .copied()
            .unwrap_or((DEFAULT_PROVIDER_TIMEOUT_MS, DEFAULT_CONNECT_TIMEOUT_MS));

        ClientBuilder::new()
            .timeout(Duration::from_millis(timeout))
            .connect_timeout(Duration::from_millis(connect_timeout))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

/// Map a reqwest transport error onto the provider taxonomy
pub(crate) fn map_transport_error(
    provider: ProviderTag,
    timeout_ms: u64,
    err: &reqwest::Error,
) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider,
            timeout_ms,
        }
    } else if err.is_decode() {
        ProviderError::malformed(provider, err.to_string())
    } else {
        ProviderError::transient(provider, err.to_string())
    }
}

/// Check the status of a provider response and decode its JSON body
///
/// 404 is "not found"; every other non-success status is transient.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    provider: ProviderTag,
    identifier: &str,
    timeout_ms: u64,
    response: Response,
) -> ProviderResult<T> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(ProviderError::not_found(provider, identifier));
    }
    if !status.is_success() {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(provider = %provider, status = status.as_u16(), "Provider rejected credentials");
            }
            StatusCode::TOO_MANY_REQUESTS => {
                warn!(provider = %provider, "Provider rate limit exceeded");
            }
            _ => {}
        }
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::http_status(provider, status.as_u16(), &body));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| map_transport_error(provider, timeout_ms, &e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ProviderError::malformed(provider, format!("JSON parse error: {e}")))
}
