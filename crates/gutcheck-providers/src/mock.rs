// ABOUTME: Scripted in-memory provider for tests and offline runs (no API calls)
// ABOUTME: Returns configured payloads or failures per identifier, with optional latency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gutcheck_core::{LookupQuery, ProviderError, ProviderResult, ProviderTag};

use crate::client::ProviderClient;
use crate::payload::RawPayload;

/// What a [`MockProvider`] answers for an identifier
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return this payload
    Payload(RawPayload),
    /// Report the identifier as unknown
    NotFound,
    /// Fail with a transient error
    Transient(String),
    /// Fail with a malformed-response error
    Malformed(String),
    /// Never answer
    Hang,
}

/// Mock nutrition provider
///
/// Identifiers without a scripted response get the default response, which
/// is [`MockResponse::NotFound`] unless changed.
pub struct MockProvider {
    tag: ProviderTag,
    responses: HashMap<String, MockResponse>,
    default_response: MockResponse,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock that knows no products
    #[must_use]
    pub fn new(tag: ProviderTag) -> Self {
        Self {
            tag,
            responses: HashMap::new(),
            default_response: MockResponse::NotFound,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Script the response for one identifier
    #[must_use]
    pub fn with_response(mut self, identifier: impl Into<String>, response: MockResponse) -> Self {
        self.responses.insert(identifier.into(), response);
        self
    }

    /// Script a payload for one identifier
    #[must_use]
    pub fn with_payload(self, identifier: impl Into<String>, payload: impl Into<RawPayload>) -> Self {
        self.with_response(identifier, MockResponse::Payload(payload.into()))
    }

    /// Response for identifiers without a scripted response
    #[must_use]
    pub fn with_default(mut self, response: MockResponse) -> Self {
        self.default_response = response;
        self
    }

    /// Wait this long before answering every call
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of lookups received so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderClient for MockProvider {
    fn tag(&self) -> ProviderTag {
        self.tag
    }

    async fn lookup(&self, query: &LookupQuery) -> ProviderResult<RawPayload> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let identifier = query.as_str();
        let response = self
            .responses
            .get(identifier)
            .unwrap_or(&self.default_response);
        match response {
            MockResponse::Payload(payload) => Ok(payload.clone()),
            MockResponse::NotFound => Err(ProviderError::not_found(self.tag, identifier)),
            MockResponse::Transient(reason) => Err(ProviderError::transient(self.tag, reason.clone())),
            MockResponse::Malformed(reason) => Err(ProviderError::malformed(self.tag, reason.clone())),
            MockResponse::Hang => {
                std::future::pending::<()>().await;
                Err(ProviderError::transient(self.tag, "mock provider stopped hanging"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::OffProduct;

    #[tokio::test]
    async fn test_scripted_responses() {
        let mock = MockProvider::new(ProviderTag::OpenFoodFacts)
            .with_payload("12345678", OffProduct::default())
            .with_response("87654321", MockResponse::Transient("boom".to_owned()));

        let hit = LookupQuery::Barcode("12345678".to_owned());
        let failing = LookupQuery::Barcode("87654321".to_owned());
        let unknown = LookupQuery::Text("kale".to_owned());

        assert!(mock.lookup(&hit).await.is_ok());
        assert!(mock.lookup(&failing).await.is_err_and(|e| e.is_transient()));
        assert!(mock.lookup(&unknown).await.is_err_and(|e| !e.is_transient()));
        assert_eq!(mock.calls(), 3);
    }
}
