// ABOUTME: The ProviderClient trait every nutrition data source implements
// ABOUTME: One lookup per call; clients hold no per-lookup state
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use async_trait::async_trait;
use gutcheck_core::{LookupQuery, ProviderResult, ProviderTag};

use crate::payload::RawPayload;

/// A nutrition data provider
///
/// Implementations must be safe to call concurrently from many lookups. A
/// call either yields the provider's payload for the best match or a
/// [`gutcheck_core::ProviderError`] saying why there is none.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Which provider this client talks to
    fn tag(&self) -> ProviderTag;

    /// Fetch the best-matching product for `query`
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the provider has no match, `Transient` for
    /// transport or HTTP failures, `Timeout` when the request timed out and
    /// `MalformedResponse` when the body could not be decoded.
    async fn lookup(&self, query: &LookupQuery) -> ProviderResult<RawPayload>;
}
