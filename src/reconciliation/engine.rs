// ABOUTME: Reconciliation engine querying primary and secondary providers under a timeout
// ABOUTME: Ranks candidates, merges donors, falls back to fixtures and supports batch/cancel
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::{self, StreamExt};
use gutcheck_core::constants::batch::DEFAULT_CONCURRENCY;
use gutcheck_core::constants::timeouts::DEFAULT_PROVIDER_TIMEOUT_MS;
use gutcheck_core::{
    ConfigError, LookupQuery, NutritionRecord, ProviderError, ProviderResult, ProviderTag,
};
use gutcheck_intelligence::TextClassifier;
use gutcheck_providers::{
    initialize_shared_client, normalize, FoodDataCentralClient, OpenFoodFactsClient,
    ProviderClient, RawPayload,
};
use serde::Serialize;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::fallback::fallback_record;
use super::merge::{select_or_merge, Candidate};
use crate::config::GutcheckConfig;
use crate::logging::LookupLogger;

/// Tunable engine behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Upper bound on each provider call
    pub provider_timeout: Duration,
    /// Query the secondary provider even when the primary succeeded
    pub confirm_with_secondary: bool,
    /// Query both providers concurrently instead of one after the other
    pub parallel_queries: bool,
    /// Identifiers reconciled at once by [`ReconciliationEngine::reconcile_batch`]
    pub batch_concurrency: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            provider_timeout: Duration::from_millis(DEFAULT_PROVIDER_TIMEOUT_MS),
            confirm_with_secondary: true,
            parallel_queries: false,
            batch_concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// How one provider call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// The provider returned a product with this quality score
    Found {
        /// Quality score of the classified record
        score: u32,
    },
    /// The provider does not know the identifier
    NotFound,
    /// Transport, timeout, status or payload failure
    Failed {
        /// Error label (`transient`, `timeout`, `malformed_response`)
        kind: &'static str,
    },
}

/// Observability record of one provider call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderAttempt {
    /// Provider that was queried
    pub provider: ProviderTag,
    /// What came back
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
    /// Wall time spent on the call
    pub elapsed: Duration,
}

/// Reconciled record together with the provider calls behind it
#[derive(Debug, Clone)]
pub struct ReconciliationOutcome {
    /// The single record returned for the lookup
    pub record: NutritionRecord,
    /// Provider calls in the order they were issued
    pub attempts: Vec<ProviderAttempt>,
}

/// Multi-provider nutrition lookup
///
/// Holds only shared, immutable state, so one engine serves any number of
/// concurrent lookups.
#[derive(Clone)]
pub struct ReconciliationEngine {
    primary: Arc<dyn ProviderClient>,
    secondary: Option<Arc<dyn ProviderClient>>,
    classifier: Arc<TextClassifier>,
    settings: EngineSettings,
}

impl ReconciliationEngine {
    /// Create an engine over explicit provider clients
    #[must_use]
    pub fn new(
        primary: Arc<dyn ProviderClient>,
        secondary: Option<Arc<dyn ProviderClient>>,
        classifier: Arc<TextClassifier>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            primary,
            secondary,
            classifier,
            settings,
        }
    }

    /// Build the production engine from startup configuration
    ///
    /// Initializes the shared HTTP client, loads the classification tables
    /// and orders the providers as configured.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the configuration is invalid or the
    /// classification table file cannot be loaded.
    pub fn from_config(config: &GutcheckConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        initialize_shared_client(config.provider_timeout_ms, config.connect_timeout_ms);

        let classifier = Arc::new(TextClassifier::new(config.load_tables()?));
        let off: Arc<dyn ProviderClient> =
            Arc::new(OpenFoodFactsClient::new(config.open_food_facts_config()));
        let fdc: Option<Arc<dyn ProviderClient>> = config
            .food_data_central_config()
            .map(|fdc| Arc::new(FoodDataCentralClient::new(fdc)) as Arc<dyn ProviderClient>);

        let (primary, secondary) = match (config.primary_provider, fdc) {
            (ProviderTag::FoodDataCentral, Some(fdc)) => (fdc, Some(off)),
            (_, fdc) => (off, fdc),
        };

        info!(
            primary = %primary.tag(),
            secondary = secondary.as_ref().map_or("none", |client| client.tag().name()),
            timeout_ms = config.provider_timeout_ms,
            confirm_with_secondary = config.confirm_with_secondary,
            parallel_queries = config.parallel_queries,
            "Reconciliation engine initialized"
        );

        Ok(Self::new(primary, secondary, classifier, config.engine_settings()))
    }

    /// Settings in effect
    #[must_use]
    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Classifier used to enrich provider records
    #[must_use]
    pub fn classifier(&self) -> &TextClassifier {
        &self.classifier
    }

    /// Look up a barcode or free-text query and return exactly one record
    pub async fn reconcile(&self, identifier: &str) -> NutritionRecord {
        self.reconcile_outcome(identifier).await.record
    }

    /// Like [`Self::reconcile`], also reporting every provider call made
    pub async fn reconcile_outcome(&self, identifier: &str) -> ReconciliationOutcome {
        let Some(query) = LookupQuery::parse(identifier) else {
            debug!("Empty identifier, skipping provider lookups");
            return ReconciliationOutcome {
                record: NutritionRecord::unknown(identifier),
                attempts: Vec::new(),
            };
        };

        let mut attempts = Vec::with_capacity(2);
        let mut candidates = Vec::with_capacity(2);
        for (attempt, candidate) in self.query_providers(&query).await {
            attempts.push(attempt);
            candidates.extend(candidate);
        }

        let record = select_or_merge(candidates, query.as_str(), self.classifier.as_ref())
            .or_else(|| fallback_record(query.as_str(), &self.classifier))
            .unwrap_or_else(|| NutritionRecord::unknown(query.as_str()));

        LookupLogger::reconciled(query.as_str(), &record, attempts.len());
        ReconciliationOutcome { record, attempts }
    }

    /// Like [`Self::reconcile`], abandoning the lookup when `token` fires
    ///
    /// In-flight provider calls are dropped on cancellation and `None` is
    /// returned.
    pub async fn reconcile_cancellable(
        &self,
        identifier: &str,
        token: &CancellationToken,
    ) -> Option<NutritionRecord> {
        tokio::select! {
            biased;
            () = token.cancelled() => {
                info!(identifier = identifier.trim(), "Lookup cancelled");
                None
            }
            record = self.reconcile(identifier) => Some(record),
        }
    }

    /// Reconcile many identifiers with bounded parallelism
    ///
    /// Records come back in input order.
    pub async fn reconcile_batch<S: AsRef<str> + Sync>(
        &self,
        identifiers: &[S],
    ) -> Vec<NutritionRecord> {
        let concurrency = self.settings.batch_concurrency.max(1);
        debug!(count = identifiers.len(), concurrency, "Starting batch lookup");
        stream::iter(identifiers)
            .map(|identifier| self.reconcile(identifier.as_ref()))
            .buffered(concurrency)
            .collect()
            .await
    }

    async fn query_providers(
        &self,
        query: &LookupQuery,
    ) -> Vec<(ProviderAttempt, Option<Candidate>)> {
        let Some(secondary) = self.secondary.as_deref() else {
            return vec![self.attempt(self.primary.as_ref(), query).await];
        };

        if self.settings.parallel_queries {
            let (first, second) = tokio::join!(
                self.attempt(self.primary.as_ref(), query),
                self.attempt(secondary, query)
            );
            return vec![first, second];
        }

        let first = self.attempt(self.primary.as_ref(), query).await;
        if first.1.is_some() && !self.settings.confirm_with_secondary {
            debug!(identifier = %query, "Primary answered, secondary confirmation disabled");
            return vec![first];
        }
        let second = self.attempt(secondary, query).await;
        vec![first, second]
    }

    async fn attempt(
        &self,
        client: &dyn ProviderClient,
        query: &LookupQuery,
    ) -> (ProviderAttempt, Option<Candidate>) {
        let provider = client.tag();
        let started = Instant::now();
        let result = self.lookup_with_timeout(client, query).await;
        let elapsed = started.elapsed();

        match result {
            Ok(payload) => {
                let draft = normalize(&payload);
                let candidate =
                    Candidate::new(provider, self.classifier.enrich(draft, query.as_str()));
                LookupLogger::provider_found(provider, query.as_str(), candidate.score, elapsed);
                let attempt = ProviderAttempt {
                    provider,
                    outcome: AttemptOutcome::Found {
                        score: candidate.score,
                    },
                    elapsed,
                };
                (attempt, Some(candidate))
            }
            Err(error) => {
                LookupLogger::provider_failed(&error, query.as_str(), elapsed);
                let outcome = if error.is_transient() {
                    AttemptOutcome::Failed {
                        kind: error.label(),
                    }
                } else {
                    AttemptOutcome::NotFound
                };
                let attempt = ProviderAttempt {
                    provider,
                    outcome,
                    elapsed,
                };
                (attempt, None)
            }
        }
    }

    async fn lookup_with_timeout(
        &self,
        client: &dyn ProviderClient,
        query: &LookupQuery,
    ) -> ProviderResult<RawPayload> {
        let limit = self.settings.provider_timeout;
        timeout(limit, client.lookup(query))
            .await
            .unwrap_or_else(|_| {
                Err(ProviderError::Timeout {
                    provider: client.tag(),
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                })
            })
    }
}
