// ABOUTME: Reconciliation module organizing provider fan-out, candidate merge and fallback
// ABOUTME: Exposes the engine, its settings and per-provider attempt reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition

//! # Reconciliation
//!
//! One lookup walks a fixed state machine:
//!
//! 1. query the primary provider (bounded by the per-call timeout)
//! 2. query the secondary provider when the primary failed, or always when
//!    confirmation is enabled
//! 3. select the single candidate, or rank both by quality score and merge
//! 4. otherwise fall back to the static fixture table, then to an
//!    "Unknown Product" record
//!
//! Every lookup ends with exactly one record and retains no state.

mod engine;
mod fallback;
mod merge;

pub use engine::{
    AttemptOutcome, EngineSettings, ProviderAttempt, ReconciliationEngine, ReconciliationOutcome,
};
pub use fallback::{fallback_record, fixture_identifiers};
