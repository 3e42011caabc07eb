// ABOUTME: Command-line harness reconciling barcodes or food queries into JSON records
// ABOUTME: Reads GUTCHECK_* configuration from the environment and prints records to stdout
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 GutCheck Nutrition
//!
//! Usage:
//! ```bash
//! # Look up a barcode
//! GUTCHECK_FDC_API_KEY=DEMO_KEY gutcheck-lookup 041220120000
//!
//! # Several identifiers, both providers in parallel, pretty output
//! gutcheck-lookup --parallel --pretty 041220120000 "greek yogurt"
//!
//! # Open Food Facts only, stop after the first hit
//! GUTCHECK_FDC_ENABLED=false gutcheck-lookup --no-confirm 3017620422003
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::Parser;
use gutcheck::logging;
use gutcheck::{GutcheckConfig, ReconciliationEngine};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "gutcheck-lookup",
    about = "Look up nutrition data for barcodes or food queries",
    long_about = "Queries the configured nutrition providers for each identifier, reconciles their answers and prints one JSON record per identifier."
)]
struct Args {
    /// Barcodes (8-14 digits) or free-text food queries
    #[arg(required = true)]
    identifiers: Vec<String>,

    /// Per-provider timeout in milliseconds (1000-60000)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Query both providers concurrently
    #[arg(long)]
    parallel: bool,

    /// Skip the secondary provider when the primary answers
    #[arg(long)]
    no_confirm: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_from_env()?;

    let mut config = GutcheckConfig::from_env()?;
    if let Some(timeout_ms) = args.timeout_ms {
        config.provider_timeout_ms = timeout_ms;
    }
    if args.parallel {
        config.parallel_queries = true;
    }
    if args.no_confirm {
        config.confirm_with_secondary = false;
    }
    info!("{}", config.summary());

    let engine = ReconciliationEngine::from_config(&config)?;
    let records = engine.reconcile_batch(args.identifiers.as_slice()).await;

    let output = if args.pretty {
        serde_json::to_string_pretty(&records)?
    } else {
        serde_json::to_string(&records)?
    };
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{output}")?;
    Ok(())
}
