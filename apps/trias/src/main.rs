//! # Trias - Triadic Concept Mining
//!
//! The main binary for the Trias mining engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                apps/trias (THE BINARY)              │
//! │                                                     │
//! │  ┌──────────────┐          ┌────────────────────┐  │
//! │  │  CLI (clap)  │          │ readers / writers  │  │
//! │  └──────┬───────┘          └─────────┬──────────┘  │
//! │         │                            │             │
//! │         └──────────────┬─────────────┘             │
//! │                        ▼                           │
//! │                ┌──────────────┐                    │
//! │                │  trias-core  │                    │
//! │                │ (THE LOGIC)  │                    │
//! │                └──────────────┘                    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Mine all concepts with support thresholds 1,1,1
//! trias mine -i triples.txt -o concepts.txt -m 1,1,1
//!
//! # Sparse identifiers, JSON output
//! trias mine -i triples.txt --holes -t json
//!
//! # Summarize an input file without mining
//! trias stats -i triples.txt
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing — TRIAS_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TRIAS_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trias=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
