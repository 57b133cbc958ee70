//! # Trias CLI Module
//!
//! This module implements the CLI interface for Trias.
//!
//! ## Available Commands
//!
//! - `mine` - Enumerate the triadic concepts of a triple file
//! - `stats` - Summarize a triple file without mining

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trias_core::TriasError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trias - Triadic Concept Mining
///
/// Computes all triadic concepts of a ternary relation which fulfill
/// per-dimension minimal support constraints.
#[derive(Parser, Debug)]
#[command(name = "trias")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate the triadic concepts of a triple file
    Mine {
        /// Path to the input triple file (one "u t r" line per triple)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Minimum supports per dimension, e.g. "1,1,1"
        #[arg(short, long)]
        min_support: Option<String>,

        /// Explicit per-dimension cardinalities, e.g. "10,20,30"
        /// (derived from the data if omitted)
        #[arg(short, long)]
        cardinalities: Option<String>,

        /// Input identifiers are sparse; renumber densely and translate
        /// output back to the original identifiers
        #[arg(long)]
        holes: bool,

        /// Field delimiter character (any whitespace if omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output format (text, json)
        #[arg(short = 't', long)]
        format: Option<String>,

        /// Prefix every text output line with the three support sizes
        #[arg(long)]
        sizes: bool,

        /// Write one tag character per enumeration event to this file
        #[arg(long)]
        progress_file: Option<PathBuf>,

        /// TOML configuration file supplying defaults for the options above
        #[arg(short = 'C', long)]
        config: Option<PathBuf>,
    },

    /// Summarize a triple file without mining
    Stats {
        /// Path to the input triple file
        #[arg(short, long)]
        input: PathBuf,

        /// Field delimiter character (any whitespace if omitted)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Input identifiers are sparse
        #[arg(long)]
        holes: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), TriasError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Commands::Mine {
            input,
            output,
            min_support,
            cardinalities,
            holes,
            delimiter,
            format,
            sizes,
            progress_file,
            config,
        } => {
            let options = MineOptions {
                input,
                output,
                min_support,
                cardinalities,
                holes,
                delimiter,
                format,
                sizes,
                progress_file,
                config,
            };
            cmd_mine(options)
        }
        Commands::Stats {
            input,
            delimiter,
            holes,
        } => cmd_stats(&input, delimiter, holes, json_mode),
    }
}
