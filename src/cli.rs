//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// WaspCensus - social-interaction statistics for wasp nest censuses
///
/// Reads a census CSV (nests as rows, dates as columns, each cell a
/// comma-separated list of wasp IDs) and writes an interaction matrix,
/// a per-wasp summary and an interaction heatmap.
///
/// Examples:
///   waspcensus
///   waspcensus --input census_2020.csv --out-dir results
///   waspcensus --input census_2020.csv --json report.json --no-heatmap
///   waspcensus --input census_2020.csv --dry-run
///   waspcensus --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Census CSV file to analyze
    ///
    /// Defaults to wasp_census_2019.csv or the path in .waspcensus.toml.
    #[arg(short, long, value_name = "FILE", env = "WASPCENSUS_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory for output files with relative paths
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Output path for the interaction matrix CSV
    #[arg(long, value_name = "FILE")]
    pub matrix: Option<PathBuf>,

    /// Output path for the wasp summary CSV
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Output path for the heatmap HTML page
    #[arg(long, value_name = "FILE", conflicts_with = "no_heatmap")]
    pub heatmap: Option<PathBuf>,

    /// Also write a JSON report with metadata, matrix and summaries
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Skip rendering the heatmap
    #[arg(long)]
    pub no_heatmap: bool,

    /// Number of strongest wasp pairs to list (0 disables the listing)
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .waspcensus.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: load and validate the census without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .waspcensus.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref input) = self.input {
            if input.as_os_str().is_empty() {
                return Err("Input path must not be empty".to_string());
            }
        }

        if let Some(ref dir) = self.out_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Output directory is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
