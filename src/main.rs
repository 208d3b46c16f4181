//! WaspCensus - social-interaction statistics for wasp nest censuses
//!
//! A CLI tool that reads a nest-by-date census of wasp sightings and
//! writes a pairwise interaction matrix, a per-wasp summary and an
//! interaction heatmap.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any error (missing or malformed census, config, write failure)

mod analysis;
mod census;
mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod report;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use models::CensusReport;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("WaspCensus v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_census(&args) {
        error!("Census run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .waspcensus.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize input, output paths and the heatmap.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Warning: failed to set tracing subscriber: {}", e);
    }
}

/// Run the complete census workflow.
fn run_census(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate().map_err(anyhow::Error::msg)?;

    if args.dry_run {
        return handle_dry_run(&config);
    }

    println!("📥 Reading census: {}", config.input.path.display());
    println!("\n🔬 Counting interactions...");
    let outcome = pipeline::run(&config, !args.quiet)?;

    print_summary(&outcome.report, config.general.top_pairs);

    println!("\n📝 Outputs:");
    for path in &outcome.written {
        println!("   {}", path.display());
    }

    println!(
        "\n✅ Census complete in {:.1}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Handle --dry-run: load the census, print its shape, write nothing.
fn handle_dry_run(config: &Config) -> Result<()> {
    println!("\n🔍 Dry run: validating census (no files written)...\n");

    let table = pipeline::load(config)?;
    let wasps = analysis::unique_wasps(&table);
    debug!("Nests: {}", table.nests().join(", "));
    debug!("Dates: {}", table.dates().join(", "));

    println!("   Nests: {}", table.nest_count());
    println!("   Dates: {}", table.date_count());
    println!("   Observations: {}", table.observation_count());
    println!("   Wasps: {}", wasps.len());
    if let Some((first, last)) = table.date_span() {
        println!("   Census span: {} to {}", first, last);
    }

    println!("\n✅ Dry run complete. Census is readable.");
    Ok(())
}

/// Print the run summary.
fn print_summary(report: &CensusReport, top: usize) {
    let meta = &report.metadata;

    println!("\n📊 Census Summary:");
    println!(
        "   Nests: {} | Dates: {} | Observations: {}",
        meta.nests, meta.dates, meta.observations
    );
    if let (Some(first), Some(last)) = (meta.first_date, meta.last_date) {
        println!("   Census span: {} to {}", first, last);
    }
    println!("   Wasps: {}", meta.wasps);
    println!(
        "   Co-observations: {}",
        analysis::total_interactions(&report.interaction_matrix)
    );

    if top == 0 {
        return;
    }

    let pairs = analysis::strongest_pairs(&report.interaction_matrix, top);
    if !pairs.is_empty() {
        println!("\n🐝 Strongest pairs:");
        for pair in &pairs {
            println!("   {} ({} times)", pair, pair.count);
        }
    }

    let social = analysis::most_social_wasps(&report.wasps, top);
    if !social.is_empty() {
        println!("\n🤝 Most social wasps:");
        for wasp in social {
            println!(
                "   {} ({} partners, {} days, {} nests)",
                wasp.id,
                wasp.partner_count(),
                wasp.days_seen,
                wasp.nests_visited
            );
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
