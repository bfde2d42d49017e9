//! trialstats - descriptive report for clinical-trial CSV exports
//!
//! Loads a trial table, tags interventions and sponsors, counts them,
//! and writes charts, a summary table and a console digest.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Load, configuration or output error

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use report::{JsonReport, OutputPaths, RenderContext, ReportMetadata};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("trialstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .trialstats.toml.
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
    println!("   Edit it to customize top-N cuts, output names and chart sizes.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete pipeline: load, analyze, render, export.
fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;

    print!("{}", report::generate_banner());

    // Step 1: Load
    let dataset = loader::load_trials(&args.input)?;
    if dataset.is_empty() {
        warn!("{} contains no records", args.input.display());
    }

    // Steps 2-3: Extract and aggregate
    let aggregates = analysis::analyze(&dataset, &config.pipeline);
    print!(
        "{}",
        report::generate_overview_section(&dataset, &aggregates)
    );

    // Step 4: Report
    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory {}",
            args.output_dir.display()
        )
    })?;
    let paths = OutputPaths::new(&args.output_dir, &config.output);
    let mut written: Vec<(&Path, &str)> = Vec::new();

    if args.no_charts {
        info!("Chart rendering skipped (--no-charts)");
    } else {
        let ctx = RenderContext::from(&config.charts);

        report::render_dashboard(&ctx, &aggregates, &config.pipeline, &paths.dashboard)
            .with_context(|| format!("Failed to render {}", paths.dashboard.display()))?;
        println!("\n✓ Main visualization saved: {}", paths.dashboard.display());
        written.push((paths.dashboard.as_path(), "main dashboard"));

        report::render_intervention_breakdown(
            &ctx,
            &aggregates.top_interventions_detail,
            &config.pipeline,
            &paths.breakdown,
        )
        .with_context(|| format!("Failed to render {}", paths.breakdown.display()))?;
        println!(
            "✓ Intervention types visualization saved: {}",
            paths.breakdown.display()
        );
        written.push((paths.breakdown.as_path(), "detailed intervention breakdown"));
    }

    print!(
        "{}",
        report::generate_insights_section(&aggregates, &config.pipeline)
    );

    let rows = report::summary_rows(&aggregates, config.pipeline.summary_rows);
    report::write_summary(&paths.summary, &rows)?;
    println!("\n✓ Summary data exported: {}", paths.summary.display());
    written.push((paths.summary.as_path(), "summary statistics"));

    if let Some(ref json_path) = args.json {
        let json_report = JsonReport {
            metadata: ReportMetadata {
                input: args.input.display().to_string(),
                generated_at: Utc::now(),
                total_records: dataset.len(),
                columns: dataset.columns.clone(),
            },
            pipeline: &config.pipeline,
            aggregates: &aggregates,
        };
        report::write_json_report(&json_report, json_path)?;
        println!("✓ Aggregates exported: {}", json_path.display());
        written.push((json_path.as_path(), "aggregate export"));
    }

    print!("{}", report::generate_footer(&written));
    info!(
        "Report complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    load_config_in(args, Path::new("."))
}

/// Resolve the configuration, looking for the default file in `dir`.
///
/// A default file that exists but fails to parse is an error.
fn load_config_in(args: &Args, dir: &Path) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default_in(dir)? {
        Some(config) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
