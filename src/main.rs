use analytics::{AnalyticsError, CompositeEngine, CompositeReport};
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use configuration::Config;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

// Exit codes
const EXIT_OK: u8 = 0;
const EXIT_DATA: u8 = 2;
const EXIT_COMPUTE: u8 = 3;
const EXIT_CONFIG: u8 = 4;

/// The main entry point for the Sanity Index batch scorer.
fn main() -> ExitCode {
    // A missing .env file is fine; RUST_LOG may come from the shell instead.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    ExitCode::from(run(cli))
}

/// Runs one command with logging installed. The log guard is dropped on
/// return, which flushes the file appender before the process exits.
fn run(cli: Cli) -> u8 {
    let _log_guard = init_tracing(cli.log_dir.as_ref());

    // Execute the appropriate command
    match cli.command {
        Commands::Compute(args) => handle_compute(args),
        Commands::Validate(args) => handle_validate(args),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Composite macro/market stress index (0-100, 50 = baseline).
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Also write logs to a daily rolling file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score the observations and write the headline and section tables.
    Compute(ComputeArgs),
    /// Load and validate a configuration file without computing anything.
    Validate(ValidateArgs),
}

#[derive(Parser)]
struct ComputeArgs {
    /// Path to the index configuration (.json or .toml).
    #[arg(long)]
    config: PathBuf,

    /// Long-format observations CSV with columns series_id,date,value.
    #[arg(long)]
    data: PathBuf,

    /// Directory for mom_scores.csv and section_scores.csv.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Also write the full report as report.json.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ValidateArgs {
    /// Path to the index configuration (.json or .toml).
    #[arg(long)]
    config: PathBuf,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_compute(args: ComputeArgs) -> u8 {
    let config = match configuration::load_config(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return EXIT_CONFIG;
        }
    };

    let ingested = match dataset::read_observations(&args.data) {
        Ok(i) => i,
        Err(e) => {
            eprintln!("Data error: {}", e);
            return EXIT_DATA;
        }
    };
    if !ingested.row_errors.is_empty() {
        eprintln!(
            "Skipped {} of {} rows in {}",
            ingested.row_errors.len(),
            ingested.rows_read,
            args.data.display()
        );
    }

    let engine = CompositeEngine::new(config);
    let report = match engine.compute(&ingested.observations) {
        Ok(r) => r,
        Err(e @ AnalyticsError::NoObservations) => {
            eprintln!("Data error: {}", e);
            return EXIT_DATA;
        }
        Err(e) => {
            eprintln!("Computation failed: {}", e);
            return EXIT_COMPUTE;
        }
    };

    if let Err(e) = write_outputs(&report, &args) {
        eprintln!("Failed to write results: {:#}", e);
        return EXIT_DATA;
    }

    println!("{}", summary_table(&report));
    for skipped in &report.skipped_indicators {
        println!(
            "  no data for indicator '{}' (section '{}')",
            skipped.indicator_id, skipped.section_id
        );
    }
    EXIT_OK
}

fn write_outputs(report: &CompositeReport, args: &ComputeArgs) -> anyhow::Result<()> {
    let files = dataset::write_report(report, &args.out_dir)?;
    println!(
        "Wrote {} and {}",
        files.headline.display(),
        files.sections.display()
    );

    if args.json {
        let path = args.out_dir.join("report.json");
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> u8 {
    match configuration::load_config(&args.config) {
        Ok(config) => {
            println!("{}", config_table(&config));
            println!("Configuration OK: {}", args.config.display());
            EXIT_OK
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            EXIT_CONFIG
        }
    }
}

// ==============================================================================
// Tables
// ==============================================================================

fn summary_table(report: &CompositeReport) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Series", "Weight", "Latest", "Score", "Momentum"]);

    let (month, value) = split(report.latest_headline());
    table.add_row(vec![
        "Headline (smoothed)".to_string(),
        "-".to_string(),
        month,
        value,
        report.headline_momentum().to_string(),
    ]);

    for (section, (_, momentum)) in report.sections.iter().zip(report.section_momentum()) {
        let latest = analytics::report::latest(&report.calendar, &section.scores);
        let (month, value) = split(latest);
        table.add_row(vec![
            section.id.clone(),
            format!("{:.2}", section.weight),
            month,
            value,
            momentum.to_string(),
        ]);
    }
    table
}

fn split(latest: Option<(NaiveDate, f64)>) -> (String, String) {
    match latest {
        Some((date, value)) => (date.format("%Y-%m").to_string(), format!("{:.1}", value)),
        None => ("-".to_string(), "n/a".to_string()),
    }
}

fn config_table(config: &Config) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Section", "Weight", "Indicator", "Transform", "Direction", "Method", "Window",
        ]);

    for section in &config.sections {
        for (i, indicator) in section.indicators.iter().enumerate() {
            let normalise = indicator.normalise_or_default();
            table.add_row(vec![
                section.id.clone(),
                format!("{:.2}", section.weight),
                format!("{} ({:.2})", indicator.id, section.indicator_weight(i)),
                indicator.transform.as_str().to_string(),
                format!("{:?}", indicator.direction),
                format!("{:?}", normalise.method),
                normalise.window().to_string(),
            ]);
        }
    }
    table
}

// ==============================================================================
// Logging
// ==============================================================================

/// Console logging filtered by RUST_LOG (default `info`), plus an optional daily log file.
fn init_tracing(log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            use tracing_subscriber::layer::SubscriberExt;
            use tracing_subscriber::util::SubscriberInitExt;

            let appender = tracing_appender::rolling::daily(dir, "sanity-index.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let installed = tracing_subscriber::registry()
                .with(filter())
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init();
            if let Err(e) = installed {
                eprintln!("Failed to install logger: {}", e);
            }
            Some(guard)
        }
        None => {
            let subscriber = fmt::Subscriber::builder()
                .with_env_filter(filter())
                .with_writer(std::io::stderr)
                .finish();
            if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
                eprintln!("Failed to install logger: {}", e);
            }
            None
        }
    }
}
