//! CLI entry point for the class-action registry pipeline.
//!
//! Provides subcommands for scraping the registry (or a saved page), running
//! the pipeline over a built-in sample, and re-analyzing or querying a
//! previous export.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use class_action_registry::analyzers::aggregate::{
    DEFAULT_HIGH_VALUE_THRESHOLD, DEFAULT_TOP_N, analyze, high_value_cases,
};
use class_action_registry::analyzers::analyzer::{analyze_file, load_cases};
use class_action_registry::analyzers::filter::{SearchField, filter_by_amount, search};
use class_action_registry::config::{
    DEFAULT_DATA_DIR, DEFAULT_HTTP_RETRIES, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_LOG_FILE_PATH,
    DEFAULT_REGISTRY_URL, DEFAULT_RETRY_DELAY_SECS, OutputPaths,
};
use class_action_registry::extractor::{DEFAULT_TARGET_ID, Extractor};
use class_action_registry::fetch::{BasicClient, Retry, fetch_text};
use class_action_registry::record::CanonicalCaseRecord;
use class_action_registry::sample::SAMPLE_HTML;
use class_action_registry::{logging, normalize, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "class_action_registry")]
#[command(about = "Scrape and analyze the class-action registry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the registry page (or read a saved copy), export cases and a report
    Scrape {
        /// URL to fetch or path to a saved HTML page
        #[arg(short, long, value_name = "URL_OR_FILE", env = "REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
        source: String,

        /// Directory for cases.csv, cases.json and analysis_report.json
        #[arg(short, long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        output_dir: PathBuf,

        /// Claim amount at or above which a case is high-value
        #[arg(short, long, env = "HIGH_VALUE_THRESHOLD", default_value_t = DEFAULT_HIGH_VALUE_THRESHOLD)]
        threshold: f64,

        /// Number of high-value cases kept in the report
        #[arg(short = 'n', long, env = "TOP_N", default_value_t = DEFAULT_TOP_N)]
        top_n: usize,

        /// Id of the hidden input holding the case array
        #[arg(long, env = "REGISTRY_TARGET_ID", default_value = DEFAULT_TARGET_ID)]
        target_id: String,

        /// Also accept case data from other hidden inputs
        #[arg(long, default_value_t = false)]
        scan_hidden_inputs: bool,

        /// HTTP timeout in seconds
        #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
        timeout_secs: u64,

        /// Total HTTP attempts before giving up
        #[arg(long, env = "HTTP_RETRIES", default_value_t = DEFAULT_HTTP_RETRIES)]
        retries: u32,
    },
    /// Run the pipeline over a built-in two-case sample page
    Demo {
        /// Directory for the exports
        #[arg(short, long, env = "DATA_DIR", default_value = DEFAULT_DATA_DIR)]
        output_dir: PathBuf,
    },
    /// Re-analyze a saved cases.csv or cases.json export
    Report {
        /// Export to analyze
        #[arg(short, long)]
        input: PathBuf,

        /// Write the report here instead of only logging it
        #[arg(short = 'o', long = "output")]
        report_path: Option<PathBuf>,

        #[arg(short, long, env = "HIGH_VALUE_THRESHOLD", default_value_t = DEFAULT_HIGH_VALUE_THRESHOLD)]
        threshold: f64,

        #[arg(short = 'n', long, env = "TOP_N", default_value_t = DEFAULT_TOP_N)]
        top_n: usize,
    },
    /// List high-value cases from a saved export, largest first
    HighValue {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long, env = "HIGH_VALUE_THRESHOLD", default_value_t = DEFAULT_HIGH_VALUE_THRESHOLD)]
        threshold: f64,

        /// Maximum number of cases to list
        #[arg(short, long, env = "TOP_N", default_value_t = DEFAULT_TOP_N)]
        limit: usize,
    },
    /// Search a saved export by text field and/or claim amount range
    Search {
        #[arg(short, long)]
        input: PathBuf,

        /// case_name, court_name or plaintiff_group
        #[arg(short, long, default_value = "case_name")]
        field: SearchField,

        /// Case-insensitive substring to look for
        #[arg(long)]
        term: Option<String>,

        #[arg(long)]
        min_amount: Option<f64>,

        #[arg(long)]
        max_amount: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
    let _log_guard = logging::init(&log_file_path);

    let cli = Cli::parse();

    match cli.command {
        Commands::Scrape {
            source,
            output_dir,
            threshold,
            top_n,
            target_id,
            scan_hidden_inputs,
            timeout_secs,
            retries,
        } => {
            let html = fetcher(&source, Duration::from_secs(timeout_secs), retries).await?;
            let extractor = Extractor::new(&target_id)?.scan_hidden_inputs(scan_hidden_inputs);
            run_pipeline(&html, &extractor, &OutputPaths::new(output_dir), threshold, top_n)
        }
        Commands::Demo { output_dir } => {
            info!("Running pipeline over the built-in sample page");
            run_pipeline(
                SAMPLE_HTML,
                &Extractor::default(),
                &OutputPaths::new(output_dir),
                DEFAULT_HIGH_VALUE_THRESHOLD,
                DEFAULT_TOP_N,
            )
        }
        Commands::Report {
            input,
            report_path,
            threshold,
            top_n,
        } => {
            let report = analyze_file(&input, threshold, top_n)?;
            output::log_summary(&report);
            match report_path {
                Some(path) => output::write_report_json(&path, &report)?,
                None => output::print_json(&report)?,
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::HighValue {
            input,
            threshold,
            limit,
        } => {
            let cases = load_cases(&input)?;
            let high_value = high_value_cases(&cases, threshold);
            info!(total = high_value.len(), threshold, "High-value cases");
            for case in high_value.iter().take(limit) {
                log_case(case);
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Search {
            input,
            field,
            term,
            min_amount,
            max_amount,
        } => {
            let mut pool = load_cases(&input)?;
            if min_amount.is_some() || max_amount.is_some() {
                let min = min_amount.unwrap_or(f64::NEG_INFINITY);
                let max = max_amount.unwrap_or(f64::INFINITY);
                pool = filter_by_amount(&pool, min, max).into_iter().cloned().collect();
            }

            let matches: Vec<&CanonicalCaseRecord> = match term.as_deref() {
                Some(term) => search(&pool, field, term),
                None => pool.iter().collect(),
            };

            info!(%field, term = term.as_deref().unwrap_or(""), count = matches.len(), "Search results");
            for case in matches {
                log_case(case);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads the registry page from a local file path or fetches it over HTTP.
#[tracing::instrument(skip(timeout, retries))]
async fn fetcher(source: &str, timeout: Duration, retries: u32) -> Result<String> {
    let html = if source.starts_with("http") {
        let client = Retry::new(
            BasicClient::with_timeout(timeout)?,
            retries,
            Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        );
        fetch_text(&client, source).await?
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("reading {source}"))?
    };
    Ok(html)
}

/// Extract, normalize, analyze and export. Fails the run when the page held
/// no case records.
#[tracing::instrument(skip(html, extractor, paths), fields(target_id = extractor.target_id(), output_dir = %paths.dir().display()))]
fn run_pipeline(
    html: &str,
    extractor: &Extractor,
    paths: &OutputPaths,
    threshold: f64,
    top_n: usize,
) -> Result<ExitCode> {
    let raw = extractor.extract(html);
    if raw.is_empty() {
        error!("No case records found");
        return Ok(ExitCode::FAILURE);
    }

    let cases = normalize(&raw);
    if cases.len() < raw.len() {
        warn!(skipped = raw.len() - cases.len(), "Some records could not be normalized");
    }

    let report = analyze(&cases, threshold, top_n);

    paths.ensure()?;
    output::write_cases_csv(&paths.cases_csv(), &cases)?;
    output::write_cases_json(&paths.cases_json(), &cases)?;
    output::write_report_json(&paths.report_json(), &report)?;
    output::log_summary(&report);
    output::print_pretty(&report);

    info!(cases = cases.len(), "Pipeline finished");
    Ok(ExitCode::SUCCESS)
}

fn log_case(case: &CanonicalCaseRecord) {
    info!(
        case = %case.case_display_id,
        name = %case.case_name,
        court = %case.court_name,
        group = %case.plaintiff_group,
        claim_amount = case.claim_amount,
        appeal = case.is_appeal_case(),
        "Case"
    );
}
