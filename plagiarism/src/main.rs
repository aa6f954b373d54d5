use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use common::config::Config;
use common::logger::init_logger;
use plagiarism::check::PlagiarismChecker;
use plagiarism::document::DocumentRef;
use plagiarism::fetch::DocumentLoader;
use plagiarism::store::InMemorySubmissionStore;
use serde::Serialize;
use similarity::types::SimilarityReport;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

const ASSIGNMENT: &str = "cli";

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Full,
    Minimal,
}

/// Report how similar a submission is to earlier submissions.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// The new submission: a .docx or text file, or an http(s) URL
    document: String,
    /// Earlier submissions to compare against
    prior: Vec<String>,
    /// Output format: full (with per-file scores) or minimal
    #[arg(long, value_enum, default_value_t = OutputFormat::Full)]
    format: OutputFormat,
    /// Write the JSON report to this file instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct FileScore {
    location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    ratio: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct Output {
    document: String,
    percent: f64,
    best_match: Option<String>,
    compared: usize,
    skipped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    scores: Option<Vec<FileScore>>,
}

/// Report for `document`, with submission ids mapped back to the locations given on
/// the command line.
fn build_output(
    document: &str,
    report: SimilarityReport,
    locations: &HashMap<String, String>,
    format: OutputFormat,
) -> Output {
    let location_of = |id: &str| locations.get(id).cloned().unwrap_or_else(|| id.to_string());

    let scores = match format {
        OutputFormat::Full => Some(
            report
                .scores
                .into_iter()
                .map(|score| FileScore {
                    location: location_of(&score.id),
                    ratio: score.ratio,
                    error: score.error,
                })
                .collect(),
        ),
        OutputFormat::Minimal => None,
    };

    Output {
        document: document.to_string(),
        percent: report.percent,
        best_match: report.best_match.as_deref().map(location_of),
        compared: report.compared,
        skipped: report.skipped,
        scores,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::from_env().context("loading configuration")?;
    let mut log_config = config.log.clone();
    if args.out.is_none() {
        // stdout carries the report
        log_config.to_stdout = false;
    }
    let _log_guard = init_logger(&log_config).context("initialising logging")?;

    let loader = Arc::new(DocumentLoader::new(&config.fetch).context("building HTTP client")?);
    let store = Arc::new(InMemorySubmissionStore::new());

    let mut locations: HashMap<String, String> = HashMap::new();
    for prior in &args.prior {
        let record = store
            .insert_prior(ASSIGNMENT, "", Some(DocumentRef::parse(prior)))
            .await;
        locations.insert(record.id, prior.clone());
    }

    let checker = PlagiarismChecker::new(store, loader, config.fetch.concurrency);
    let report = checker
        .check(ASSIGNMENT, &DocumentRef::parse(&args.document), None)
        .await
        .with_context(|| format!("checking {}", args.document))?;

    let output = build_output(&args.document, report, &locations, args.format);

    let json = serde_json::to_string_pretty(&output)?;
    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
