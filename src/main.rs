use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cohort_match::config::{LogFormat, LoggingSettings, Settings, SimilarityProvider};
use cohort_match::core::{CompatibilityScorer, HeuristicScorer, Matcher, OracleScorer, ScoringStrategy};
use cohort_match::export::{render_summary, write_match_rows, write_report};
use cohort_match::services::{
    enrich_cohort, load_responses, ClaudeJudge, EmbeddingSimilarity, HttpProfileSource,
    LexicalSimilarity, TextSimilarity,
};

/// Pair up survey respondents by maximum total compatibility
#[derive(Debug, Parser)]
#[command(name = "cohort-match", version, about)]
struct Cli {
    /// Form export: the responses spreadsheet as CSV, or a JSON array of rows
    input: PathBuf,

    /// Where to write the JSON match report (overrides output.path)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write one CSV row per match (overrides output.csv_path)
    #[arg(long)]
    csv_output: Option<PathBuf>,

    /// Scoring strategy (overrides scoring.strategy)
    #[arg(short, long, value_enum)]
    strategy: Option<ScoringStrategy>,

    /// Configuration file used instead of config/default and config/local
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("Configuration error")?;

    if let Some(strategy) = cli.strategy {
        settings.scoring.strategy = strategy;
    }
    if let Some(output) = cli.output {
        settings.output.path = output;
    }
    if let Some(csv_output) = cli.csv_output {
        settings.output.csv_path = csv_output;
    }

    init_logging(&settings.logging);
    info!("Configuration loaded, scoring with {} strategy", settings.scoring.strategy);

    let mut people = load_responses(&cli.input)
        .with_context(|| format!("Could not load responses from {}", cli.input.display()))?;

    if settings.enrichment.enabled {
        let endpoint = settings
            .enrichment
            .endpoint
            .clone()
            .context("enrichment.enabled requires enrichment.endpoint")?;
        let source = HttpProfileSource::new(
            endpoint,
            settings.enrichment.api_key.clone(),
            Duration::from_secs(settings.enrichment.timeout_secs),
        )
        .context("Profile enrichment client")?;

        let summary = enrich_cohort(&source, &mut people, settings.matching.concurrency).await;
        info!(
            "Profile enrichment: {} enriched, {} not found, {} failed",
            summary.enriched, summary.missing, summary.failed
        );
    }

    let scorer = build_scorer(&settings)?;
    let matcher = Matcher::new(scorer, settings.matching.concurrency);

    let report = matcher.run(&people).await.context("Matching run aborted")?;

    write_report(&report, &settings.output.path)
        .with_context(|| format!("Could not write report to {}", settings.output.path.display()))?;
    write_match_rows(&report, &settings.output.csv_path).with_context(|| {
        format!("Could not write match rows to {}", settings.output.csv_path.display())
    })?;

    println!("{}", render_summary(&report, settings.output.top_n));
    Ok(())
}

fn init_logging(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Pretty => subscriber.pretty().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }
}

fn build_scorer(settings: &Settings) -> Result<Arc<dyn CompatibilityScorer>> {
    match settings.scoring.strategy {
        ScoringStrategy::Oracle => {
            let oracle = &settings.oracle;
            let api_key = oracle
                .api_key
                .clone()
                .context("Oracle strategy needs an API key: set ANTHROPIC_API_KEY or COHORT__ORACLE__API_KEY")?;
            let judge = ClaudeJudge::new(
                oracle.endpoint.clone(),
                api_key,
                oracle.model.clone(),
                oracle.max_tokens,
                Duration::from_secs(oracle.timeout_secs),
            )
            .context("Judgment oracle client")?;

            info!("Judgment oracle: {} via {}", oracle.model, oracle.endpoint);
            Ok(Arc::new(OracleScorer::new(Arc::new(judge))))
        }
        ScoringStrategy::Heuristic => {
            let similarity = &settings.similarity;
            let backend: Option<Arc<dyn TextSimilarity>> = match similarity.provider {
                SimilarityProvider::Lexical => Some(Arc::new(LexicalSimilarity::new())),
                SimilarityProvider::Embeddings => Some(Arc::new(
                    EmbeddingSimilarity::new(
                        similarity.endpoint.clone(),
                        similarity.api_key.clone(),
                        similarity.model.clone(),
                        Duration::from_secs(similarity.timeout_secs),
                        similarity.cache_size,
                    )
                    .context("Text similarity client")?,
                )),
                SimilarityProvider::Disabled => None,
            };

            match &backend {
                Some(backend) => info!("Ideal-type similarity backend: {}", backend.name()),
                None => info!("Ideal-type similarity disabled"),
            }
            Ok(Arc::new(HeuristicScorer::new(backend)))
        }
    }
}
