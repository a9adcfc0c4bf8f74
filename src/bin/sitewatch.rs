use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde_json::json;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use sitewatch::{
    config::Config,
    crawl::{CrawlEngine, CrawlError, CrawlRequest},
    fetcher::HttpFetcher,
    matcher::MatchLogic,
    orchestrator::{OrchestratorConfig, SiteOrchestrator},
    seeds::load_seeds,
    sentiment::{SentimentSummary, analyzer_for},
    session::SessionRecord,
};

const USAGE: &str = "usage: sitewatch <seed-file> <keyword> [keyword...]";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn env_date(name: &str) -> Result<Option<NaiveDate>> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .with_context(|| format!("{} must be YYYY-MM-DD", name)),
        _ => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(seed_file) = args.next() else {
        bail!(USAGE);
    };
    let keywords: Vec<String> = args.collect();

    let config = Config::from_env()?;
    let logic = match std::env::var("MATCH_LOGIC") {
        Ok(value) => value.parse::<MatchLogic>().map_err(anyhow::Error::msg)?,
        Err(_) => MatchLogic::default(),
    };
    let date_from = env_date("DATE_FROM")?;
    let date_to = env_date("DATE_TO")?;

    let seeds = load_seeds(&seed_file).await?;
    let mut requests = Vec::with_capacity(seeds.len());
    for seed in &seeds {
        let built = CrawlRequest::builder(seed.as_str(), keywords.iter().cloned())
            .logic(logic)
            .date_from(date_from)
            .date_to(date_to)
            .limits_from(&config)
            .build();
        match built {
            Ok(request) => requests.push(request),
            Err(e @ (CrawlError::InvalidSeed { .. } | CrawlError::UnsupportedScheme(_))) => {
                warn!("Skipping seed {}: {}", seed, e);
            }
            Err(e) => return Err(e).context(USAGE),
        }
    }
    let first_request = requests.first().cloned();

    let fetcher = HttpFetcher::from_config(&config)?;
    let mut engine = CrawlEngine::new(Arc::new(fetcher));
    if config.sentiment_enabled() {
        engine = engine.with_sentiment(analyzer_for(config.sentiment_method()));
    }
    let orchestrator = SiteOrchestrator::new(engine, OrchestratorConfig::from_config(&config));

    let shutdown_token = orchestrator.shutdown_token();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
            return;
        }
        info!("Received shutdown signal, stopping crawls...");
        shutdown_token.cancel();
    });

    let report = orchestrator.run(requests).await?;
    let summary = SentimentSummary::from_records(&report.matches);
    info!("{}", summary);

    if let (Ok(path), Some(request)) = (std::env::var("SESSION_FILE"), first_request) {
        let name = format!("{} ({})", keywords.join(", "), report.run_id);
        SessionRecord::new(name, &request, &report.matches)
            .save(&path)
            .await
            .with_context(|| format!("failed to save session to {}", path))?;
        info!("Session saved to {}", path);
    }

    let output = json!({
        "report": report,
        "sentiment_summary": summary,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
