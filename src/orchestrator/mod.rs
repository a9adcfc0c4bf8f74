//! Runs one crawl per seed with bounded cross-site parallelism.
//!
//! Every site gets its own engine run, its own [`CrawlRunState`] and an
//! outer deadline that can interrupt a stuck fetch. Results are merged after
//! each site finishes, in seed order, so no list is shared while crawling.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{Instant, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span, warn};
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::crawl::{CrawlEngine, CrawlError, CrawlRequest, CrawlRunState, CrawlStatus, DebugRow, PageRecord};

#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Sites crawled at the same time.
    pub concurrency: usize,
    /// Hard limit on a single site crawl, independent of its own budget.
    pub site_deadline: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            site_deadline: Duration::from_secs(130),
        }
    }
}

impl OrchestratorConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency(),
            site_deadline: config.site_deadline(),
        }
    }
}

/// How a site crawl ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SiteOutcome {
    Finished(CrawlStatus),
    DeadlineExceeded,
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub seed: Url,
    pub outcome: SiteOutcome,
    /// Where the crawl state ended up; `TimedOut` after a deadline.
    pub status: CrawlStatus,
    pub elapsed_ms: u64,
    pub pages_visited: usize,
    pub matches_found: usize,
}

/// Aggregate of all site crawls, merged in seed order.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub run_id: Uuid,
    pub sites: Vec<SiteSummary>,
    pub matches: Vec<PageRecord>,
    pub debug_rows: Vec<DebugRow>,
}

struct SiteResult {
    summary: SiteSummary,
    matches: Vec<PageRecord>,
    debug_rows: Vec<DebugRow>,
}

impl SiteResult {
    fn failed(seed: Url, reason: String, elapsed: Duration) -> Self {
        Self {
            debug_rows: vec![DebugRow::site_failed(&seed, reason.clone())],
            summary: SiteSummary {
                seed,
                outcome: SiteOutcome::Failed(reason),
                status: CrawlStatus::Idle,
                elapsed_ms: elapsed.as_millis() as u64,
                pages_visited: 0,
                matches_found: 0,
            },
            matches: Vec::new(),
        }
    }
}

pub struct SiteOrchestrator {
    engine: Arc<CrawlEngine>,
    config: OrchestratorConfig,
    run_id: Uuid,
    shutdown_token: CancellationToken,
}

impl SiteOrchestrator {
    pub fn new(engine: CrawlEngine, config: OrchestratorConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            config,
            run_id: Uuid::new_v4(),
            shutdown_token: CancellationToken::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Cancelling this token stops every in-flight site crawl at its next
    /// await point. Sites not yet started finish immediately as cancelled.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    pub async fn run(&self, requests: Vec<CrawlRequest>) -> Result<CrawlReport, CrawlError> {
        if requests.is_empty() {
            return Err(CrawlError::NoSeeds);
        }

        let concurrency = self.config.concurrency.max(1);
        info!(
            "Starting crawl run {} over {} sites - concurrency: {}, site_deadline: {:?}",
            self.run_id,
            requests.len(),
            concurrency,
            self.config.site_deadline
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));
        let mut handles = Vec::with_capacity(requests.len());
        for request in requests {
            let seed = request.seed().clone();
            let span = info_span!("site", run_id = %self.run_id, seed = %seed);
            let handle = tokio::spawn(
                crawl_site(
                    self.engine.clone(),
                    request,
                    semaphore.clone(),
                    self.config.site_deadline,
                    self.shutdown_token.child_token(),
                )
                .instrument(span),
            );
            handles.push((seed, Instant::now(), handle));
        }

        let mut report = CrawlReport {
            run_id: self.run_id,
            sites: Vec::new(),
            matches: Vec::new(),
            debug_rows: Vec::new(),
        };
        for (seed, spawned_at, handle) in handles {
            let site = match handle.await {
                Ok(site) => site,
                Err(e) => {
                    error!(seed = %seed, "Site crawl task failed: {}", e);
                    SiteResult::failed(seed, e.to_string(), spawned_at.elapsed())
                }
            };
            report.sites.push(site.summary);
            report.matches.extend(site.matches);
            report.debug_rows.extend(site.debug_rows);
        }

        info!(
            "Crawl run {} finished with {} matches",
            self.run_id,
            report.matches.len()
        );
        Ok(report)
    }
}

async fn crawl_site(
    engine: Arc<CrawlEngine>,
    request: CrawlRequest,
    semaphore: Arc<Semaphore>,
    deadline: Duration,
    cancel: CancellationToken,
) -> SiteResult {
    let seed = request.seed().clone();
    let Ok(_permit) = semaphore.acquire_owned().await else {
        return SiteResult::failed(seed, "worker pool closed".to_string(), Duration::ZERO);
    };

    let started = Instant::now();
    let mut state = CrawlRunState::new(&request);
    let outcome = run_with_deadline(&engine, &request, &mut state, deadline, &cancel).await;

    let pages_visited = state.pages_visited();
    let status = state.status();
    let (matches, debug_rows) = state.into_results();
    SiteResult {
        summary: SiteSummary {
            seed,
            outcome,
            status,
            elapsed_ms: started.elapsed().as_millis() as u64,
            pages_visited,
            matches_found: matches.len(),
        },
        matches,
        debug_rows,
    }
}

/// Run the engine over `state` for at most `deadline`. On expiry the crawl
/// future is dropped and the state is closed out as timed out, keeping
/// whatever it gathered.
async fn run_with_deadline(
    engine: &CrawlEngine,
    request: &CrawlRequest,
    state: &mut CrawlRunState,
    deadline: Duration,
    cancel: &CancellationToken,
) -> SiteOutcome {
    match timeout(deadline, engine.run(request, state, cancel)).await {
        Ok(status) => SiteOutcome::Finished(status),
        Err(_) => {
            warn!("Site deadline of {:?} exceeded, abandoning crawl", deadline);
            state.abandon();
            state.push_debug_row(DebugRow::deadline_exceeded(request.seed()));
            SiteOutcome::DeadlineExceeded
        }
    }
}
