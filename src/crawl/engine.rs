use std::sync::Arc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::crawl::{CrawlRequest, CrawlRunState, CrawlStatus, DebugEvent, DebugRow, PageRecord};
use crate::extractor::language::detect_language;
use crate::extractor::{DateExtractor, ParsedPage, discover_links, extract_content, same_origin};
use crate::fetcher::{PageFetcher, PageResponse};
use crate::matcher::matches_keywords;
use crate::sentiment::{SentimentAnalyzer, analyze};

/// Breadth-first, same-origin crawler for a single site.
pub struct CrawlEngine {
    fetcher: Arc<dyn PageFetcher>,
    dates: DateExtractor,
    sentiment: Option<Arc<dyn SentimentAnalyzer>>,
}

impl CrawlEngine {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            dates: DateExtractor::default(),
            sentiment: None,
        }
    }

    pub fn with_date_extractor(mut self, dates: DateExtractor) -> Self {
        self.dates = dates;
        self
    }

    /// Score the content of every matched page with `analyzer`.
    pub fn with_sentiment(mut self, analyzer: Arc<dyn SentimentAnalyzer>) -> Self {
        self.sentiment = Some(analyzer);
        self
    }

    /// Crawl `request` to completion with fresh state.
    pub async fn crawl(&self, request: &CrawlRequest) -> CrawlRunState {
        let mut state = CrawlRunState::new(request);
        self.run(request, &mut state, &CancellationToken::new()).await;
        state
    }

    /// Drive `state` until the frontier empties, `max_pages` URLs have been
    /// visited, the site budget elapses, or `cancel` fires.
    ///
    /// The budget is checked between fetches, so a crawl can overrun it by
    /// at most one fetch timeout.
    #[instrument(skip_all, fields(seed = %request.seed()))]
    pub async fn run(
        &self,
        request: &CrawlRequest,
        state: &mut CrawlRunState,
        cancel: &CancellationToken,
    ) -> CrawlStatus {
        let started = Instant::now();
        state.status = CrawlStatus::Running;
        info!(
            "Crawling with max_pages: {}, site_timeout: {:?}",
            request.max_pages(),
            request.site_timeout()
        );

        let status = loop {
            if cancel.is_cancelled() {
                break CrawlStatus::Cancelled;
            }
            if state.frontier.visited_len() >= request.max_pages() {
                break CrawlStatus::Exhausted;
            }
            if started.elapsed() >= request.site_timeout() {
                break CrawlStatus::TimedOut;
            }
            let Some(url) = state.frontier.pop() else {
                break CrawlStatus::Completed;
            };
            if !state.frontier.mark_visited(&url) {
                continue;
            }

            let fetched = tokio::select! {
                biased;
                _ = cancel.cancelled() => break CrawlStatus::Cancelled,
                fetched = self.fetcher.fetch(&url) => fetched,
            };

            match fetched {
                Ok(response) => self.process_page(request, state, &url, response),
                Err(e) => {
                    warn!(
                        url = %url,
                        status = ?e.status(),
                        retriable = e.is_transient(),
                        "Fetch failed: {}",
                        e
                    );
                    state.debug_rows.push(DebugRow::fetch_failed(&url, &e));
                }
            }
        };

        state.status = status;
        info!(
            "Crawl finished: {} after {} pages, {} matches in {:?}",
            status,
            state.frontier.visited_len(),
            state.matches.len(),
            started.elapsed()
        );
        status
    }

    fn process_page(
        &self,
        request: &CrawlRequest,
        state: &mut CrawlRunState,
        url: &Url,
        response: PageResponse,
    ) {
        let page = ParsedPage::parse(&response);
        if page.url() != url {
            state.frontier.alias(page.url());
            if url == request.seed()
                && !state.origins.iter().any(|origin| same_origin(page.url(), origin))
            {
                debug!(seed = %url, origin = %page.url(), "Seed redirected to another origin");
                state.origins.push(page.url().clone());
            }
        }
        let keyword_found = matches_keywords(page.text(), request.keywords(), request.logic());
        let date = self.dates.extract(page.document(), page.text());
        let mut row = DebugRow::visited(url, keyword_found, date.as_ref());

        if keyword_found {
            let content = extract_content(page.document());
            if request.accepts_date(date.as_ref().map(|d| d.date)) {
                let record = PageRecord::new(url.clone(), response.status.as_u16())
                    .with_fetched_at(response.fetched_at)
                    .with_date(date)
                    .with_content(content);

                let duplicate = record
                    .checksum()
                    .is_some_and(|sum| !state.checksums.insert(sum.to_string()));
                if duplicate {
                    debug!(url = %url, "Skipping duplicate content");
                    row.event = DebugEvent::DuplicateContent;
                } else {
                    debug!(url = %url, "Page matched");
                    state.matches.push(self.annotate(record));
                }
            } else {
                debug!(url = %url, "Match outside date range");
            }
        }
        state.debug_rows.push(row);

        for link in discover_links(page.document(), page.url(), &state.origins) {
            state.frontier.push(link);
        }
    }

    fn annotate(&self, record: PageRecord) -> PageRecord {
        let language = record.content().and_then(detect_language);
        let sentiment = match (&self.sentiment, record.content()) {
            (Some(analyzer), Some(content)) => Some(analyze(analyzer.as_ref(), content)),
            _ => None,
        };
        record.with_language(language).with_sentiment(sentiment)
    }
}
