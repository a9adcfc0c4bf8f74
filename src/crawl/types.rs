use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::config::Config;
use crate::crawl::CrawlError;
use crate::extractor::ExtractedDate;
use crate::fetcher::FetchError;
use crate::matcher::MatchLogic;
use crate::sentiment::SentimentResult;

pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_SITE_TIMEOUT: Duration = Duration::from_secs(120);

/// Parameters of one site crawl, validated on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlRequest {
    seed: Url,
    keywords: Vec<String>,
    logic: MatchLogic,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    max_pages: usize,
    site_timeout: Duration,
}

impl CrawlRequest {
    pub fn builder<I, S>(seed: impl Into<String>, keywords: I) -> CrawlRequestBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CrawlRequestBuilder {
            seed: seed.into(),
            keywords: keywords.into_iter().map(Into::into).collect(),
            logic: MatchLogic::default(),
            date_from: None,
            date_to: None,
            max_pages: DEFAULT_MAX_PAGES,
            site_timeout: DEFAULT_SITE_TIMEOUT,
        }
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn logic(&self) -> MatchLogic {
        self.logic
    }

    pub fn date_from(&self) -> Option<NaiveDate> {
        self.date_from
    }

    pub fn date_to(&self) -> Option<NaiveDate> {
        self.date_to
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub fn site_timeout(&self) -> Duration {
        self.site_timeout
    }

    /// Whether a page with publication date `date` passes the range filter.
    /// Undated pages always pass.
    pub fn accepts_date(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return true;
        };
        self.date_from.is_none_or(|from| date >= from) && self.date_to.is_none_or(|to| date <= to)
    }
}

#[derive(Debug, Clone)]
pub struct CrawlRequestBuilder {
    seed: String,
    keywords: Vec<String>,
    logic: MatchLogic,
    date_from: Option<NaiveDate>,
    date_to: Option<NaiveDate>,
    max_pages: usize,
    site_timeout: Duration,
}

impl CrawlRequestBuilder {
    pub fn logic(mut self, logic: MatchLogic) -> Self {
        self.logic = logic;
        self
    }

    pub fn date_from(mut self, from: Option<NaiveDate>) -> Self {
        self.date_from = from;
        self
    }

    pub fn date_to(mut self, to: Option<NaiveDate>) -> Self {
        self.date_to = to;
        self
    }

    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn site_timeout(mut self, timeout: Duration) -> Self {
        self.site_timeout = timeout;
        self
    }

    /// Take page cap and site budget from `config`.
    pub fn limits_from(self, config: &Config) -> Self {
        self.max_pages(config.max_pages())
            .site_timeout(config.site_timeout())
    }

    pub fn build(self) -> Result<CrawlRequest, CrawlError> {
        let keywords: Vec<String> = self
            .keywords
            .into_iter()
            .map(|kw| kw.trim().to_string())
            .filter(|kw| !kw.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(CrawlError::NoKeywords);
        }
        if self.max_pages == 0 {
            return Err(CrawlError::ZeroMaxPages);
        }
        if self.site_timeout.is_zero() {
            return Err(CrawlError::ZeroTimeout);
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(CrawlError::InvertedDateRange { from, to });
            }
        }

        Ok(CrawlRequest {
            seed: parse_seed(&self.seed)?,
            keywords,
            logic: self.logic,
            date_from: self.date_from,
            date_to: self.date_to,
            max_pages: self.max_pages,
            site_timeout: self.site_timeout,
        })
    }
}

fn parse_seed(raw: &str) -> Result<Url, CrawlError> {
    let seed = Url::parse(raw.trim()).map_err(|source| CrawlError::InvalidSeed {
        url: raw.to_string(),
        source,
    })?;
    match seed.scheme() {
        "http" | "https" if seed.host_str().is_some() => Ok(seed),
        "http" | "https" => Err(CrawlError::InvalidSeed {
            url: raw.to_string(),
            source: url::ParseError::EmptyHost,
        }),
        other => Err(CrawlError::UnsupportedScheme(other.to_string())),
    }
}

/// A page that matched the keywords and passed the date filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRecord {
    url: Url,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    date: Option<ExtractedDate>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    sentiment: Option<SentimentResult>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    checksum: Option<String>,
    fetched_at: DateTime<Utc>,
}

impl PageRecord {
    pub fn new(url: Url, status: u16) -> Self {
        Self {
            url,
            status,
            date: None,
            content: None,
            sentiment: None,
            language: None,
            checksum: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn with_date(mut self, date: Option<ExtractedDate>) -> Self {
        self.date = date;
        self
    }

    /// Attach extracted content along with its MD5 checksum.
    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.checksum = content.as_deref().map(content_checksum);
        self.content = content;
        self
    }

    pub fn with_sentiment(mut self, sentiment: Option<SentimentResult>) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language;
        self
    }

    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn date(&self) -> Option<&ExtractedDate> {
        self.date.as_ref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn sentiment(&self) -> Option<&SentimentResult> {
        self.sentiment.as_ref()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Drop extracted content, keeping everything else. Used when persisting.
    pub fn without_content(&self) -> Self {
        Self {
            content: None,
            ..self.clone()
        }
    }
}

pub fn content_checksum(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// What happened to a URL the crawler touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DebugEvent {
    Visited,
    FetchFailed {
        reason: String,
        /// HTTP status when the server answered with a non-success code.
        status: Option<u16>,
        /// Whether a later crawl could plausibly fetch it.
        retriable: bool,
    },
    /// Matched, but its content was already recorded from another URL.
    DuplicateContent,
    SiteDeadlineExceeded,
    SiteFailed { reason: String },
}

/// Audit record for every fetched URL, matched or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRow {
    pub url: String,
    pub keyword_found: bool,
    pub date: Option<NaiveDate>,
    pub raw_date: Option<String>,
    pub event: DebugEvent,
}

impl DebugRow {
    pub fn visited(url: &Url, keyword_found: bool, date: Option<&ExtractedDate>) -> Self {
        Self {
            url: url.to_string(),
            keyword_found,
            date: date.map(|d| d.date),
            raw_date: date.map(|d| d.raw.clone()),
            event: DebugEvent::Visited,
        }
    }

    pub fn fetch_failed(url: &Url, error: &FetchError) -> Self {
        Self::event(url, DebugEvent::FetchFailed {
            reason: error.to_string(),
            status: error.status(),
            retriable: error.is_transient(),
        })
    }

    pub fn deadline_exceeded(seed: &Url) -> Self {
        Self::event(seed, DebugEvent::SiteDeadlineExceeded)
    }

    pub fn site_failed(seed: &Url, reason: impl Into<String>) -> Self {
        Self::event(seed, DebugEvent::SiteFailed {
            reason: reason.into(),
        })
    }

    fn event(url: &Url, event: DebugEvent) -> Self {
        Self {
            url: url.to_string(),
            keyword_found: false,
            date: None,
            raw_date: None,
            event,
        }
    }
}
