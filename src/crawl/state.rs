use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use url::Url;

use crate::crawl::{CrawlRequest, DebugRow, Frontier, PageRecord};

/// Lifecycle of one site crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlStatus {
    Idle,
    Running,
    /// The frontier ran dry.
    Completed,
    /// `max_pages` URLs were visited.
    Exhausted,
    /// The per-site time budget ran out.
    TimedOut,
    Cancelled,
}

impl CrawlStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Idle | Self::Running)
    }
}

impl fmt::Display for CrawlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Exhausted => "exhausted",
            Self::TimedOut => "timed_out",
            Self::Cancelled => "cancelled",
        })
    }
}

/// Everything a site crawl accumulates.
///
/// Owned by the caller and lent to the engine, so whatever was gathered
/// before an outer deadline dropped the crawl future is still available.
#[derive(Debug)]
pub struct CrawlRunState {
    pub(crate) frontier: Frontier,
    /// Origins links may stay on: the seed's, plus wherever the seed redirected.
    pub(crate) origins: Vec<Url>,
    pub(crate) matches: Vec<PageRecord>,
    pub(crate) debug_rows: Vec<DebugRow>,
    pub(crate) checksums: HashSet<String>,
    pub(crate) status: CrawlStatus,
}

impl CrawlRunState {
    pub fn new(request: &CrawlRequest) -> Self {
        Self {
            frontier: Frontier::with_seed(request.seed().clone()),
            origins: vec![request.seed().clone()],
            matches: Vec::new(),
            debug_rows: Vec::new(),
            checksums: HashSet::new(),
            status: CrawlStatus::Idle,
        }
    }

    pub fn status(&self) -> CrawlStatus {
        self.status
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn origins(&self) -> &[Url] {
        &self.origins
    }

    pub fn pages_visited(&self) -> usize {
        self.frontier.visited_len()
    }

    pub fn matches(&self) -> &[PageRecord] {
        &self.matches
    }

    pub fn debug_rows(&self) -> &[DebugRow] {
        &self.debug_rows
    }

    pub fn push_debug_row(&mut self, row: DebugRow) {
        self.debug_rows.push(row);
    }

    /// Close a crawl whose future was dropped by an outer deadline.
    /// A status the engine already settled on is kept.
    pub fn abandon(&mut self) {
        if !self.status.is_terminal() {
            self.status = CrawlStatus::TimedOut;
        }
    }

    pub fn into_results(self) -> (Vec<PageRecord>, Vec<DebugRow>) {
        (self.matches, self.debug_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> CrawlRunState {
        let request = CrawlRequest::builder("https://example.com/", ["alpha"])
            .build()
            .unwrap();
        CrawlRunState::new(&request)
    }

    #[test]
    fn test_abandon_times_out_unfinished_crawl() {
        let mut state = state();
        state.status = CrawlStatus::Running;
        state.abandon();
        assert_eq!(state.status(), CrawlStatus::TimedOut);
    }

    #[test]
    fn test_abandon_keeps_settled_status() {
        let mut state = state();
        state.status = CrawlStatus::Completed;
        state.abandon();
        assert_eq!(state.status(), CrawlStatus::Completed);
    }
}
