use chrono::NaiveDate;
use thiserror::Error;

/// Request-shape problems, reported before any crawling starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CrawlError {
    #[error("no keywords supplied")]
    NoKeywords,

    #[error("no seed urls supplied")]
    NoSeeds,

    #[error("invalid seed url '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("unsupported seed url scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("max_pages must be at least 1")]
    ZeroMaxPages,

    #[error("site timeout must be greater than zero")]
    ZeroTimeout,

    #[error("date range is inverted: {from} is after {to}")]
    InvertedDateRange { from: NaiveDate, to: NaiveDate },
}
