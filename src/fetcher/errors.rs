use reqwest::StatusCode;
use std::fmt;
use thiserror::Error;

/// Which part of a request ran out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutPhase {
    Connect,
    Request,
}

impl fmt::Display for TimeoutPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Request => "request",
        })
    }
}

/// Why a page could not be turned into a [`PageResponse`](crate::fetcher::PageResponse).
///
/// None of these stop a crawl; the engine records them on the URL's debug
/// row and treats the page as a dead end.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{0} timeout")]
    Timeout(TimeoutPhase),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("body of {size} bytes exceeds the {limit} byte limit")]
    BodyTooLarge { size: u64, limit: u64 },

    #[error("not an html page: {0}")]
    NotHtml(String),

    #[error("failed reading body: {0}")]
    Body(String),

    #[error("http client error: {0}")]
    Client(String),
}

impl FetchError {
    /// Whether the same URL might succeed on a later crawl.
    ///
    /// Timeouts, connection failures, 5xx and 429 are transient; anything
    /// about the page itself (4xx, size, content type) is not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connect(_) | Self::Body(_) => true,
            Self::Status(status) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            Self::TooManyRedirects | Self::BodyTooLarge { .. } | Self::NotHtml(_) | Self::Client(_) => {
                false
            }
        }
    }

    /// Status code, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            let phase = if err.is_connect() {
                TimeoutPhase::Connect
            } else {
                TimeoutPhase::Request
            };
            Self::Timeout(phase)
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else if let Some(status) = err.status() {
            Self::Status(status)
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            Self::Body(err.to_string())
        } else {
            Self::Client(err.to_string())
        }
    }
}
