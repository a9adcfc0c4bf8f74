use crate::config::Config;
use crate::fetcher::{
    errors::FetchError,
    pipeline::{is_html_content_type, process_response},
    types::PageResponse,
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::instrument;
use url::Url;

const MAX_REDIRECTS: usize = 10;

/// Source of pages for the crawl engine.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue one GET for `url`. Anything other than a 2xx HTML body is an error.
    async fn fetch(&self, url: &Url) -> Result<PageResponse, FetchError>;
}

/// reqwest-backed fetcher with a fixed user agent and per-request timeout.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: u64,
}

impl HttpFetcher {
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        max_body_bytes: u64,
    ) -> Result<Self, FetchError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );

        let client = ClientBuilder::new()
            .connect_timeout(timeout)
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(
            config.user_agent(),
            config.fetch_timeout(),
            config.max_body_bytes(),
        )
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(skip_all, fields(url = %url))]
    async fn fetch(&self, url: &Url) -> Result<PageResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?;

        if let Some(content_length) = response.content_length()
            && content_length > self.max_body_bytes
        {
            return Err(FetchError::BodyTooLarge {
                size: content_length,
                limit: self.max_body_bytes,
            });
        }

        let final_url = response.url().clone();
        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml(content_type));
        }

        let body_bytes = response.bytes().await?;

        // Content-Length may be absent or wrong
        if body_bytes.len() as u64 > self.max_body_bytes {
            return Err(FetchError::BodyTooLarge {
                size: body_bytes.len() as u64,
                limit: self.max_body_bytes,
            });
        }

        Ok(process_response(final_url, status, &body_bytes))
    }
}

