//! Configuration handling for the crawler.
//!
//! Every knob has a development default so the binary runs with an empty
//! environment. `Config::from_env` overlays environment variables on top of
//! those defaults and rejects values that do not parse.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use crate::sentiment::SentimentMethod;

/// Environment variable names. Public so tests and scripts can refer to them.
pub const ENV_USER_AGENT: &str = "SITEWATCH_USER_AGENT";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "FETCH_TIMEOUT_SECS";
pub const ENV_SITE_TIMEOUT_SECS: &str = "SITE_TIMEOUT_SECS";
pub const ENV_SITE_DEADLINE_SECS: &str = "SITE_DEADLINE_SECS";
pub const ENV_MAX_PAGES: &str = "MAX_PAGES";
pub const ENV_CONCURRENCY: &str = "CRAWL_CONCURRENCY";
pub const ENV_SENTIMENT_ENABLED: &str = "SENTIMENT_ENABLED";
pub const ENV_SENTIMENT_METHOD: &str = "SENTIMENT_METHOD";
pub const ENV_MAX_BODY_BYTES: &str = "MAX_BODY_BYTES";

/// Default values used when environment variables are absent.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0.0 Safari/537.36";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SITE_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SITE_DEADLINE_SECS: u64 = 130;
const DEFAULT_MAX_PAGES: usize = 100;
const DEFAULT_CONCURRENCY: usize = 1;
const DEFAULT_MAX_BODY_BYTES: u64 = 5 * 1024 * 1024;

/// Crawler runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    user_agent: String,
    fetch_timeout: Duration,
    site_timeout: Duration,
    site_deadline: Duration,
    max_pages: usize,
    concurrency: usize,
    sentiment_enabled: bool,
    sentiment_method: SentimentMethod,
    max_body_bytes: u64,
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let user_agent = env::var(ENV_USER_AGENT).unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let fetch_timeout = Duration::from_secs(parse_var(
            ENV_FETCH_TIMEOUT_SECS,
            DEFAULT_FETCH_TIMEOUT_SECS,
        )?);
        let site_timeout =
            Duration::from_secs(parse_var(ENV_SITE_TIMEOUT_SECS, DEFAULT_SITE_TIMEOUT_SECS)?);
        let site_deadline = Duration::from_secs(parse_var(
            ENV_SITE_DEADLINE_SECS,
            DEFAULT_SITE_DEADLINE_SECS,
        )?);
        let max_pages = parse_var(ENV_MAX_PAGES, DEFAULT_MAX_PAGES)?;
        let concurrency = parse_var(ENV_CONCURRENCY, DEFAULT_CONCURRENCY)?;
        let sentiment_enabled = parse_bool(ENV_SENTIMENT_ENABLED, true)?;
        let sentiment_method = parse_var(ENV_SENTIMENT_METHOD, SentimentMethod::Vader)?;
        let max_body_bytes = parse_var(ENV_MAX_BODY_BYTES, DEFAULT_MAX_BODY_BYTES)?;

        let config = Self {
            user_agent,
            fetch_timeout,
            site_timeout,
            site_deadline,
            max_pages,
            concurrency,
            sentiment_enabled,
            sentiment_method,
            max_body_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_MAX_PAGES,
                reason: "must be at least 1".to_string(),
            });
        }
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: ENV_CONCURRENCY,
                reason: "must be at least 1".to_string(),
            });
        }
        let timeouts = [
            (ENV_FETCH_TIMEOUT_SECS, self.fetch_timeout),
            (ENV_SITE_TIMEOUT_SECS, self.site_timeout),
            (ENV_SITE_DEADLINE_SECS, self.site_deadline),
        ];
        if let Some(&(field, _)) = timeouts.iter().find(|(_, timeout)| timeout.is_zero()) {
            return Err(ConfigError::InvalidValue {
                field,
                reason: "must be non-zero".to_string(),
            });
        }
        if self.fetch_timeout >= self.site_timeout {
            return Err(ConfigError::InvalidValue {
                field: ENV_FETCH_TIMEOUT_SECS,
                reason: format!(
                    "must be shorter than the site timeout of {}s",
                    self.site_timeout.as_secs()
                ),
            });
        }
        Ok(())
    }

    /// User agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
    /// Timeout for a single HTTP request.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
    /// Cooperative wall-clock budget for one site.
    pub fn site_timeout(&self) -> Duration {
        self.site_timeout
    }
    /// Hard deadline the orchestrator enforces around one site crawl.
    pub fn site_deadline(&self) -> Duration {
        self.site_deadline
    }
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }
    /// Number of sites crawled at the same time.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
    pub fn sentiment_enabled(&self) -> bool {
        self.sentiment_enabled
    }
    pub fn sentiment_method(&self) -> SentimentMethod {
        self.sentiment_method
    }
    /// Largest response body accepted by the fetcher.
    pub fn max_body_bytes(&self) -> u64 {
        self.max_body_bytes
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            site_timeout: Duration::from_secs(DEFAULT_SITE_TIMEOUT_SECS),
            site_deadline: Duration::from_secs(DEFAULT_SITE_DEADLINE_SECS),
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
            sentiment_enabled: true,
            sentiment_method: SentimentMethod::Vader,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

fn parse_var<T: FromStr>(field: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    match env::var(field) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            field,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn parse_bool(field: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(field) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue {
                field,
                reason: format!("expected a boolean, got '{}'", other),
            }),
        },
        Err(_) => Ok(default),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
