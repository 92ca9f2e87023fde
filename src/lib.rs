//! Robots-Guard: robots.txt permission checks for polite crawlers
//!
//! This crate fetches a site's robots.txt once, interprets it, and answers
//! whether a crawling identity may fetch a URL. It also reports the declared
//! crawl delay and the advertised sitemaps.

pub mod config;
pub mod robots;
pub mod url;

use thiserror::Error;

/// Main error type for Robots-Guard operations
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("robots.txt not loaded yet: {robots_url}")]
    NotReady { robots_url: String },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),
}

/// Errors raised by a transport while fetching robots.txt
///
/// None of these carry a response: the request never produced a status
/// code to reason about.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Connection failed for {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Client(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(#[from] ::url::ParseError),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Result type alias for Robots-Guard operations
pub type Result<T> = std::result::Result<T, GuardError>;

// Re-export commonly used types
pub use config::Config;
pub use robots::{
    HttpTransport, LoadOutcome, RequestRate, RobotsGuard, RobotsResponse, RobotsTransport, RuleSet,
};
