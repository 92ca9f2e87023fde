//! HTTP transport for robots.txt
//!
//! The guard never opens connections itself. It asks a [`RobotsTransport`]
//! for the status and text of the robots.txt URL; redirect and timeout
//! handling live here, on the I/O side.

use crate::config::{RobotsConfig, UserAgentConfig};
use crate::robots::guard::MAX_ROBOTS_BYTES;
use crate::TransportError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Status and body of a robots.txt response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsResponse {
    /// HTTP status code of the final response, after redirects
    pub status: u16,
    /// Response body decoded as text
    pub body: String,
}

impl RobotsResponse {
    /// Creates a response from a status code and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Capability to GET a URL with a timeout
///
/// Implementations must follow redirects themselves, including 307 and 308
/// which preserve the request method. Any response, whatever its status, is
/// returned as `Ok`; `Err` is reserved for requests that produced no response.
#[async_trait]
pub trait RobotsTransport: Send + Sync {
    /// Fetches `url`, giving up after `timeout`
    async fn get(&self, url: &Url, timeout: Duration) -> Result<RobotsResponse, TransportError>;
}

/// Formats the HTTP User-Agent header for a crawler
///
/// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Builds an HTTP client for fetching robots.txt
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `robots` - Timeout and redirect settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use robots_guard::config::{RobotsConfig, UserAgentConfig};
/// use robots_guard::robots::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ExampleBot".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, &RobotsConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    robots: &RobotsConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .connect_timeout(robots.connect_timeout())
        .redirect(Policy::limited(robots.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`RobotsTransport`] backed by a reqwest client
///
/// At most [`MAX_ROBOTS_BYTES`] of the body are downloaded; the connection
/// is dropped once the limit is reached.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a client built from configuration
    pub fn new(user_agent: &UserAgentConfig, robots: &RobotsConfig) -> Result<Self, TransportError> {
        let client = build_http_client(user_agent, robots)
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wraps an existing client
    ///
    /// The client's redirect policy must follow redirects; reqwest's default
    /// policy does.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RobotsTransport for HttpTransport {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<RobotsResponse, TransportError> {
        let mut response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        if response.url() != url {
            tracing::debug!("robots.txt for {} redirected to {}", url, response.url());
        }

        let mut bytes: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
            let remaining = MAX_ROBOTS_BYTES - bytes.len();
            if chunk.len() > remaining {
                bytes.extend_from_slice(&chunk[..remaining]);
                tracing::warn!(
                    "robots.txt at {} exceeds {} bytes, the rest is not read",
                    url,
                    MAX_ROBOTS_BYTES
                );
                break;
            }
            bytes.extend_from_slice(&chunk);
        }

        let body = String::from_utf8_lossy(&bytes).into_owned();

        Ok(RobotsResponse { status, body })
    }
}

/// Maps a reqwest error onto the transport error taxonomy
fn classify_error(url: &Url, error: reqwest::Error) -> TransportError {
    let url = url.to_string();

    if error.is_timeout() {
        TransportError::Timeout { url }
    } else if error.is_redirect() {
        TransportError::RedirectLimit { url }
    } else if error.is_connect() {
        TransportError::Connect {
            url,
            message: error.to_string(),
        }
    } else {
        TransportError::Http { url, source: error }
    }
}
