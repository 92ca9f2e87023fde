//! Robots.txt handling module
//!
//! This module provides functionality for fetching and parsing robots.txt
//! files and answering permission queries against them.

mod guard;
mod parser;
mod transport;

pub use guard::{
    interpret_response, LoadOutcome, RobotsGuard, DEFAULT_FETCH_TIMEOUT, MAX_ROBOTS_BYTES,
};
pub use parser::{product_token, RequestRate, RuleSet, WILDCARD_AGENT};
pub use transport::{
    build_http_client, format_user_agent, HttpTransport, RobotsResponse, RobotsTransport,
};

use crate::GuardError;
use std::time::Duration;

/// Builds a guard for a site and loads its robots.txt
///
/// # Arguments
///
/// * `base_url` - The site root, e.g. `https://example.com`
/// * `user_agent` - The crawling identity
/// * `fetch_timeout` - Timeout for the robots.txt request
/// * `transport` - The transport performing the request
///
/// # Returns
///
/// * `Ok(RobotsGuard)` - A loaded guard
/// * `Err(GuardError)` - Invalid base URL, or the request produced no response
pub async fn fetch_robots<T>(
    base_url: &str,
    user_agent: &str,
    fetch_timeout: Duration,
    transport: &T,
) -> Result<RobotsGuard, GuardError>
where
    T: RobotsTransport + ?Sized,
{
    let mut guard = RobotsGuard::new(base_url, user_agent)?.with_fetch_timeout(fetch_timeout);
    guard.load(transport).await?;
    Ok(guard)
}
