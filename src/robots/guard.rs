//! Per-site robots.txt guard
//!
//! A [`RobotsGuard`] belongs to one site and one crawling identity. It is
//! created unloaded, fetches robots.txt once through a caller-supplied
//! transport, and then answers permission, crawl-delay, and sitemap queries
//! from the parsed rules.

use crate::robots::parser::{RequestRate, RuleSet, WILDCARD_AGENT};
use crate::robots::transport::{RobotsResponse, RobotsTransport};
use crate::url::{parse_base_url, robots_url};
use crate::{GuardError, TransportError, UrlError};
use std::time::Duration;
use url::Url;

/// Timeout applied to the robots.txt request unless overridden
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest robots.txt body that is parsed; the rest is discarded
///
/// [`HttpTransport`](crate::robots::HttpTransport) stops reading the
/// response at this size. Bodies from other transports are cut down here
/// before parsing, after they have been fully read.
pub const MAX_ROBOTS_BYTES: usize = 500 * 1024;

/// How the loaded rule set was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 200: the published robots.txt was parsed
    Parsed,
    /// 404: no robots.txt, everything is allowed
    Absent,
    /// Any other status: intent unknown, everything is disallowed
    Unavailable { status: u16 },
}

impl LoadOutcome {
    /// Maps a response status onto an outcome
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => Self::Parsed,
            404 => Self::Absent,
            status => Self::Unavailable { status },
        }
    }

    /// Returns true if the rules were replaced by the deny-all fallback
    pub fn is_restrictive(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

#[derive(Debug)]
enum GuardState {
    Unloaded,
    Loaded { rules: RuleSet, outcome: LoadOutcome },
}

/// robots.txt permission guard for one site
///
/// # Example
///
/// ```no_run
/// use robots_guard::config::{RobotsConfig, UserAgentConfig};
/// use robots_guard::robots::{HttpTransport, RobotsGuard};
///
/// # async fn example(agent: UserAgentConfig) -> robots_guard::Result<()> {
/// let transport = HttpTransport::new(&agent, &RobotsConfig::default())?;
/// let mut guard = RobotsGuard::new("https://example.com", &agent.crawler_name)?;
/// guard.load(&transport).await?;
///
/// if guard.can_fetch("https://example.com/some/page")? {
///     println!("allowed, delay {:?}", guard.crawl_delay()?);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RobotsGuard {
    base_url: Url,
    user_agent: String,
    robots_url: Url,
    fetch_timeout: Duration,
    state: GuardState,
}

impl RobotsGuard {
    /// Creates an unloaded guard for a site
    ///
    /// No network activity happens here. The robots.txt URL is resolved
    /// against `base_url` once and never changes.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Absolute HTTP(S) URL of the site root
    /// * `user_agent` - Crawling identity; empty means every agent (`*`)
    ///
    /// # Returns
    ///
    /// * `Ok(RobotsGuard)` - An unloaded guard
    /// * `Err(UrlError)` - `base_url` is not an absolute HTTP(S) URL
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, UrlError> {
        let base_url = parse_base_url(base_url)?;
        let robots_url = robots_url(&base_url)?;

        let user_agent = match user_agent.trim() {
            "" => WILDCARD_AGENT.to_string(),
            agent => agent.to_string(),
        };

        Ok(Self {
            base_url,
            user_agent,
            robots_url,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            state: GuardState::Unloaded,
        })
    }

    /// Creates an unloaded guard answering for every agent (`*`)
    pub fn for_all_agents(base_url: &str) -> Result<Self, UrlError> {
        Self::new(base_url, WILDCARD_AGENT)
    }

    /// Overrides the robots.txt request timeout
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Returns the site base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the crawling identity
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the robots.txt URL
    pub fn robots_url(&self) -> &Url {
        &self.robots_url
    }

    /// Returns the robots.txt request timeout
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }

    /// Returns true once robots.txt has been loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self.state, GuardState::Loaded { .. })
    }

    /// Returns how the rules were obtained, if loaded
    pub fn outcome(&self) -> Option<LoadOutcome> {
        match &self.state {
            GuardState::Loaded { outcome, .. } => Some(*outcome),
            GuardState::Unloaded => None,
        }
    }

    /// Fetches and interprets robots.txt
    ///
    /// | Status | Rules |
    /// |--------|-------|
    /// | 200 | parsed body |
    /// | 404 | allow everything |
    /// | other | disallow everything |
    ///
    /// The guard is loaded after any of these. If the transport fails to
    /// produce a response (connection error, timeout), the error is returned
    /// and the guard stays unloaded, so `load` can be called again.
    ///
    /// Loading an already loaded guard performs no request and returns the
    /// stored outcome.
    pub async fn load<T>(&mut self, transport: &T) -> Result<LoadOutcome, GuardError>
    where
        T: RobotsTransport + ?Sized,
    {
        if let GuardState::Loaded { outcome, .. } = &self.state {
            tracing::debug!("robots.txt already loaded from {}", self.robots_url);
            return Ok(*outcome);
        }

        let request = transport.get(&self.robots_url, self.fetch_timeout);
        let response = match tokio::time::timeout(self.fetch_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!("Failed to fetch {}: {}", self.robots_url, e);
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(
                    "Fetching {} exceeded {:?}",
                    self.robots_url,
                    self.fetch_timeout
                );
                return Err(TransportError::Timeout {
                    url: self.robots_url.to_string(),
                }
                .into());
            }
        };

        let (rules, outcome) = interpret_response(&response);
        match outcome {
            LoadOutcome::Parsed => {
                tracing::debug!("Loaded robots.txt from {}", self.robots_url)
            }
            LoadOutcome::Absent => {
                tracing::debug!("robots.txt not found at {} (allow all)", self.robots_url)
            }
            LoadOutcome::Unavailable { status } => tracing::debug!(
                "Failed to load {}: status {} (disallow all)",
                self.robots_url,
                status
            ),
        }

        self.state = GuardState::Loaded { rules, outcome };
        Ok(outcome)
    }

    /// Checks whether the crawling identity may fetch `url`
    ///
    /// Only the path and query of `url` are matched; site-relative paths are
    /// accepted as well.
    ///
    /// # Returns
    ///
    /// * `Ok(bool)` - The permission
    /// * `Err(GuardError::NotReady)` - robots.txt has not been loaded
    pub fn can_fetch(&self, url: &str) -> Result<bool, GuardError> {
        let rules = self.rules()?;
        Ok(rules.is_allowed(url, &self.user_agent))
    }

    /// Returns the Crawl-delay (seconds) declared for the crawling identity
    ///
    /// `None` means the site declared none; no default is substituted.
    pub fn crawl_delay(&self) -> Result<Option<f64>, GuardError> {
        let rules = self.rules()?;
        Ok(rules.crawl_delay(&self.user_agent))
    }

    /// Returns the Request-rate declared for the crawling identity
    pub fn request_rate(&self) -> Result<Option<RequestRate>, GuardError> {
        let rules = self.rules()?;
        Ok(rules.request_rate(&self.user_agent))
    }

    /// Returns the sitemap URLs in the order robots.txt lists them
    pub fn sitemaps(&self) -> Result<&[String], GuardError> {
        let rules = self.rules()?;
        Ok(rules.sitemaps())
    }

    fn rules(&self) -> Result<&RuleSet, GuardError> {
        match &self.state {
            GuardState::Loaded { rules, .. } => Ok(rules),
            GuardState::Unloaded => {
                tracing::error!("robots.txt not loaded yet: {}", self.robots_url);
                Err(GuardError::NotReady {
                    robots_url: self.robots_url.to_string(),
                })
            }
        }
    }
}

/// Turns a robots.txt response into rules
///
/// This is the pure half of [`RobotsGuard::load`]: 200 parses the body, 404
/// yields allow-all, and every other status yields deny-all.
pub fn interpret_response(response: &RobotsResponse) -> (RuleSet, LoadOutcome) {
    let outcome = LoadOutcome::from_status(response.status);

    let rules = match outcome {
        LoadOutcome::Parsed => RuleSet::parse(truncate_body(&response.body)),
        LoadOutcome::Absent => RuleSet::allow_all(),
        LoadOutcome::Unavailable { .. } => RuleSet::deny_all(),
    };

    (rules, outcome)
}

/// Cuts a body down to [`MAX_ROBOTS_BYTES`] on a character boundary
fn truncate_body(body: &str) -> &str {
    if body.len() <= MAX_ROBOTS_BYTES {
        return body;
    }

    let mut end = MAX_ROBOTS_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    tracing::warn!(
        "robots.txt is {} bytes, only the first {} are parsed",
        body.len(),
        end
    );
    &body[..end]
}
