//! Robots.txt parser implementation
//!
//! This module turns robots.txt text into a [`RuleSet`]. Path permission is
//! delegated to the robotstxt crate's matcher, which implements longest-match
//! evaluation over the agent's group. Crawl-delay, Request-rate, and Sitemap
//! directives are not exposed by that matcher, so they are collected here by a
//! line parser that follows the same grouping rules.

use crate::url::path_and_query;
use robotstxt::DefaultMatcher;

/// Agent name that selects the group applying to every crawler
pub const WILDCARD_AGENT: &str = "*";

/// Request rate declared by a `Request-rate: n/s` directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestRate {
    /// Number of requests allowed per window
    pub requests: u32,
    /// Window length in seconds
    pub seconds: u32,
}

/// Directives attached to one run of `User-agent` lines
#[derive(Debug, Clone, Default)]
struct AgentGroup {
    /// Lowercased product tokens, `*` for the wildcard group
    agents: Vec<String>,
    crawl_delay: Option<f64>,
    request_rate: Option<RequestRate>,
    /// Set once a non-`User-agent` directive was seen; the next
    /// `User-agent` line then opens a new group
    closed: bool,
}

impl AgentGroup {
    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|a| a == WILDCARD_AGENT)
    }

    fn names(&self, token: &str) -> bool {
        self.agents.iter().any(|a| a == token)
    }
}

/// Parsed robots.txt rules
///
/// A `RuleSet` is immutable once built. All queries take the crawling
/// identity as an argument, so one rule set can answer for several agents.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    /// Normalized document text handed to the path matcher
    body: String,
    groups: Vec<AgentGroup>,
    sitemaps: Vec<String>,
}

impl RuleSet {
    /// Parses robots.txt content
    ///
    /// Lines may end in `\n`, `\r\n`, or `\r`. Malformed lines are skipped,
    /// so parsing never fails.
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    ///
    /// # Returns
    ///
    /// A RuleSet that can be used to check URL permissions
    pub fn parse(content: &str) -> Self {
        Self::from_lines(content.split(|c: char| c == '\n' || c == '\r'))
    }

    /// Builds a RuleSet from already split lines
    ///
    /// # Arguments
    ///
    /// * `lines` - robots.txt lines without line terminators
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rules = RuleSet::default();
        let mut body = String::new();

        for (index, line) in lines.into_iter().enumerate() {
            let mut line = line.as_ref();
            if index == 0 {
                line = line.trim_start_matches('\u{feff}');
            }

            body.push_str(line);
            body.push('\n');

            rules.handle_line(line);
        }

        rules.body = body;
        rules
    }

    /// Creates a RuleSet from an empty document, which allows everything
    pub fn allow_all() -> Self {
        Self::parse("")
    }

    /// Creates a RuleSet that disallows every path for every agent
    pub fn deny_all() -> Self {
        Self::from_lines(["User-agent: *", "Disallow: /"])
    }

    /// Returns the normalized robots.txt text
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns true if the document declared no agent groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - An absolute URL or a site-relative path (e.g., "/page.html")
    /// * `user_agent` - The user agent string; only its product token is used
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.groups.is_empty() {
            return true;
        }

        let path = path_and_query(url);
        let token = product_token(user_agent);

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.body, &token, &path)
    }

    /// Gets the crawl delay for a specific user agent
    ///
    /// Every group naming the agent is consulted, otherwise the wildcard
    /// groups, the same merge the path matcher applies to Allow/Disallow.
    /// The first delay declared across those groups wins.
    ///
    /// # Returns
    ///
    /// * `Some(f64)` - The crawl delay in seconds
    /// * `None` - If the matched group declares no crawl delay
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.matched_groups(user_agent)
            .into_iter()
            .find_map(|group| group.crawl_delay)
    }

    /// Gets the request rate for a specific user agent
    ///
    /// Group selection is the same as for [`RuleSet::crawl_delay`].
    pub fn request_rate(&self, user_agent: &str) -> Option<RequestRate> {
        self.matched_groups(user_agent)
            .into_iter()
            .find_map(|group| group.request_rate)
    }

    /// Returns every Sitemap URL in order of appearance
    ///
    /// Sitemap lines are not part of any agent group.
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    fn matched_groups(&self, user_agent: &str) -> Vec<&AgentGroup> {
        let token = product_token(user_agent).to_ascii_lowercase();

        if token != WILDCARD_AGENT {
            let specific: Vec<&AgentGroup> =
                self.groups.iter().filter(|g| g.names(&token)).collect();
            if !specific.is_empty() {
                return specific;
            }
        }

        self.groups.iter().filter(|g| g.is_wildcard()).collect()
    }

    fn handle_line(&mut self, line: &str) {
        let line = strip_comment(line).trim();
        if line.is_empty() {
            return;
        }

        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();

        match key.as_str() {
            "user-agent" | "useragent" | "user agent" => self.handle_user_agent(value),
            "sitemap" | "site-map" => {
                if !value.is_empty() {
                    self.sitemaps.push(value.to_string());
                }
            }
            "crawl-delay" | "crawldelay" => {
                let delay = parse_crawl_delay(value);
                if let Some(group) = self.current_group() {
                    if group.crawl_delay.is_none() {
                        group.crawl_delay = delay;
                    }
                }
            }
            "request-rate" => {
                let rate = parse_request_rate(value);
                if let Some(group) = self.current_group() {
                    if group.request_rate.is_none() {
                        group.request_rate = rate;
                    }
                }
            }
            _ => {
                // Allow, Disallow, and unknown directives are evaluated by
                // the matcher; here they only close the current group
                self.current_group();
            }
        }
    }

    fn handle_user_agent(&mut self, value: &str) {
        let agent = agent_token(value);

        match self.groups.last_mut() {
            Some(group) if !group.closed => group.agents.push(agent),
            _ => self.groups.push(AgentGroup {
                agents: vec![agent],
                ..AgentGroup::default()
            }),
        }
    }

    /// Returns the group the current rule line belongs to and closes it
    ///
    /// Rule lines before the first `User-agent` line belong to no group.
    fn current_group(&mut self) -> Option<&mut AgentGroup> {
        let group = self.groups.last_mut()?;
        group.closed = true;
        Some(group)
    }
}

/// Extracts the product token of a crawler's user agent string
///
/// `MyBot/2.1 (+https://example.com/bot)` becomes `MyBot`. Only letters,
/// `_`, and `-` are part of the token, which is the rule the path matcher
/// applies to `User-agent` lines. An empty token means the wildcard agent.
pub fn product_token(user_agent: &str) -> String {
    let trimmed = user_agent.trim();
    if trimmed.starts_with('*') {
        return WILDCARD_AGENT.to_string();
    }

    let token = token_prefix(trimmed);
    if token.is_empty() {
        WILDCARD_AGENT.to_string()
    } else {
        token
    }
}

/// Normalizes the value of a `User-agent` line for group lookup
fn agent_token(value: &str) -> String {
    let value = value.trim();
    if value == WILDCARD_AGENT || value.starts_with("* ") || value.starts_with("*\t") {
        return WILDCARD_AGENT.to_string();
    }

    token_prefix(value).to_ascii_lowercase()
}

/// Leading run of letters, `_`, and `-`
fn token_prefix(value: &str) -> String {
    value
        .chars()
        .take_while(|c| c.is_ascii_alphabetic() || *c == '_' || *c == '-')
        .collect()
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_crawl_delay(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|delay| delay.is_finite() && *delay >= 0.0)
}

fn parse_request_rate(value: &str) -> Option<RequestRate> {
    let (requests, seconds) = value.split_once('/')?;
    let requests = requests.trim().parse::<u32>().ok()?;
    let seconds = seconds.trim().parse::<u32>().ok()?;

    if requests == 0 || seconds == 0 {
        return None;
    }

    Some(RequestRate { requests, seconds })
}
