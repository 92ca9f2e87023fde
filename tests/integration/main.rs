//! Integration tests for Robots-Guard
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! guard end-to-end through the reqwest transport.

mod guard_tests;

use robots_guard::config::{RobotsConfig, UserAgentConfig};
use robots_guard::robots::HttpTransport;

/// Creates the user agent configuration shared by the tests
pub fn create_test_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0".to_string(),
        contact_url: "https://example.com/bot".to_string(),
        contact_email: "bot@example.com".to_string(),
    }
}

/// Creates a transport with default robots settings
pub fn create_transport() -> HttpTransport {
    HttpTransport::new(&create_test_agent(), &RobotsConfig::default())
        .expect("Failed to build transport")
}
