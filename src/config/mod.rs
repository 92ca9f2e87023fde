//! Configuration module for Robots-Guard
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use robots_guard::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawling as: {}", config.user_agent.crawler_name);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, RobotsConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
