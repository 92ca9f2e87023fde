//! URL handling module for Robots-Guard
//!
//! This module derives robots.txt locations from site base URLs and reduces
//! crawl targets to the path+query form that robots.txt rules match against.

mod domain;
mod path;
mod resolve;

// Re-export main functions
pub use domain::site_root;
pub use path::path_and_query;
pub use resolve::{parse_base_url, robots_url, ROBOTS_PATH};
