//! Robots-Guard main entry point
//!
//! This is the command-line interface for checking URLs against robots.txt.

use anyhow::{bail, Context};
use clap::Parser;
use robots_guard::config::{load_config_with_hash, Config};
use robots_guard::robots::{HttpTransport, RobotsGuard};
use robots_guard::url::site_root;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Robots-Guard: robots.txt permission checks
///
/// Fetches robots.txt once per site, then reports whether each URL may be
/// crawled, along with the declared crawl delay and sitemaps.
#[derive(Parser, Debug)]
#[command(name = "robots-guard")]
#[command(version = "1.0.0")]
#[command(about = "Check URLs against robots.txt", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// URLs to check
    #[arg(value_name = "URL", required = true)]
    urls: Vec<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show which robots.txt files would be fetched without fetching them
    #[arg(long)]
    dry_run: bool,
}

/// URLs to check, grouped under the site they belong to
struct SiteBatch {
    root: String,
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let batches = group_by_site(&cli.urls)?;

    if cli.dry_run {
        handle_dry_run(&config, &batches)
    } else {
        handle_check(&config, &batches).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("robots_guard=info,warn"),
            1 => EnvFilter::new("robots_guard=debug,info"),
            2 => EnvFilter::new("robots_guard=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Groups URLs by site root, keeping first-seen order
fn group_by_site(urls: &[String]) -> anyhow::Result<Vec<SiteBatch>> {
    let mut batches: Vec<SiteBatch> = Vec::new();

    for raw in urls {
        let url = Url::parse(raw).with_context(|| format!("Invalid URL '{}'", raw))?;
        let Some(root) = site_root(&url) else {
            bail!("URL '{}' does not belong to a site", raw);
        };

        match batches.iter_mut().find(|b| b.root == root) {
            Some(batch) => batch.urls.push(raw.clone()),
            None => batches.push(SiteBatch {
                root,
                urls: vec![raw.clone()],
            }),
        }
    }

    Ok(batches)
}

fn build_guard(config: &Config, root: &str) -> anyhow::Result<RobotsGuard> {
    let guard = RobotsGuard::new(root, &config.user_agent.crawler_name)?
        .with_fetch_timeout(config.robots.fetch_timeout());
    Ok(guard)
}

/// Handles the --dry-run mode: shows the robots.txt URLs that would be fetched
fn handle_dry_run(config: &Config, batches: &[SiteBatch]) -> anyhow::Result<()> {
    println!("=== Robots-Guard Dry Run ===\n");
    println!("Identity: {}", config.user_agent.crawler_name);
    println!("Fetch timeout: {}s", config.robots.fetch_timeout_secs);
    println!("Max redirects: {}\n", config.robots.max_redirects);

    for batch in batches {
        let guard = build_guard(config, &batch.root)?;
        println!("{} ({} URLs)", guard.robots_url(), batch.urls.len());
    }

    Ok(())
}

/// Handles the main mode: loads robots.txt per site and checks each URL
async fn handle_check(config: &Config, batches: &[SiteBatch]) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.user_agent, &config.robots)?;
    let mut failed_sites = 0;

    for batch in batches {
        let mut guard = build_guard(config, &batch.root)?;

        let outcome = match guard.load(&transport).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!("Could not load {}: {}", guard.robots_url(), e);
                failed_sites += 1;
                continue;
            }
        };

        println!("{} ({:?})", guard.robots_url(), outcome);
        match guard.crawl_delay()? {
            Some(delay) => println!("  crawl-delay: {}s", delay),
            None => println!("  crawl-delay: none"),
        }
        if let Some(rate) = guard.request_rate()? {
            println!("  request-rate: {}/{}s", rate.requests, rate.seconds);
        }
        for sitemap in guard.sitemaps()? {
            println!("  sitemap: {}", sitemap);
        }
        for url in &batch.urls {
            let verdict = if guard.can_fetch(url)? {
                "allowed"
            } else {
                "disallowed"
            };
            println!("  {} {}", verdict, url);
        }
    }

    if failed_sites > 0 {
        bail!("robots.txt could not be loaded for {} site(s)", failed_sites);
    }

    Ok(())
}
