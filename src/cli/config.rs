use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::browser::browser_config::{BrowserConfig, Profile};
use crate::crawler::crawl_config::{CrawlConfig, CrawlMode};
use crate::crawler::url_scope::with_scheme;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "ui-sweep.yaml";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown crawl mode '{0}' (expected single or crawl)")]
    InvalidMode(String),

    #[error("unknown profile '{0}' (expected fast or pro)")]
    InvalidProfile(String),

    #[error("empty target URL")]
    EmptyUrl,
}

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "ui-sweep",
    version,
    about = "Crawl a website, auto-test its interactive elements and grade the result"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: ui-sweep.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl, test and report on a website
    Run {
        /// Website to test; `https://` is assumed when no scheme is given
        #[arg(long)]
        url: String,

        /// single or crawl
        #[arg(long, value_parser = ["single", "crawl"])]
        mode: Option<String>,

        /// fast (30s page loads) or pro (180s page loads)
        #[arg(long, value_parser = ["fast", "pro"])]
        profile: Option<String>,

        /// Maximum pages to visit in crawl mode
        #[arg(long)]
        max_pages: Option<usize>,

        /// Maximum BFS depth in crawl mode
        #[arg(long)]
        max_depth: Option<usize>,

        /// Open a visible browser and wait for Enter before testing
        #[arg(long)]
        manual_auth: bool,

        /// Show the browser window
        #[arg(long)]
        headed: bool,

        /// Output format: text, json, junit, console
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,

        /// Output file path (text defaults to website_test_report_<timestamp>.txt)
        #[arg(short, long)]
        output: Option<String>,

        /// Append a JSONL run trace to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Scan one page and write the generated scenarios as YAML
    Plan {
        /// Page to scan
        #[arg(long)]
        url: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Junit,
    Console,
}

pub fn parse_mode(s: &str) -> Result<CrawlMode, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "single" => Ok(CrawlMode::Single),
        "crawl" => Ok(CrawlMode::Crawl),
        other => Err(ConfigError::InvalidMode(other.to_string())),
    }
}

pub fn parse_profile(s: &str) -> Result<Profile, ConfigError> {
    match s.trim().to_lowercase().as_str() {
        "fast" => Ok(Profile::Fast),
        "pro" => Ok(Profile::Pro),
        other => Err(ConfigError::InvalidProfile(other.to_string())),
    }
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `ui-sweep.yaml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub crawl: CrawlSection,
    #[serde(default)]
    pub browser: BrowserSection,
    #[serde(default)]
    pub report: ReportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlSection {
    #[serde(default = "default_mode")]
    pub mode: CrawlMode,

    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default = "default_max_anchors")]
    pub max_anchors: usize,

    #[serde(default = "default_max_new_links")]
    pub max_new_links: usize,
}

impl Default for CrawlSection {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            max_anchors: default_max_anchors(),
            max_new_links: default_max_new_links(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowserSection {
    #[serde(default)]
    pub profile: Profile,

    #[serde(default = "default_true")]
    pub headless: bool,

    #[serde(default = "default_node")]
    pub node_path: String,

    #[serde(default = "default_bridge")]
    pub bridge_script: String,

    /// Bound on each element wait during execution, in milliseconds
    #[serde(default = "default_element_wait_ms")]
    pub element_wait_ms: u64,
}

impl Default for BrowserSection {
    fn default() -> Self {
        Self {
            profile: Profile::default(),
            headless: true,
            node_path: default_node(),
            bridge_script: default_bridge(),
            element_wait_ms: default_element_wait_ms(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub format: ReportFormat,

    pub output: Option<String>,

    pub trace: Option<String>,
}

// Serde default helpers
fn default_mode() -> CrawlMode { CrawlMode::Crawl }
fn default_max_pages() -> usize { 10 }
fn default_max_depth() -> usize { 2 }
fn default_max_anchors() -> usize { 50 }
fn default_max_new_links() -> usize { 5 }
fn default_true() -> bool { true }
fn default_node() -> String { "node".to_string() }
fn default_bridge() -> String { "bridge/browser_bridge.js".to_string() }
fn default_element_wait_ms() -> u64 { 2000 }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "malformed config, using defaults");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders (merge CLI args with config file)
// ============================================================================

/// Flags of the `run` subcommand; `None` means "take it from the config file".
#[derive(Debug, Clone, Default)]
pub struct RunArgs {
    pub url: String,
    pub mode: Option<String>,
    pub profile: Option<String>,
    pub max_pages: Option<usize>,
    pub max_depth: Option<usize>,
    pub manual_auth: bool,
    pub headed: bool,
    pub format: Option<ReportFormat>,
    pub output: Option<String>,
    pub trace: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub crawl: CrawlConfig,
    pub browser: BrowserConfig,
    pub profile: Profile,
    pub manual_auth: bool,
    pub element_wait: std::time::Duration,
    pub format: ReportFormat,
    pub output: Option<String>,
    pub trace: Option<String>,
}

/// Merge CLI flags over the config file. CLI wins.
pub fn resolve_run_options(args: &RunArgs, config: &AppConfig) -> Result<RunOptions, ConfigError> {
    let profile = match &args.profile {
        Some(p) => parse_profile(p)?,
        None => config.browser.profile,
    };
    let mode = match &args.mode {
        Some(m) => parse_mode(m)?,
        None => config.crawl.mode,
    };

    let crawl = build_crawl_config(
        &args.url,
        mode,
        profile,
        args.max_pages.unwrap_or(config.crawl.max_pages),
        args.max_depth.unwrap_or(config.crawl.max_depth),
        config,
    )?;

    // Manual auth needs a window the operator can use.
    let headless = config.browser.headless && !args.headed && !args.manual_auth;

    Ok(RunOptions {
        crawl,
        browser: build_browser_config(profile, headless, config),
        profile,
        manual_auth: args.manual_auth,
        element_wait: std::time::Duration::from_millis(config.browser.element_wait_ms),
        format: args.format.unwrap_or(config.report.format),
        output: args.output.clone().or_else(|| config.report.output.clone()),
        trace: args.trace.clone().or_else(|| config.report.trace.clone()),
    })
}

/// Build a CrawlConfig from resolved CLI/config values.
pub fn build_crawl_config(
    url: &str,
    mode: CrawlMode,
    profile: Profile,
    max_pages: usize,
    max_depth: usize,
    config: &AppConfig,
) -> Result<CrawlConfig, ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::EmptyUrl);
    }

    Ok(CrawlConfig {
        start_url: with_scheme(url),
        mode,
        max_pages,
        max_depth,
        max_anchors: config.crawl.max_anchors,
        max_new_links: config.crawl.max_new_links,
        page_load_timeout: profile.page_load_timeout(),
    })
}

/// Build the BrowserConfig for a profile.
pub fn build_browser_config(profile: Profile, headless: bool, config: &AppConfig) -> BrowserConfig {
    BrowserConfig {
        node_path: config.browser.node_path.clone(),
        bridge_script: config.browser.bridge_script.clone(),
        ..BrowserConfig::for_profile(profile, headless)
    }
}
