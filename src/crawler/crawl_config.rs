use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// Crawl configuration
// ============================================================================

/// Single page vs breadth-first crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrawlMode {
    Single,
    Crawl,
}

impl CrawlMode {
    pub fn label(&self) -> &'static str {
        match self {
            CrawlMode::Single => "Single Page",
            CrawlMode::Crawl => "Crawl",
        }
    }
}

/// Limits and scope for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    /// URL the run starts from; its host is the target domain
    pub start_url: String,

    pub mode: CrawlMode,

    /// Maximum number of pages to visit in crawl mode (default 10)
    pub max_pages: usize,

    /// Maximum depth from the start URL in crawl mode (default 2)
    pub max_depth: usize,

    /// Anchors inspected per page when collecting links (default 50)
    pub max_anchors: usize,

    /// New links kept per page (default 5)
    pub max_new_links: usize,

    /// Page-load timeout handed to the driver
    pub page_load_timeout: Duration,
}

impl CrawlConfig {
    /// Breadth-first crawl with the default caps.
    pub fn crawl(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            mode: CrawlMode::Crawl,
            max_pages: 10,
            max_depth: 2,
            max_anchors: 50,
            max_new_links: 5,
            page_load_timeout: Duration::from_secs(30),
        }
    }

    /// Test only the start page.
    pub fn single_page(start_url: &str) -> Self {
        Self {
            mode: CrawlMode::Single,
            ..Self::crawl(start_url)
        }
    }

    /// Effective page cap for the mode.
    pub fn page_cap(&self) -> usize {
        match self.mode {
            CrawlMode::Single => 1,
            CrawlMode::Crawl => self.max_pages,
        }
    }

    /// Effective depth cap for the mode.
    pub fn depth_cap(&self) -> usize {
        match self.mode {
            CrawlMode::Single => 0,
            CrawlMode::Crawl => self.max_depth,
        }
    }
}
