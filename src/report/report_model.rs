use chrono::{DateTime, Local};
use serde::Serialize;

use crate::analysis::analysis_model::{Analysis, Assessment};
use crate::browser::browser_config::Profile;
use crate::crawler::crawl_config::CrawlMode;
use crate::executor::result_model::TestResult;

// ============================================================================
// Run report: everything the renderers need
// ============================================================================

/// Facts about the run itself, printed in report headers.
#[derive(Debug, Clone, Serialize)]
pub struct RunMetadata {
    /// Normalized start URL
    pub target_url: String,

    /// `scheme://host[:port]` stripped from page labels
    pub base: String,

    pub mode: CrawlMode,

    pub profile: Profile,

    pub started_at: DateTime<Local>,

    /// Visited URLs in order
    pub pages: Vec<String>,

    pub elements_analyzed: usize,

    /// SHA-1 over the generated scenario list
    pub scenario_fingerprint: String,

    /// Set when the browser session was lost mid-run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abort_reason: Option<String>,
}

impl RunMetadata {
    pub fn pages_tested(&self) -> usize {
        self.pages.len()
    }
}

/// Aggregated output of one run. Consumed by every reporter.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub analysis: Analysis,
    pub assessment: Assessment,

    /// Every result in execution order
    pub results: Vec<TestResult>,
}

impl RunReport {
    pub fn all_passed(&self) -> bool {
        self.analysis.failed == 0
    }
}

/// Default text report name, e.g. `website_test_report_20250101_120000.txt`.
pub fn default_report_filename(at: &DateTime<Local>) -> String {
    format!("website_test_report_{}.txt", at.format("%Y%m%d_%H%M%S"))
}
