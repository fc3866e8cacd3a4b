use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scenario::scenario_model::ScenarioKind;

/// Maximum characters kept from an uncategorized failure message.
pub const MAX_ERROR_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
}

impl TestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
        }
    }
}

/// Why a scenario failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message")]
pub enum ErrorKind {
    /// Element could not be located, or a bounded wait expired
    ElementNotFound,

    /// Element exists but rejected the interaction
    ElementNotInteractable,

    /// Anything else; message truncated to `MAX_ERROR_CHARS`
    Other(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ElementNotFound => f.write_str("Element not found or timeout"),
            ErrorKind::ElementNotInteractable => f.write_str("Element not interactable"),
            ErrorKind::Other(message) => f.write_str(message),
        }
    }
}

/// Outcome of executing one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub scenario_id: String,

    pub title: String,

    pub kind: ScenarioKind,

    pub status: TestStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorKind>,

    /// Wall-clock time of the dispatch, rounded to two decimals
    pub execution_time_seconds: f64,

    /// URL active when the scenario ran
    pub page_url: String,
}

impl TestResult {
    pub fn passed(&self) -> bool {
        self.status == TestStatus::Passed
    }

    /// Failure text used for clustering and reports.
    pub fn error_text(&self) -> String {
        self.error
            .as_ref()
            .map(ErrorKind::to_string)
            .unwrap_or_else(|| "Unknown error".to_string())
    }
}
