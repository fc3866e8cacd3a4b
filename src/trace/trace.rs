use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::executor::result_model::TestResult;

/// What happened at a trace point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    PageLoaded,
    PageFailed,
    ScenarioExecuted,
    RunAborted,
    RunFinished,
}

#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub step: u64,

    pub kind: TraceKind,

    pub url: Option<String>,

    pub scenario_id: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(step: u64, kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            step,
            kind,
            url: None,
            scenario_id: None,
            status: None,
            error: None,
            detail: None,
        }
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    pub fn with_result(mut self, result: &TestResult) -> Self {
        self.url = Some(result.page_url.clone());
        self.scenario_id = Some(result.scenario_id.clone());
        self.status = Some(result.status.as_str().to_string());
        self.error = result.error.as_ref().map(|e| e.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
