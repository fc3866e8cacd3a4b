use std::collections::BTreeMap;

use serde::Serialize;

use crate::report::report_model::{RunMetadata, RunReport};

/// Machine-readable run summary, the payload a dashboard consumes.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Score band, e.g. `90-100%`
    pub score: String,
    pub grade: String,
    pub pass_rate: f64,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub advice: Vec<String>,
    pub detailed_scores: BTreeMap<String, String>,

    /// One line per result: `[{kind}] {title}: {status}`
    pub action_log: Vec<String>,

    pub metadata: RunMetadata,
}

pub fn build_run_summary(report: &RunReport) -> RunSummary {
    let assessment = &report.assessment;

    RunSummary {
        score: assessment.grade.band().to_string(),
        grade: assessment.grade.label().to_string(),
        pass_rate: report.analysis.pass_rate,
        summary: assessment.summary.clone(),
        strengths: assessment.strengths.clone(),
        weaknesses: assessment.weaknesses.clone(),
        advice: assessment.recommendations.clone(),
        detailed_scores: assessment.detailed_scores.clone(),
        action_log: report
            .results
            .iter()
            .map(|r| format!("[{}] {}: {}", r.kind, r.title, r.status.as_str()))
            .collect(),
        metadata: report.metadata.clone(),
    }
}

/// Pretty-printed JSON summary.
pub fn render_json(report: &RunReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&build_run_summary(report))
}
