use crate::crawler::url_scope::page_key;
use crate::report::report_model::RunReport;

/// Width of every rule line.
pub const REPORT_WIDTH: usize = 90;

/// Failed tests listed in detail; the rest are only counted.
pub const MAX_FAILED_DETAILS: usize = 30;

// ============================================================================
// Plain-text report: the per-run artifact
// ============================================================================

/// Render the full text report. Pure formatting; section order is fixed.
pub fn render_text(report: &RunReport) -> String {
    let meta = &report.metadata;
    let analysis = &report.analysis;
    let assessment = &report.assessment;

    let heavy = "=".repeat(REPORT_WIDTH);
    let light = "\u{2500}".repeat(REPORT_WIDTH);

    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy.clone());
    lines.push(center("WEBSITE UI TEST REPORT"));
    lines.push(heavy.clone());
    lines.push(String::new());
    lines.push(format!("Website: {}", meta.target_url));
    lines.push(format!(
        "Date: {}",
        meta.started_at.format("%Y-%m-%d %H:%M:%S")
    ));
    lines.push(format!("Pages Tested: {}", meta.pages_tested()));
    lines.push(format!("Mode: {}", meta.mode.label()));
    lines.push(format!("Profile: {}", meta.profile.as_str()));
    lines.push(format!("Elements Analyzed: {}", meta.elements_analyzed));
    lines.push(format!("Scenario Fingerprint: {}", meta.scenario_fingerprint));
    if let Some(reason) = &meta.abort_reason {
        lines.push(format!("Run Status: ABORTED ({})", reason));
    }
    lines.push(String::new());

    section(&mut lines, &light, "OVERALL SCORE");
    lines.push(assessment.overall.clone());
    lines.push(format!(
        "Pass Rate: {:.1}% ({} passed, {} failed, {} total)",
        analysis.pass_rate, analysis.passed, analysis.failed, analysis.total
    ));
    lines.push(String::new());

    section(&mut lines, &light, "SUMMARY");
    lines.push(assessment.summary.clone());
    lines.push(String::new());

    section(&mut lines, &light, "STRENGTHS \u{2713}");
    numbered(&mut lines, &assessment.strengths);
    lines.push(String::new());

    section(&mut lines, &light, "WEAKNESSES \u{26a0}");
    numbered(&mut lines, &assessment.weaknesses);
    lines.push(String::new());

    section(&mut lines, &light, "RECOMMENDATIONS");
    numbered(&mut lines, &assessment.recommendations);
    lines.push(String::new());

    section(&mut lines, &light, "DETAILED SCORES");
    for (category, score) in &assessment.detailed_scores {
        lines.push(format!("  \u{2022} {}: {}", category, score));
    }
    lines.push(String::new());

    if !analysis.error_patterns.is_empty() {
        section(&mut lines, &light, "ERROR PATTERNS");
        for entry in analysis.sorted_error_patterns() {
            let pct = if analysis.failed == 0 {
                0.0
            } else {
                entry.count as f64 / analysis.failed as f64 * 100.0
            };
            lines.push(format!(
                "  \u{2022} {}: {} occurrences ({:.1}% of failures)",
                entry.pattern, entry.count, pct
            ));
        }
        lines.push(String::new());
    }

    if !analysis.failures.is_empty() {
        section(
            &mut lines,
            &light,
            &format!("FAILED TESTS DETAILS ({} total)", analysis.failures.len()),
        );
        for (idx, failure) in analysis
            .failures
            .iter()
            .take(MAX_FAILED_DETAILS)
            .enumerate()
        {
            lines.push(format!("\n{}. {}", idx + 1, failure.title));
            lines.push(format!("   Page: {}", page_key(&failure.page_url, &meta.base)));
            lines.push(format!("   Type: {}", failure.kind.as_str().to_uppercase()));
            lines.push(format!("   Error: {}", failure.error_text()));
        }
        if analysis.failures.len() > MAX_FAILED_DETAILS {
            lines.push(format!(
                "\n... and {} more",
                analysis.failures.len() - MAX_FAILED_DETAILS
            ));
        }
        lines.push(String::new());
    }

    lines.push(heavy.clone());
    lines.push(center("End of Report"));
    lines.push(heavy);

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn section(lines: &mut Vec<String>, rule: &str, title: &str) {
    lines.push(rule.to_string());
    lines.push(title.to_string());
    lines.push(rule.to_string());
}

fn numbered(lines: &mut Vec<String>, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("{}. {}", i + 1, item));
    }
}

/// Center `text` in the report width; the odd space goes to the right.
fn center(text: &str) -> String {
    let len = text.chars().count();
    if len >= REPORT_WIDTH {
        return text.to_string();
    }
    let pad = REPORT_WIDTH - len;
    let left = pad / 2;
    let right = pad - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}
