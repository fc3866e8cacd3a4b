use crate::analysis::analysis_model::ErrorPattern;
use crate::crawler::url_scope::page_key;
use crate::report::report_model::RunReport;

// ============================================================================
// JUnit XML reporter: CI integration format
// ============================================================================

/// Generate a JUnit XML report for CI systems (Jenkins, GitHub Actions, GitLab CI).
///
/// One testcase per executed scenario, `classname` set to the page path:
/// ```xml
/// <?xml version="1.0" encoding="UTF-8"?>
/// <testsuite name="https://example.com/" tests="2" failures="1" time="0.420">
///   <testcase name="TEST_0001_1 Click button: Go" classname="/" time="0.120" />
///   <testcase name="TEST_0002_1 Valid input test: q" classname="/search" time="0.300">
///     <failure message="Element Not Interactable" type="functional">Element not interactable</failure>
///   </testcase>
/// </testsuite>
/// ```
pub fn generate_junit_xml(report: &RunReport) -> String {
    let base = &report.metadata.base;
    let total_time: f64 = report
        .results
        .iter()
        .map(|r| r.execution_time_seconds)
        .sum();

    let mut cases = String::new();
    for result in &report.results {
        let name = format!("{} {}", result.scenario_id, result.title);
        let classname = page_key(&result.page_url, base);

        if result.passed() {
            cases.push_str(&format!(
                "  <testcase name=\"{}\" classname=\"{}\" time=\"{:.3}\" />\n",
                escape_xml(&name),
                escape_xml(&classname),
                result.execution_time_seconds
            ));
        } else {
            let error = result.error_text();
            let pattern = ErrorPattern::classify(&error);

            cases.push_str(&format!(
                "  <testcase name=\"{name}\" classname=\"{class}\" time=\"{time:.3}\">\n    <failure message=\"{message}\" type=\"{kind}\">{body}</failure>\n  </testcase>\n",
                name = escape_xml(&name),
                class = escape_xml(&classname),
                time = result.execution_time_seconds,
                message = escape_xml(pattern.label()),
                kind = result.kind.as_str(),
                body = escape_xml(&error),
            ));
        }
    }

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuite name=\"{name}\" tests=\"{tests}\" failures=\"{failures}\" time=\"{time:.3}\">\n{cases}</testsuite>\n",
        name = escape_xml(&report.metadata.target_url),
        tests = report.analysis.total,
        failures = report.analysis.failed,
        time = total_time,
        cases = cases,
    )
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
