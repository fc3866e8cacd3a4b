use crate::crawler::url_scope::page_key;
use crate::report::report_model::RunReport;

// ============================================================================
// Console reporter: short terminal summary
// ============================================================================

/// Format a compact run summary for the terminal.
///
/// Produces output like:
/// ```text
/// === UI Sweep: https://example.com/ ===
///
/// ✓ PASS  /            (10/10)
/// ✗ FAIL  /contact     (3/5)
///     [FAIL] Valid input test: email — Element not interactable
///
/// Grade: 90-100% - A (Excellent)
/// === Results: 13 passed, 2 failed (15 total) across 2 page(s) ===
/// ```
pub fn format_console_summary(report: &RunReport) -> String {
    let meta = &report.metadata;
    let analysis = &report.analysis;

    let mut out = String::new();
    out.push_str(&format!("=== UI Sweep: {} ===\n\n", meta.target_url));

    if let Some(reason) = &meta.abort_reason {
        out.push_str(&format!("[ABORTED] {}\n\n", reason));
    }

    let width = analysis
        .by_page
        .iter()
        .map(|p| p.page.chars().count())
        .max()
        .unwrap_or(0);

    for entry in &analysis.by_page {
        let marker = if entry.tally.failed == 0 {
            "\u{2713} PASS"
        } else {
            "\u{2717} FAIL"
        };
        out.push_str(&format!(
            "{}  {:<width$}  ({}/{})\n",
            marker,
            entry.page,
            entry.tally.passed,
            entry.tally.total,
            width = width
        ));

        // Failures grouped under their page
        for failure in &analysis.failures {
            if page_key(&failure.page_url, &meta.base) == entry.page {
                out.push_str(&format!(
                    "    [FAIL] {} \u{2014} {}\n",
                    failure.title,
                    failure.error_text()
                ));
            }
        }
    }

    if analysis.by_page.is_empty() {
        out.push_str("(no interactive elements tested)\n");
    }

    out.push_str(&format!("\nGrade: {}\n", report.assessment.overall));
    out.push_str(&format!(
        "=== Results: {} passed, {} failed ({} total) across {} page(s) ===\n",
        analysis.passed,
        analysis.failed,
        analysis.total,
        meta.pages_tested()
    ));

    out
}
