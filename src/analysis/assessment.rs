use std::collections::BTreeMap;

use super::analysis_model::{Analysis, Assessment, ErrorPattern, Grade, PageTally, Tally};

/// Pass ratio at or above which a page or scenario kind counts as strong.
pub const STRONG_RATIO: f64 = 0.9;

/// Pass ratio below which a page or scenario kind counts as weak.
pub const WEAK_RATIO: f64 = 0.7;

/// Page labels longer than this are shortened in the detailed scores.
pub const MAX_PAGE_LABEL: usize = 40;

// ============================================================================
// Assessment
// ============================================================================

/// Derive the grade and narrative for a run. Deterministic for a given input.
pub fn assess(analysis: &Analysis, pages_tested: usize) -> Assessment {
    let grade = Grade::from_pass_rate(analysis.pass_rate);

    Assessment {
        grade,
        overall: overall_line(grade),
        summary: summary_paragraph(analysis, pages_tested),
        strengths: strengths(analysis),
        weaknesses: weaknesses(analysis),
        recommendations: recommendations(analysis),
        detailed_scores: detailed_scores(analysis, grade),
    }
}

fn overall_line(grade: Grade) -> String {
    format!("{} - {}", grade.band(), grade.label())
}

pub fn summary_paragraph(analysis: &Analysis, pages_tested: usize) -> String {
    let mut summary = format!(
        "The tested website shows a pass rate of {:.1}%, with {} elements across {} page(s). ",
        analysis.pass_rate,
        analysis.total_elements(),
        pages_tested
    );

    let failed = analysis.failed;
    if failed == 0 {
        summary.push_str("No failures were detected, indicating strong UI stability. ");
    } else if failed < 5 {
        summary.push_str(&format!(
            "With only {} failures, the site demonstrates good overall functionality but could benefit from minor tweaks. ",
            failed
        ));
    } else {
        summary.push_str(&format!(
            "However, {} failures suggest areas needing attention to improve user experience. ",
            failed
        ));
    }

    match analysis.top_error() {
        Some(top) => summary.push_str(&format!(
            "The most common issue is '{}', which may point to systematic problems in element visibility or interactivity.",
            top
        )),
        None => summary.push_str("No recurring error patterns were identified."),
    }

    summary
}

pub fn strengths(analysis: &Analysis) -> Vec<String> {
    let mut out = Vec::new();

    if analysis.pass_rate >= 90.0 {
        out.push("Excellent overall functionality with high pass rate".to_string());
    } else if analysis.pass_rate >= 75.0 {
        out.push("Good core functionality across most elements".to_string());
    }

    let good_pages: Vec<&str> = pages_where(&analysis.by_page, |t| t.ratio() >= STRONG_RATIO)
        .map(|p| p.page.as_str())
        .collect();
    if !good_pages.is_empty() {
        let shown: Vec<&str> = good_pages.iter().take(3).copied().collect();
        out.push(format!(
            "{} page(s) with excellent performance (90%+ pass rate): {}",
            good_pages.len(),
            shown.join(", ")
        ));
    }

    for entry in &analysis.by_kind {
        if entry.tally.total > 0 && entry.tally.ratio() >= STRONG_RATIO {
            out.push(format!(
                "Strong {} elements ({}% pass rate)",
                entry.kind,
                percent(&entry.tally)
            ));
        }
    }

    if analysis.failed == 0 {
        out.push("No detected failures - robust UI implementation".to_string());
    } else if analysis.failed < 5 {
        out.push("Minimal failures - stable user interface".to_string());
    }

    if analysis.total_elements() >= 20 {
        out.push("Comprehensive interactive elements handling".to_string());
    }

    if out.is_empty() {
        out.push("Basic functionality is present".to_string());
    }

    out
}

pub fn weaknesses(analysis: &Analysis) -> Vec<String> {
    let mut out = Vec::new();

    if analysis.pass_rate < 50.0 {
        out.push("Low overall functionality - major UI issues detected".to_string());
    } else if analysis.pass_rate < 75.0 {
        out.push("Moderate functionality - several areas need improvement".to_string());
    }

    let poor_pages = pages_where(&analysis.by_page, |t| t.ratio() < WEAK_RATIO).count();
    if poor_pages > 0 {
        out.push(format!(
            "{} page(s) with poor performance (<70% pass rate)",
            poor_pages
        ));
    }

    for entry in &analysis.by_kind {
        if entry.tally.total > 0 && entry.tally.ratio() < WEAK_RATIO {
            out.push(format!(
                "Weak {} elements ({}% pass rate - potential interactivity issues)",
                entry.kind,
                percent(&entry.tally)
            ));
        }
    }

    for entry in analysis.sorted_error_patterns() {
        if entry.count > 0 {
            out.push(format!(
                "{}: {} occurrences - indicates systematic problems",
                entry.pattern, entry.count
            ));
        }
    }

    if out.is_empty() {
        out.push("No major weaknesses identified".to_string());
    }

    out
}

pub fn recommendations(analysis: &Analysis) -> Vec<String> {
    let mut out = Vec::new();

    if analysis.pass_rate < 75.0 {
        out.push("Prioritize fixing failing interactions to improve user experience".to_string());
        out.push("Conduct thorough UI review focusing on failed tests".to_string());
    }

    // One targeted line per cluster, fixed order.
    let targeted = [
        (
            ErrorPattern::ElementNotFound,
            "Address",
            "missing elements - verify all interactive components are properly rendered",
        ),
        (
            ErrorPattern::ElementNotInteractable,
            "Fix",
            "non-interactable elements - ensure proper visibility, enable states, and z-index",
        ),
        (
            ErrorPattern::Timeout,
            "Resolve",
            "timeout issues - optimize page load times and asynchronous operations",
        ),
        (
            ErrorPattern::InvalidElementState,
            "Check",
            "invalid state issues - ensure actions match element types (e.g., no filling buttons)",
        ),
        (
            ErrorPattern::OtherError,
            "Investigate",
            "uncategorized failures - review the failed test details below",
        ),
    ];
    for (pattern, verb, text) in targeted {
        let count = analysis.error_count(pattern);
        if count > 0 {
            out.push(format!("{} {} {}", verb, count, text));
        }
    }

    let poor_pages: Vec<&PageTally> =
        pages_where(&analysis.by_page, |t| t.ratio() < WEAK_RATIO).collect();
    if !poor_pages.is_empty() {
        out.push(format!(
            "Focus improvements on {} underperforming pages",
            poor_pages.len()
        ));
        for page in poor_pages.iter().take(3) {
            out.push(format!("  \u{2022} Optimize {}", page.page));
        }
    }

    for entry in &analysis.by_kind {
        if entry.tally.total > 0 && entry.tally.ratio() < WEAK_RATIO {
            out.push(format!(
                "Review {} implementations for better reliability",
                entry.kind
            ));
        }
    }

    out.push("Add client-side validation for inputs to prevent invalid submissions".to_string());
    out.push("Ensure all elements have appropriate ARIA attributes for accessibility".to_string());
    out.push("Implement error handling and user feedback for failed interactions".to_string());

    out
}

pub fn detailed_scores(analysis: &Analysis, grade: Grade) -> BTreeMap<String, String> {
    let mut scores = BTreeMap::new();
    scores.insert("Overall".to_string(), overall_line(grade));

    for entry in &analysis.by_kind {
        if entry.tally.total > 0 {
            scores.insert(
                format!("{} Elements", capitalize(entry.kind.as_str())),
                score_text(&entry.tally),
            );
        }
    }

    for entry in &analysis.by_page {
        if entry.tally.total > 0 {
            scores.insert(
                format!("Page: {}", short_page(&entry.page)),
                score_text(&entry.tally),
            );
        }
    }

    scores
}

// ============================================================================
// Helpers
// ============================================================================

fn pages_where<'a>(
    pages: &'a [PageTally],
    pred: impl Fn(&Tally) -> bool + 'a,
) -> impl Iterator<Item = &'a PageTally> + 'a {
    pages
        .iter()
        .filter(move |p| p.tally.total > 0 && pred(&p.tally))
}

fn percent(tally: &Tally) -> i64 {
    (tally.ratio() * 100.0).round_ties_even() as i64
}

fn score_text(tally: &Tally) -> String {
    format!("{:.1}% ({}/{})", tally.rate(), tally.passed, tally.total)
}

/// Page label for the detailed scores, at most 40 characters.
pub fn short_page(page: &str) -> String {
    if page.chars().count() <= MAX_PAGE_LABEL {
        page.to_string()
    } else {
        let head: String = page.chars().take(MAX_PAGE_LABEL - 3).collect();
        format!("{}...", head)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
