use crate::crawler::url_scope::page_key;
use crate::executor::result_model::TestResult;
use crate::scan::element_model::Element;

use super::analysis_model::{
    Analysis, ElementCount, ErrorCount, ErrorPattern, KindTally, PageTally, Tally, round1,
};

/// Fold a run's results and elements into an `Analysis`.
///
/// Pure: the same input always yields the same output, groupings in
/// first-seen order.
pub fn aggregate(results: &[TestResult], elements: &[Element], base: &str) -> Analysis {
    let total = results.len();
    let passed = results.iter().filter(|r| r.passed()).count();
    let failed = total - passed;

    let pass_rate = if total == 0 {
        0.0
    } else {
        round1(passed as f64 / total as f64 * 100.0)
    };

    let mut by_kind: Vec<KindTally> = Vec::new();
    let mut by_page: Vec<PageTally> = Vec::new();
    let mut error_patterns: Vec<ErrorCount> = Vec::new();
    let mut failures = Vec::new();

    for result in results {
        let ok = result.passed();

        match by_kind.iter_mut().find(|k| k.kind == result.kind) {
            Some(entry) => entry.tally.record(ok),
            None => {
                let mut tally = Tally::default();
                tally.record(ok);
                by_kind.push(KindTally {
                    kind: result.kind,
                    tally,
                });
            }
        }

        let page = page_key(&result.page_url, base);
        match by_page.iter_mut().find(|p| p.page == page) {
            Some(entry) => entry.tally.record(ok),
            None => {
                let mut tally = Tally::default();
                tally.record(ok);
                by_page.push(PageTally { page, tally });
            }
        }

        if !ok {
            let pattern = ErrorPattern::classify(&result.error_text());
            match error_patterns.iter_mut().find(|e| e.pattern == pattern) {
                Some(entry) => entry.count += 1,
                None => error_patterns.push(ErrorCount { pattern, count: 1 }),
            }
            failures.push(result.clone());
        }
    }

    let mut elements_by_type: Vec<ElementCount> = Vec::new();
    for element in elements {
        match elements_by_type
            .iter_mut()
            .find(|e| e.element_type == element.element_type)
        {
            Some(entry) => entry.count += 1,
            None => elements_by_type.push(ElementCount {
                element_type: element.element_type,
                count: 1,
            }),
        }
    }

    Analysis {
        total,
        passed,
        failed,
        pass_rate,
        by_kind,
        by_page,
        error_patterns,
        elements_by_type,
        failures,
    }
}
