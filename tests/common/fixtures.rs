use chrono::{Local, TimeZone};

use ui_sweep::analysis::aggregator::aggregate;
use ui_sweep::analysis::assessment::assess;
use ui_sweep::browser::browser_config::Profile;
use ui_sweep::crawler::crawl_config::CrawlMode;
use ui_sweep::executor::result_model::{ErrorKind, TestResult, TestStatus};
use ui_sweep::report::report_model::{RunMetadata, RunReport};
use ui_sweep::scan::element_model::{Element, ElementType};
use ui_sweep::scenario::scenario_model::ScenarioKind;

pub const BASE: &str = "https://shop.test";

pub fn passed(id: &str, title: &str, kind: ScenarioKind, page: &str) -> TestResult {
    TestResult {
        scenario_id: id.to_string(),
        title: title.to_string(),
        kind,
        status: TestStatus::Passed,
        error: None,
        execution_time_seconds: 0.12,
        page_url: format!("{}{}", BASE, page),
    }
}

pub fn failed(
    id: &str,
    title: &str,
    kind: ScenarioKind,
    page: &str,
    error: ErrorKind,
) -> TestResult {
    TestResult {
        status: TestStatus::Failed,
        error: Some(error),
        execution_time_seconds: 2.0,
        ..passed(id, title, kind, page)
    }
}

pub fn elements(element_type: ElementType, count: usize, page: &str) -> Vec<Element> {
    (0..count)
        .map(|i| {
            Element::new(
                element_type,
                element_type.as_str(),
                format!("#{}-{}", element_type.as_str(), i),
                format!("{}{}", BASE, page),
            )
        })
        .collect()
}

/// Two pages: `/` all green, `/contact` with two failures.
pub fn mixed_results() -> Vec<TestResult> {
    vec![
        passed("TEST_0001_1", "Click button: Search", ScenarioKind::Functional, "/"),
        passed("TEST_0002_1", "Click link: About", ScenarioKind::Functional, "/"),
        passed("TEST_0003_1", "Valid input test: email", ScenarioKind::Functional, "/contact"),
        failed(
            "TEST_0003_2",
            "Empty input test: email",
            ScenarioKind::Negative,
            "/contact",
            ErrorKind::ElementNotInteractable,
        ),
        failed(
            "TEST_0003_3",
            "Invalid email test: email",
            ScenarioKind::Negative,
            "/contact",
            ErrorKind::ElementNotFound,
        ),
    ]
}

pub fn report_from(results: Vec<TestResult>, elements: Vec<Element>, pages: &[&str]) -> RunReport {
    let analysis = aggregate(&results, &elements, BASE);
    let assessment = assess(&analysis, pages.len());

    RunReport {
        metadata: RunMetadata {
            target_url: format!("{}/", BASE),
            base: BASE.to_string(),
            mode: CrawlMode::Crawl,
            profile: Profile::Fast,
            started_at: Local
                .with_ymd_and_hms(2025, 3, 14, 9, 26, 53)
                .single()
                .unwrap_or_else(Local::now),
            pages: pages.iter().map(|p| format!("{}{}", BASE, p)).collect(),
            elements_analyzed: elements.len(),
            scenario_fingerprint: "0123456789abcdef0123456789abcdef01234567".to_string(),
            abort_reason: None,
        },
        analysis,
        assessment,
        results,
    }
}

pub fn mixed_report() -> RunReport {
    let mut elems = elements(ElementType::Button, 1, "/");
    elems.extend(elements(ElementType::Link, 1, "/"));
    elems.extend(elements(ElementType::Input, 1, "/contact"));
    report_from(mixed_results(), elems, &["/", "/contact"])
}
