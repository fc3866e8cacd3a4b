use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    analysis::{aggregator::aggregate, assessment::assess},
    browser::{
        browser_config::Profile,
        driver::{Driver, DriverError},
    },
    crawler::{
        crawl_config::{CrawlConfig, CrawlMode},
        crawler::Crawler,
        operator::OperatorHook,
        run_context::RunContext,
        url_scope::ScopeError,
    },
    report::report_model::{RunMetadata, RunReport},
    scan::scanner,
    scenario::{
        generator::{self, fingerprint},
        scenario_model::{Scenario, ScenarioCounter},
    },
};

pub mod analysis;
pub mod browser;
pub mod cli;
pub mod crawler;
pub mod executor;
pub mod report;
pub mod scan;
pub mod scenario;
pub mod trace;

// ============================================================================
// Full pipeline: crawl → scan → generate → execute → aggregate
// ============================================================================

/// Run the whole pipeline against an open driver and build the report.
///
/// Driver-session loss does not fail the call: the crawl stops, the partial
/// results are aggregated and the abort reason lands in the metadata.
pub fn run_pipeline(
    driver: &mut dyn Driver,
    mut crawler: Crawler,
    operator: &mut dyn OperatorHook,
    profile: Profile,
) -> Result<RunReport, ScopeError> {
    let started_at = Local::now();
    let mut ctx = RunContext::new(&crawler.config.start_url)?;

    crawler.run(driver, operator, &mut ctx);
    if let Some(reason) = &ctx.abort_reason {
        warn!(reason = %reason, "run aborted, reporting partial results");
    }

    Ok(build_report(ctx, crawler.config.mode, profile, started_at))
}

/// Aggregate a finished run context into a report.
pub fn build_report(
    ctx: RunContext,
    mode: CrawlMode,
    profile: Profile,
    started_at: DateTime<Local>,
) -> RunReport {
    let analysis = aggregate(&ctx.results, &ctx.elements, &ctx.base);
    let assessment = assess(&analysis, ctx.visited.len());

    info!(
        pass_rate = analysis.pass_rate,
        grade = assessment.grade.label(),
        "run assessed"
    );

    let metadata = RunMetadata {
        target_url: ctx.target_url,
        base: ctx.base,
        mode,
        profile,
        started_at,
        pages: ctx.visited.urls().to_vec(),
        elements_analyzed: ctx.elements.len(),
        scenario_fingerprint: fingerprint(&ctx.scenarios),
        abort_reason: ctx.abort_reason,
    };

    RunReport {
        metadata,
        analysis,
        assessment,
        results: ctx.results,
    }
}

// ============================================================================
// Plan only: scan one page and generate, no execution
// ============================================================================

#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Scope(#[from] ScopeError),

    #[error("failed to load {url}: {source}")]
    Load {
        url: String,
        #[source]
        source: DriverError,
    },

    #[error(transparent)]
    Driver(#[from] DriverError),
}

/// Load `config.start_url`, scan it and return the scenarios it would run.
pub fn plan_page(driver: &mut dyn Driver, config: &CrawlConfig) -> Result<Vec<Scenario>, PlanError> {
    let ctx = RunContext::new(&config.start_url)?;

    driver
        .navigate(&ctx.target_url, config.page_load_timeout)
        .map_err(|source| PlanError::Load {
            url: ctx.target_url.clone(),
            source,
        })?;

    let landed = driver.current_url()?;
    let elements = scanner::scan(driver, &landed)?;
    let mut counter = ScenarioCounter::new();

    Ok(generator::generate_all(&elements, &mut counter))
}
