use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::browser::driver::{Driver, DriverError};
use crate::executor::executor::Executor;
use crate::scan::scanner;
use crate::scenario::generator;
use crate::trace::logger::TraceLogger;
use crate::trace::trace::TraceKind;

use super::crawl_config::CrawlConfig;
use super::operator::OperatorHook;
use super::run_context::RunContext;
use super::url_scope::{in_domain, resolve_link};

// ============================================================================
// Crawl state machine
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlState {
    Idle,
    Processing(String),
    Done,
}

/// Breadth-first controller: load, scan, generate, execute, collect links.
pub struct Crawler {
    pub config: CrawlConfig,
    pub executor: Executor,
    tracer: Option<TraceLogger>,
    state: CrawlState,
}

impl Crawler {
    pub fn new(config: CrawlConfig) -> Self {
        Self {
            config,
            executor: Executor::default(),
            tracer: None,
            state: CrawlState::Idle,
        }
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Drive the frontier until it empties or the page cap is reached.
    ///
    /// A fatal driver error stops the crawl and is recorded in
    /// `ctx.abort_reason`; everything collected so far stays in `ctx`.
    pub fn run(
        &mut self,
        driver: &mut dyn Driver,
        operator: &mut dyn OperatorHook,
        ctx: &mut RunContext,
    ) {
        let page_cap = self.config.page_cap();
        let depth_cap = self.config.depth_cap();

        while ctx.visited.len() < page_cap {
            let Some((url, depth)) = ctx.frontier.pop_front() else {
                break;
            };

            if ctx.visited.contains(&url) || depth > depth_cap {
                continue;
            }

            self.state = CrawlState::Processing(url.clone());
            let first = ctx.visited.is_empty();

            info!(url = %url, depth, page = ctx.visited.len() + 1, "testing page");

            let links = match self.process_page(driver, operator, ctx, &url, first) {
                Ok(links) => links,
                Err(e) => {
                    warn!(url = %url, error = %e, "browser session lost, stopping crawl");
                    self.trace(TraceKind::RunAborted, Some(&url), Some(e.to_string()));
                    ctx.abort_reason = Some(e.to_string());
                    break;
                }
            };

            for link in links {
                if !ctx.visited.contains(&link) && !ctx.is_queued(&link) {
                    ctx.frontier.push_back((link, depth + 1));
                }
            }
            self.state = CrawlState::Idle;
        }

        self.state = CrawlState::Done;
        self.trace(
            TraceKind::RunFinished,
            None,
            Some(format!(
                "{} pages, {} results",
                ctx.visited.len(),
                ctx.results.len()
            )),
        );
        info!(
            pages = ctx.visited.len(),
            elements = ctx.elements.len(),
            results = ctx.results.len(),
            "crawl finished"
        );
    }

    /// Test one page and return the in-domain links discovered on it.
    ///
    /// Only fatal driver errors are returned; a page that fails to load is
    /// counted as visited and yields no links.
    pub fn process_page(
        &mut self,
        driver: &mut dyn Driver,
        operator: &mut dyn OperatorHook,
        ctx: &mut RunContext,
        url: &str,
        first: bool,
    ) -> Result<Vec<String>, DriverError> {
        if let Err(e) = driver.navigate(url, self.config.page_load_timeout) {
            if e.is_fatal() {
                return Err(e);
            }
            warn!(url, error = %e, "page failed to load, skipping");
            self.trace(TraceKind::PageFailed, Some(url), Some(e.to_string()));
            ctx.visited.insert(url);
            return Ok(Vec::new());
        }

        if first {
            operator.await_operator_ready(url);
        }

        ctx.visited.insert(url);
        let landed = driver.current_url()?;
        if landed != url && !ctx.visited.alias(&landed) {
            info!(url, landed = %landed, "redirected to a page already tested, skipping");
            return Ok(Vec::new());
        }
        self.trace(TraceKind::PageLoaded, Some(&landed), None);

        // --- Scan and generate ---
        let elements = scanner::scan(driver, &landed)?;
        let scenarios = generator::generate_all(&elements, &mut ctx.counter);
        debug!(
            url = %landed,
            elements = elements.len(),
            scenarios = scenarios.len(),
            "page scanned"
        );

        ctx.elements.extend(elements);
        ctx.scenarios.extend(scenarios.iter().cloned());

        // --- Execute ---
        let mut passed = 0usize;
        for scenario in &scenarios {
            let active = self.restore_page(driver, &landed)?;
            let result = self.executor.execute(driver, scenario, &active)?;
            if result.passed() {
                passed += 1;
            }
            if let Some(tracer) = &self.tracer {
                tracer.log(&tracer.event(TraceKind::ScenarioExecuted).with_result(&result));
            }
            ctx.results.push(result);
        }

        info!(
            url = %landed,
            passed,
            failed = scenarios.len() - passed,
            "page tested"
        );

        // --- Links ---
        if ctx.visited.len() >= self.config.page_cap() {
            return Ok(Vec::new());
        }

        let active = self.restore_page(driver, &landed)?;
        self.collect_links(driver, ctx, &active)
    }

    /// Reload the page under test if a previous scenario navigated away.
    ///
    /// Returns the URL that is active afterwards, which is `landed` unless
    /// the reload failed.
    fn restore_page(&self, driver: &mut dyn Driver, landed: &str) -> Result<String, DriverError> {
        let current = driver.current_url()?;
        if current == landed {
            return Ok(current);
        }

        debug!(from = %current, to = %landed, "restoring page");
        match driver.navigate(landed, self.config.page_load_timeout) {
            Ok(()) => Ok(landed.to_string()),
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(url = %landed, error = %e, "could not restore page");
                driver.current_url()
            }
        }
    }

    fn collect_links(
        &self,
        driver: &mut dyn Driver,
        ctx: &RunContext,
        page_url: &str,
    ) -> Result<Vec<String>, DriverError> {
        let anchors = match driver.query("a") {
            Ok(anchors) => anchors,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(url = page_url, error = %e, "link extraction failed");
                return Ok(Vec::new());
            }
        };

        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for anchor in anchors.iter().take(self.config.max_anchors) {
            let href = match driver.attribute(anchor, "href") {
                Ok(Some(href)) if !href.trim().is_empty() => href,
                Ok(_) => continue,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(error = %e, "skipping anchor");
                    continue;
                }
            };

            let Some(link) = resolve_link(page_url, &href) else {
                continue;
            };
            if !in_domain(&link, &ctx.domain) || ctx.visited.contains(&link) {
                continue;
            }
            if seen.insert(link.clone()) {
                links.push(link);
            }
            if links.len() >= self.config.max_new_links {
                break;
            }
        }

        debug!(url = page_url, found = links.len(), "links collected");
        Ok(links)
    }

    fn trace(&self, kind: TraceKind, url: Option<&str>, detail: Option<String>) {
        let Some(tracer) = &self.tracer else {
            return;
        };
        let mut event = tracer.event(kind);
        if let Some(url) = url {
            event = event.with_url(url);
        }
        if let Some(detail) = detail {
            event = event.with_detail(detail);
        }
        tracer.log(&event);
    }
}

