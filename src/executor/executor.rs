use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::browser::driver::{Driver, DriverError, ElementHandle};
use crate::scan::scanner::truncate_chars;
use crate::scenario::scenario_model::{Action, Scenario};

use super::result_model::{ErrorKind, MAX_ERROR_CHARS, TestResult, TestStatus};

/// Failure raised while dispatching a scenario.
#[derive(Debug)]
enum StepFailure {
    Driver(DriverError),
    Message(String),
}

impl From<DriverError> for StepFailure {
    fn from(e: DriverError) -> Self {
        StepFailure::Driver(e)
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Runs scenarios one at a time against the live page.
#[derive(Debug, Clone)]
pub struct Executor {
    /// Bound on each element wait (presence, clickability)
    pub wait: Duration,

    /// Delay between polls while waiting
    pub poll_interval: Duration,
}

impl Default for Executor {
    fn default() -> Self {
        Self {
            wait: Duration::from_secs(2),
            poll_interval: Duration::from_millis(100),
        }
    }
}

impl Executor {
    pub fn with_wait(wait: Duration) -> Self {
        Self {
            wait,
            poll_interval: Duration::from_millis(10).min(wait),
        }
    }

    /// Execute one scenario and classify the outcome.
    ///
    /// The result starts as passed and is flipped to failed only on an
    /// explicit error path. Duration covers the whole dispatch and is
    /// recorded on failure too. `Err` is returned only when the browser
    /// session itself is gone.
    pub fn execute(
        &self,
        driver: &mut dyn Driver,
        scenario: &Scenario,
        page_url: &str,
    ) -> Result<TestResult, DriverError> {
        let mut result = TestResult {
            scenario_id: scenario.scenario_id.clone(),
            title: scenario.title.clone(),
            kind: scenario.kind,
            status: TestStatus::Passed,
            error: None,
            execution_time_seconds: 0.0,
            page_url: page_url.to_string(),
        };

        let start = Instant::now();
        let outcome = self.dispatch(driver, scenario);
        result.execution_time_seconds = round2(start.elapsed().as_secs_f64());

        match outcome {
            Ok(()) => {}
            Err(StepFailure::Driver(e)) if e.is_fatal() => return Err(e),
            Err(failure) => {
                result.status = TestStatus::Failed;
                result.error = Some(classify(failure));
            }
        }

        debug!(
            scenario = %result.scenario_id,
            status = result.status.as_str(),
            secs = result.execution_time_seconds,
            "scenario executed"
        );

        Ok(result)
    }

    fn dispatch(&self, driver: &mut dyn Driver, scenario: &Scenario) -> Result<(), StepFailure> {
        let element = self.locate(driver, &scenario.selector)?;
        driver.scroll_into_view(&element)?;

        match scenario.action {
            Action::Click => {
                let element = self.wait_clickable(driver, &scenario.selector)?;
                driver.click(&element)?;
            }
            Action::Fill => {
                driver.clear(&element)?;
                driver.send_keys(&element, &scenario.test_data)?;
            }
            Action::Check => {
                if !driver.is_selected(&element)? {
                    driver.click(&element)?;
                }
            }
            Action::Select => {
                let options = driver.options(&element)?;
                if options.is_empty() {
                    return Err(StepFailure::Message("No options in select".into()));
                }
                let option = &options[select_index(options.len())];
                if !driver.is_selected(option)? {
                    driver.click(option)?;
                }
            }
        }

        Ok(())
    }

    /// First element matching `selector`, polling until `self.wait` expires.
    fn locate(&self, driver: &mut dyn Driver, selector: &str) -> Result<ElementHandle, DriverError> {
        let deadline = Instant::now() + self.wait;
        loop {
            if let Some(first) = driver.query(selector)?.into_iter().next() {
                return Ok(first);
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(format!(
                    "waited {} ms for presence of {}",
                    self.wait.as_millis(),
                    selector
                )));
            }
            thread::sleep(self.poll_interval);
        }
    }

    /// Re-locate `selector` until it is displayed and enabled.
    fn wait_clickable(
        &self,
        driver: &mut dyn Driver,
        selector: &str,
    ) -> Result<ElementHandle, DriverError> {
        let deadline = Instant::now() + self.wait;
        loop {
            match clickable(driver, selector) {
                Ok(Some(element)) => return Ok(element),
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(_) => {}
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout(format!(
                    "waited {} ms for {} to be clickable",
                    self.wait.as_millis(),
                    selector
                )));
            }
            thread::sleep(self.poll_interval);
        }
    }
}

fn clickable(driver: &mut dyn Driver, selector: &str) -> Result<Option<ElementHandle>, DriverError> {
    let Some(element) = driver.query(selector)?.into_iter().next() else {
        return Ok(None);
    };
    if driver.is_displayed(&element)? && driver.is_enabled(&element)? {
        Ok(Some(element))
    } else {
        Ok(None)
    }
}

/// Prefer the second option, fall back to the only one.
pub fn select_index(option_count: usize) -> usize {
    1.min(option_count.saturating_sub(1))
}

/// Map a dispatch failure onto the result taxonomy (first match wins).
fn classify(failure: StepFailure) -> ErrorKind {
    match failure {
        StepFailure::Driver(DriverError::NoSuchElement(_) | DriverError::Timeout(_)) => {
            ErrorKind::ElementNotFound
        }
        StepFailure::Driver(
            DriverError::NotInteractable(_) | DriverError::InvalidElementState(_),
        ) => ErrorKind::ElementNotInteractable,
        StepFailure::Driver(e) => ErrorKind::Other(truncate_chars(&e.to_string(), MAX_ERROR_CHARS)),
        StepFailure::Message(m) => ErrorKind::Other(truncate_chars(&m, MAX_ERROR_CHARS)),
    }
}

fn round2(secs: f64) -> f64 {
    (secs * 100.0).round_ties_even() / 100.0
}
