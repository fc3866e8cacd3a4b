use tracing::{info, warn};

use crate::browser::driver::Driver;
use crate::browser::session::BrowserSession;
use crate::cli::config::{AppConfig, ReportFormat, RunArgs, RunOptions, resolve_run_options};
use crate::crawler::crawler::Crawler;
use crate::crawler::operator::{NoopOperator, OperatorHook, StdinOperator};
use crate::executor::executor::Executor;
use crate::report::console::format_console_summary;
use crate::report::junit::generate_junit_xml;
use crate::report::report_model::{RunReport, default_report_filename};
use crate::report::summary::render_json;
use crate::report::text::render_text;
use crate::trace::logger::TraceLogger;
use crate::{plan_page, run_pipeline};

// ============================================================================
// run subcommand
// ============================================================================

/// Test a website and return whether every scenario passed.
pub fn cmd_run(args: &RunArgs, config: &AppConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let options = resolve_run_options(args, config)?;

    info!(
        url = %options.crawl.start_url,
        mode = options.crawl.mode.label(),
        profile = options.profile.as_str(),
        "starting run"
    );

    let mut session = BrowserSession::launch(&options.browser)?;
    let report = execute_run(&mut session, &options)?;
    if let Err(e) = session.quit() {
        warn!(error = %e, "browser did not shut down cleanly");
    }

    let content = render_report(&report, options.format)?;
    let destination = match (&options.output, options.format) {
        (Some(path), _) => Some(path.clone()),
        (None, ReportFormat::Text) => Some(default_report_filename(&report.metadata.started_at)),
        (None, _) => None,
    };

    match destination {
        Some(path) => {
            std::fs::write(&path, &content)?;
            println!("Report saved to {}", path);
        }
        None => print!("{}", content),
    }

    if let Some(reason) = &report.metadata.abort_reason {
        eprintln!("Run aborted early: {}", reason);
    }

    Ok(report.all_passed())
}

/// Crawl and test with an already-open driver.
pub fn execute_run(
    driver: &mut dyn Driver,
    options: &RunOptions,
) -> Result<RunReport, Box<dyn std::error::Error>> {
    let mut crawler =
        Crawler::new(options.crawl.clone()).with_executor(Executor::with_wait(options.element_wait));
    if let Some(path) = &options.trace {
        crawler = crawler.with_tracer(TraceLogger::new(path));
    }

    let mut operator: Box<dyn OperatorHook> = if options.manual_auth {
        Box::new(StdinOperator)
    } else {
        Box::new(NoopOperator)
    };

    Ok(run_pipeline(
        driver,
        crawler,
        operator.as_mut(),
        options.profile,
    )?)
}

/// Render a report in the requested format.
pub fn render_report(
    report: &RunReport,
    format: ReportFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ReportFormat::Text => render_text(report),
        ReportFormat::Json => render_json(report)?,
        ReportFormat::Junit => generate_junit_xml(report),
        ReportFormat::Console => format_console_summary(report),
    })
}

// ============================================================================
// plan subcommand
// ============================================================================

pub fn cmd_plan(
    url: &str,
    output: Option<&str>,
    config: &AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let args = RunArgs {
        url: url.to_string(),
        mode: Some("single".to_string()),
        ..RunArgs::default()
    };
    let options = resolve_run_options(&args, config)?;

    let mut session = BrowserSession::launch(&options.browser)?;
    let scenarios = plan_page(&mut session, &options.crawl)?;
    if let Err(e) = session.quit() {
        warn!(error = %e, "browser did not shut down cleanly");
    }

    let yaml = serde_yaml::to_string(&scenarios)?;
    match output {
        Some(path) => {
            std::fs::write(path, &yaml)?;
            println!("Wrote {} scenarios to {}", scenarios.len(), path);
        }
        None => print!("{}", yaml),
    }

    Ok(())
}
