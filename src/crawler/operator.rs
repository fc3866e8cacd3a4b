use std::io::{BufRead, Write};

use tracing::warn;

/// Suspension point before the first page is scanned.
///
/// Lets a human deal with logins, cookie banners or captchas in a visible
/// browser. Called at most once per run.
pub trait OperatorHook {
    fn await_operator_ready(&mut self, url: &str);
}

/// Automated runs: never pause.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperator;

impl OperatorHook for NoopOperator {
    fn await_operator_ready(&mut self, _url: &str) {}
}

/// Prompt on stderr and block until the operator presses Enter.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinOperator;

impl OperatorHook for StdinOperator {
    fn await_operator_ready(&mut self, url: &str) {
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "Loaded {}\nHandle cookies/login in the browser if needed, then press Enter...",
            url
        );
        let _ = stderr.flush();

        let mut line = String::new();
        if let Err(e) = std::io::stdin().lock().read_line(&mut line) {
            warn!(error = %e, "could not read operator confirmation, continuing");
        }
    }
}
