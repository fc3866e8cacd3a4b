use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::browser::browser_config::BrowserConfig;
use crate::browser::driver::{Driver, DriverError, ElementHandle};

/// Request sent to the bridge over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum BrowserRequest {
    Navigate { url: String, timeout_ms: u64 },
    CurrentUrl,
    Query { selector: String },
    TagName { handle: String },
    Attribute { handle: String, name: String },
    Text { handle: String },
    Displayed { handle: String },
    Enabled { handle: String },
    Selected { handle: String },
    Click { handle: String },
    Clear { handle: String },
    SendKeys { handle: String, text: String },
    ScrollIntoView { handle: String },
    Options { handle: String },
    Quit,
}

impl BrowserRequest {
    /// Command name, used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            BrowserRequest::Navigate { .. } => "navigate",
            BrowserRequest::CurrentUrl => "current_url",
            BrowserRequest::Query { .. } => "query",
            BrowserRequest::TagName { .. } => "tag_name",
            BrowserRequest::Attribute { .. } => "attribute",
            BrowserRequest::Text { .. } => "text",
            BrowserRequest::Displayed { .. } => "displayed",
            BrowserRequest::Enabled { .. } => "enabled",
            BrowserRequest::Selected { .. } => "selected",
            BrowserRequest::Click { .. } => "click",
            BrowserRequest::Clear { .. } => "clear",
            BrowserRequest::SendKeys { .. } => "send_keys",
            BrowserRequest::ScrollIntoView { .. } => "scroll_into_view",
            BrowserRequest::Options { .. } => "options",
            BrowserRequest::Quit => "quit",
        }
    }
}

/// Error payload reported by the bridge.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BridgeError {
    pub kind: String,
    pub message: String,
}

impl BridgeError {
    /// Map the bridge's error kind onto the driver taxonomy.
    pub fn into_driver_error(self, command: &str) -> DriverError {
        match self.kind.as_str() {
            "no_such_element" => DriverError::NoSuchElement(self.message),
            "timeout" => DriverError::Timeout(self.message),
            "not_interactable" => DriverError::NotInteractable(self.message),
            "invalid_state" => DriverError::InvalidElementState(self.message),
            "stale" => DriverError::StaleElement(self.message),
            "navigation" => DriverError::Navigation(self.message),
            "session_lost" => DriverError::SessionLost(self.message),
            _ => DriverError::Protocol {
                command: command.to_string(),
                error: self.message,
            },
        }
    }
}

/// Response received from the bridge over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<BridgeError>,
    #[serde(default)]
    pub ready: Option<bool>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub handles: Option<Vec<String>>,
    #[serde(default)]
    pub value: Option<Value>,
}

impl BrowserResponse {
    fn handles(self) -> Vec<ElementHandle> {
        self.handles
            .unwrap_or_default()
            .into_iter()
            .map(ElementHandle)
            .collect()
    }

    fn flag(&self) -> bool {
        self.value.as_ref().and_then(Value::as_bool).unwrap_or(false)
    }

    fn string(&self) -> Option<String> {
        self.value
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// A persistent browser session backed by a Node.js bridge process.
///
/// The bridge keeps one Chromium instance open for the whole run. Commands
/// are sent as NDJSON over stdin, responses read from stdout. The launch
/// configuration is handed to the bridge once, as its only argument.
pub struct BrowserSession {
    child: Child,
    stdin: ChildStdin,
    reader: BufReader<ChildStdout>,
    closed: bool,
}

impl BrowserSession {
    /// Spawn the bridge and wait for its ready signal.
    pub fn launch(config: &BrowserConfig) -> Result<Self, DriverError> {
        let launch_args = serde_json::json!({
            "headless": config.headless,
            "args": config.chromium_args(),
            "viewport": { "width": config.window_size.0, "height": config.window_size.1 },
        });

        info!(
            headless = config.headless,
            script = %config.bridge_script,
            "launching browser bridge"
        );

        let mut child = Command::new(&config.node_path)
            .arg(&config.bridge_script)
            .arg(launch_args.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| DriverError::Spawn {
                program: config.node_path.clone(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| DriverError::Io("failed to capture bridge stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| DriverError::Io("failed to capture bridge stdout".into()))?;

        let mut session = BrowserSession {
            child,
            stdin,
            reader: BufReader::new(stdout),
            closed: false,
        };

        let response = session.read_response()?;
        if !response.ok || response.ready != Some(true) {
            return Err(DriverError::Protocol {
                command: "launch".into(),
                error: "did not receive ready signal from bridge".into(),
            });
        }

        Ok(session)
    }

    fn read_response(&mut self) -> Result<BrowserResponse, DriverError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| DriverError::Io(format!("failed to read from bridge: {}", e)))?;

        if read == 0 || line.trim().is_empty() {
            return Err(DriverError::SessionLost(
                "empty response from bridge (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| DriverError::Json {
            context: "bridge response".into(),
            source: e,
        })
    }

    /// Send a request and read the response.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DriverError> {
        if self.closed {
            return Err(DriverError::SessionLost("session already closed".into()));
        }

        let json = serde_json::to_string(request).map_err(|e| DriverError::Json {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .and_then(|_| self.stdin.flush())
            .map_err(|e| DriverError::Io(format!("failed to write to bridge: {}", e)))?;

        self.read_response()
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, DriverError> {
        let response = self.send(request)?;
        if !response.ok {
            let error = response.error.unwrap_or(BridgeError {
                kind: "unknown".into(),
                message: "unknown error".into(),
            });
            return Err(error.into_driver_error(request.name()));
        }
        Ok(response)
    }

    fn element_flag(
        &mut self,
        request: BrowserRequest,
    ) -> Result<bool, DriverError> {
        Ok(self.send_ok(&request)?.flag())
    }
}

impl Driver for BrowserSession {
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError> {
        debug!(url, "navigate");
        self.send_ok(&BrowserRequest::Navigate {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })?;
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        let response = self.send_ok(&BrowserRequest::CurrentUrl)?;
        response.url.ok_or_else(|| DriverError::Protocol {
            command: "current_url".into(),
            error: "no URL in response".into(),
        })
    }

    fn query(&mut self, css: &str) -> Result<Vec<ElementHandle>, DriverError> {
        let response = self.send_ok(&BrowserRequest::Query {
            selector: css.to_string(),
        })?;
        Ok(response.handles())
    }

    fn tag_name(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        let response = self.send_ok(&BrowserRequest::TagName {
            handle: element.0.clone(),
        })?;
        Ok(response.string().unwrap_or_default().to_lowercase())
    }

    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let response = self.send_ok(&BrowserRequest::Attribute {
            handle: element.0.clone(),
            name: name.to_string(),
        })?;
        Ok(response.string())
    }

    fn text(&mut self, element: &ElementHandle) -> Result<String, DriverError> {
        let response = self.send_ok(&BrowserRequest::Text {
            handle: element.0.clone(),
        })?;
        Ok(response.string().unwrap_or_default())
    }

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.element_flag(BrowserRequest::Displayed {
            handle: element.0.clone(),
        })
    }

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.element_flag(BrowserRequest::Enabled {
            handle: element.0.clone(),
        })
    }

    fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, DriverError> {
        self.element_flag(BrowserRequest::Selected {
            handle: element.0.clone(),
        })
    }

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::Click {
            handle: element.0.clone(),
        })?;
        Ok(())
    }

    fn clear(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::Clear {
            handle: element.0.clone(),
        })?;
        Ok(())
    }

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::SendKeys {
            handle: element.0.clone(),
            text: text.to_string(),
        })?;
        Ok(())
    }

    fn scroll_into_view(&mut self, element: &ElementHandle) -> Result<(), DriverError> {
        self.send_ok(&BrowserRequest::ScrollIntoView {
            handle: element.0.clone(),
        })?;
        Ok(())
    }

    fn options(&mut self, element: &ElementHandle) -> Result<Vec<ElementHandle>, DriverError> {
        let response = self.send_ok(&BrowserRequest::Options {
            handle: element.0.clone(),
        })?;
        Ok(response.handles())
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        if self.closed {
            return Ok(());
        }
        // Best-effort: the process may already be gone
        let _ = self.send(&BrowserRequest::Quit);
        self.closed = true;
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
