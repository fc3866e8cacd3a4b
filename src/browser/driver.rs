use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Element handles
// ============================================================================

/// Opaque reference to a live DOM node owned by the driver.
///
/// Handles are only meaningful to the driver that produced them and may go
/// stale when the page re-renders or navigates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        ElementHandle(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

// ============================================================================
// Driver errors
// ============================================================================

#[derive(Debug, Error)]
pub enum DriverError {
    /// No element matched the locator
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// A bounded wait expired
    #[error("timeout: {0}")]
    Timeout(String),

    /// Element exists but cannot receive the requested interaction
    #[error("element not interactable: {0}")]
    NotInteractable(String),

    /// Element is in a state that forbids the action (e.g. filling a button)
    #[error("invalid element state: {0}")]
    InvalidElementState(String),

    /// Element was detached from the DOM after it was located
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// Page navigation failed or timed out
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// The browser session is gone (process died, window closed)
    #[error("browser session lost: {0}")]
    SessionLost(String),

    /// The bridge answered a command with an error we do not classify
    #[error("{command} failed: {error}")]
    Protocol { command: String, error: String },

    /// Reading from or writing to the bridge process failed
    #[error("bridge I/O error: {0}")]
    Io(String),

    /// Bridge traffic could not be (de)serialized
    #[error("JSON error ({context}): {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The bridge process could not be started
    #[error("failed to spawn {program} (is Node.js installed?): {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

impl DriverError {
    /// Whether the session is unusable after this error.
    ///
    /// Fatal errors end the whole run; everything else is scoped to the
    /// scenario or page that triggered it.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DriverError::SessionLost(_) | DriverError::Io(_) | DriverError::Spawn { .. }
        )
    }
}

// ============================================================================
// Driver capability
// ============================================================================

/// Browser-control capability consumed by the scanner, executor and crawler.
///
/// Every call is blocking. Implementations report failures through
/// `DriverError` so callers can decide between skipping and aborting.
pub trait Driver {
    /// Load `url`, failing with `Navigation` if it does not finish within `timeout`.
    fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), DriverError>;

    /// URL of the page currently loaded, as reported by the browser.
    fn current_url(&mut self) -> Result<String, DriverError>;

    /// All elements matching a CSS selector, in DOM order.
    fn query(&mut self, css: &str) -> Result<Vec<ElementHandle>, DriverError>;

    /// Lower-case tag name.
    fn tag_name(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    /// Attribute (or reflected property) value. `None` when absent.
    fn attribute(
        &mut self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Rendered text content.
    fn text(&mut self, element: &ElementHandle) -> Result<String, DriverError>;

    fn is_displayed(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    fn is_enabled(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    fn is_selected(&mut self, element: &ElementHandle) -> Result<bool, DriverError>;

    fn click(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    fn clear(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    fn send_keys(&mut self, element: &ElementHandle, text: &str) -> Result<(), DriverError>;

    fn scroll_into_view(&mut self, element: &ElementHandle) -> Result<(), DriverError>;

    /// `<option>` children of a select control, in DOM order.
    fn options(&mut self, element: &ElementHandle) -> Result<Vec<ElementHandle>, DriverError>;

    /// Close the session. Best-effort.
    fn quit(&mut self) -> Result<(), DriverError>;
}
