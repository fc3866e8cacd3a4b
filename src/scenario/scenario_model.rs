use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a scenario exercises the happy path or exercises validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Functional,
    Negative,
}

impl ScenarioKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScenarioKind::Functional => "functional",
            ScenarioKind::Negative => "negative",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction dispatched by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Wait until clickable, then click
    Click,
    /// Clear, then type `test_data`
    Fill,
    /// Click only if not already checked
    Check,
    /// Pick an option by index
    Select,
}

/// One concrete test case bound to one element and one action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// `TEST_{NNNN}_{k}`, unique within a run
    pub scenario_id: String,

    pub title: String,

    pub kind: ScenarioKind,

    pub action: Action,

    /// Locator of the element scanned in the same page cycle
    pub selector: String,

    /// Text typed by `fill`; empty for every other action
    pub test_data: String,
}

// ============================================================================
// Scenario counter
// ============================================================================

/// Run-wide count of scenarios produced so far.
///
/// Read-then-advance on every generator call keeps IDs unique within a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScenarioCounter {
    produced: usize,
}

impl ScenarioCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scenarios produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Claim the ID prefix for the next element and advance past its `count` scenarios.
    pub fn claim(&mut self, count: usize) -> String {
        let prefix = format!("TEST_{:04}", self.produced + 1);
        self.produced += count;
        prefix
    }
}
