use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::executor::result_model::TestResult;
use crate::scan::element_model::ElementType;
use crate::scenario::scenario_model::ScenarioKind;

// ============================================================================
// Tallies
// ============================================================================

/// Pass/fail counters for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl Tally {
    pub fn record(&mut self, passed: bool) {
        self.total += 1;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Fraction of passed results, 0.0 when empty.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    /// Pass percentage rounded to one decimal.
    pub fn rate(&self) -> f64 {
        round1(self.ratio() * 100.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindTally {
    pub kind: ScenarioKind,
    pub tally: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageTally {
    /// URL with the base origin stripped; `/` for the root
    pub page: String,
    pub tally: Tally,
}

// ============================================================================
// Error clustering
// ============================================================================

/// Coarse failure category derived from the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorPattern {
    ElementNotFound,
    Timeout,
    ElementNotInteractable,
    InvalidElementState,
    OtherError,
}

impl ErrorPattern {
    /// Classify by case-insensitive substring; first match wins.
    pub fn classify(error: &str) -> Self {
        let error = error.to_lowercase();
        if error.contains("not found") {
            ErrorPattern::ElementNotFound
        } else if error.contains("timeout") {
            ErrorPattern::Timeout
        } else if error.contains("not interactable") || error.contains("not clickable") {
            ErrorPattern::ElementNotInteractable
        } else if error.contains("invalid element state") {
            ErrorPattern::InvalidElementState
        } else {
            ErrorPattern::OtherError
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ErrorPattern::ElementNotFound => "Element Not Found",
            ErrorPattern::Timeout => "Timeout",
            ErrorPattern::ElementNotInteractable => "Element Not Interactable",
            ErrorPattern::InvalidElementState => "Invalid Element State",
            ErrorPattern::OtherError => "Other Error",
        }
    }
}

impl fmt::Display for ErrorPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorCount {
    pub pattern: ErrorPattern,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementCount {
    pub element_type: ElementType,
    pub count: usize,
}

// ============================================================================
// Analysis
// ============================================================================

/// Read-only statistics computed once from a run's results and elements.
///
/// Every grouping is a `Vec` in first-seen order, so aggregating the same
/// input twice serializes identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,

    /// `passed / total * 100`, one decimal; 0.0 when nothing ran
    pub pass_rate: f64,

    pub by_kind: Vec<KindTally>,
    pub by_page: Vec<PageTally>,
    pub error_patterns: Vec<ErrorCount>,
    pub elements_by_type: Vec<ElementCount>,

    /// Failed results in execution order
    pub failures: Vec<TestResult>,
}

impl Analysis {
    pub fn total_elements(&self) -> usize {
        self.elements_by_type.iter().map(|e| e.count).sum()
    }

    pub fn error_count(&self, pattern: ErrorPattern) -> usize {
        self.error_patterns
            .iter()
            .find(|e| e.pattern == pattern)
            .map(|e| e.count)
            .unwrap_or(0)
    }

    /// Error clusters, most frequent first; ties keep first-seen order.
    pub fn sorted_error_patterns(&self) -> Vec<ErrorCount> {
        let mut sorted = self.error_patterns.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    /// The most frequent cluster; the first one seen wins a tie.
    pub fn top_error(&self) -> Option<ErrorPattern> {
        let mut top: Option<&ErrorCount> = None;
        for entry in &self.error_patterns {
            if top.is_none_or(|t| entry.count > t.count) {
                top = Some(entry);
            }
        }
        top.map(|t| t.pattern)
    }
}

// ============================================================================
// Assessment
// ============================================================================

/// Letter grade for the overall pass rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_pass_rate(pass_rate: f64) -> Self {
        if pass_rate >= 90.0 {
            Grade::A
        } else if pass_rate >= 80.0 {
            Grade::B
        } else if pass_rate >= 70.0 {
            Grade::C
        } else if pass_rate >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::A => "A (Excellent)",
            Grade::B => "B (Good)",
            Grade::C => "C (Fair)",
            Grade::D => "D (Poor)",
            Grade::F => "F (Needs Significant Improvement)",
        }
    }

    pub fn band(&self) -> &'static str {
        match self {
            Grade::A => "90-100%",
            Grade::B => "80-89%",
            Grade::C => "70-79%",
            Grade::D => "60-69%",
            Grade::F => "<60%",
        }
    }
}

/// Grade plus the rule-based narrative for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub grade: Grade,

    /// `"{band} - {grade label}"`
    pub overall: String,

    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,

    /// Category label → score text, sorted by label
    pub detailed_scores: BTreeMap<String, String>,
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
