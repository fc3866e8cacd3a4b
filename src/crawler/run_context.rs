use std::collections::{HashSet, VecDeque};

use crate::executor::result_model::TestResult;
use crate::scan::element_model::Element;
use crate::scenario::scenario_model::{Scenario, ScenarioCounter};

use super::url_scope::{ScopeError, base_origin, domain_of, normalize};

// ============================================================================
// Visit set
// ============================================================================

/// URLs already loaded, in visitation order. Only ever grows.
///
/// A redirect target is kept as an alias of the page that was requested:
/// it blocks revisits without counting as a page of its own.
#[derive(Debug, Clone, Default)]
pub struct VisitedPages {
    order: Vec<String>,
    seen: HashSet<String>,
}

impl VisitedPages {
    /// Record a visit. Returns false if the URL was already present.
    pub fn insert(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.order.push(url.to_string());
        true
    }

    /// Record the URL a load actually landed on. Returns false if it is
    /// already known, either as a page or as an earlier alias.
    pub fn alias(&mut self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Visited URLs in the order they were loaded.
    pub fn urls(&self) -> &[String] {
        &self.order
    }
}

// ============================================================================
// Run context
// ============================================================================

/// All mutable state of one run, owned by the crawl controller.
///
/// Passed by `&mut` into each component call instead of living in module
/// state, so several runs (or sessions) never share counters by accident.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Normalized start URL
    pub target_url: String,

    /// Host (and port) every visited page must share
    pub domain: String,

    /// `scheme://host[:port]`, stripped from page labels
    pub base: String,

    pub visited: VisitedPages,

    /// BFS queue of `(url, depth)`; FIFO, never reordered
    pub frontier: VecDeque<(String, usize)>,

    pub elements: Vec<Element>,

    pub scenarios: Vec<Scenario>,

    pub results: Vec<TestResult>,

    pub counter: ScenarioCounter,

    /// Set when a fatal driver error ended the run early
    pub abort_reason: Option<String>,
}

impl RunContext {
    /// Build a fresh context with the start URL queued at depth 0.
    pub fn new(start_url: &str) -> Result<Self, ScopeError> {
        let target_url = normalize(start_url).ok_or_else(|| ScopeError::InvalidTarget {
            url: start_url.to_string(),
            reason: "not an absolute URL".into(),
        })?;
        let domain =
            domain_of(&target_url).ok_or_else(|| ScopeError::MissingHost(start_url.to_string()))?;
        let base =
            base_origin(&target_url).ok_or_else(|| ScopeError::MissingHost(start_url.to_string()))?;

        let mut frontier = VecDeque::new();
        frontier.push_back((target_url.clone(), 0));

        Ok(Self {
            target_url,
            domain,
            base,
            visited: VisitedPages::default(),
            frontier,
            elements: Vec::new(),
            scenarios: Vec::new(),
            results: Vec::new(),
            counter: ScenarioCounter::new(),
            abort_reason: None,
        })
    }

    /// Whether `url` is already waiting in the frontier.
    pub fn is_queued(&self, url: &str) -> bool {
        self.frontier.iter().any(|(queued, _)| queued == url)
    }
}
