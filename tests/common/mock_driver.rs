use std::collections::{HashMap, HashSet};
use std::time::Duration;

use ui_sweep::browser::driver::{Driver, DriverError, ElementHandle};

// ============================================================================
// Scripted page model
// ============================================================================

/// Failure injected into an interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    NotInteractable,
    InvalidState,
    Other(String),
    SessionLost,
}

impl MockFailure {
    fn to_error(&self) -> DriverError {
        match self {
            MockFailure::NotInteractable => {
                DriverError::NotInteractable("element click intercepted".into())
            }
            MockFailure::InvalidState => {
                DriverError::InvalidElementState("cannot type into element".into())
            }
            MockFailure::Other(msg) => DriverError::Protocol {
                command: "mock".into(),
                error: msg.clone(),
            },
            MockFailure::SessionLost => DriverError::SessionLost("browser window closed".into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub displayed: bool,
    pub enabled: bool,
    pub selected: bool,

    /// Labels of `<option>` children (selects only)
    pub options: Vec<String>,
    pub selected_option: Option<usize>,

    /// Clicking loads this URL
    pub navigates_to: Option<String>,

    pub click_failure: Option<MockFailure>,
    pub type_failure: Option<MockFailure>,

    /// Element stops matching queries after this many matches
    pub vanishes_after: Option<usize>,
    matched: usize,
}

impl MockElement {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: String::new(),
            displayed: true,
            enabled: true,
            selected: false,
            options: Vec::new(),
            selected_option: None,
            navigates_to: None,
            click_failure: None,
            type_failure: None,
            vanishes_after: None,
            matched: 0,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn options(mut self, labels: &[&str]) -> Self {
        self.options = labels.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn navigates_to(mut self, url: &str) -> Self {
        self.navigates_to = Some(url.to_string());
        self
    }

    pub fn click_fails(mut self, failure: MockFailure) -> Self {
        self.click_failure = Some(failure);
        self
    }

    pub fn typing_fails(mut self, failure: MockFailure) -> Self {
        self.type_failure = Some(failure);
        self
    }

    pub fn vanishes_after(mut self, matches: usize) -> Self {
        self.vanishes_after = Some(matches);
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn present(&self) -> bool {
        self.vanishes_after.is_none_or(|limit| self.matched < limit)
    }

    /// Tiny CSS subset: `tag`, `#id`, `tag[attr]`, `tag[attr='v']`, `tag.c1.c2`.
    fn matches(&self, css: &str) -> bool {
        if let Some(id) = css.strip_prefix('#') {
            return self.get("id") == Some(id);
        }

        let split = css.find(['[', '.']).unwrap_or(css.len());
        let (tag, rest) = css.split_at(split);
        if !tag.is_empty() && tag != self.tag {
            return false;
        }

        if let Some(attr) = rest.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
            return match attr.split_once('=') {
                Some((name, value)) => {
                    let value = value.trim_matches(|c| c == '\'' || c == '"');
                    self.get(name) == Some(value)
                }
                None => self.get(attr).is_some(),
            };
        }

        if let Some(classes) = rest.strip_prefix('.') {
            let have: Vec<&str> = self.get("class").unwrap_or("").split_whitespace().collect();
            return classes.split('.').all(|c| have.contains(&c));
        }

        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockPage {
    pub elements: Vec<MockElement>,
}

impl MockPage {
    pub fn new(elements: Vec<MockElement>) -> Self {
        Self { elements }
    }
}

// ============================================================================
// Mock driver
// ============================================================================

#[derive(Debug, Clone)]
struct HandleTarget {
    page: String,
    element: usize,
    option: Option<usize>,
}

/// In-memory browser: scripted pages, recorded actions, injected failures.
#[derive(Debug, Default)]
pub struct MockDriver {
    pages: HashMap<String, MockPage>,
    redirects: HashMap<String, String>,
    failing_loads: HashSet<String>,
    failing_reloads: HashSet<String>,
    loaded: HashSet<String>,
    current: Option<String>,
    handles: Vec<HandleTarget>,
    lost: bool,

    /// Every navigation and interaction, in order
    pub log: Vec<String>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Loading `from` lands on `to`.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// Loading `url` fails with a navigation error.
    pub fn failing_load(mut self, url: &str) -> Self {
        self.failing_loads.insert(url.to_string());
        self
    }

    /// The first load of `url` succeeds; every later one fails.
    pub fn failing_reload(mut self, url: &str) -> Self {
        self.failing_reloads.insert(url.to_string());
        self
    }

    pub fn navigations(&self) -> Vec<&str> {
        self.log
            .iter()
            .filter_map(|l| l.strip_prefix("navigate "))
            .collect()
    }

    pub fn element(&self, url: &str, index: usize) -> &MockElement {
        &self.pages[url].elements[index]
    }

    fn alive(&self) -> Result<(), DriverError> {
        if self.lost {
            Err(DriverError::SessionLost("browser window closed".into()))
        } else {
            Ok(())
        }
    }

    fn target(&self, handle: &ElementHandle) -> Result<HandleTarget, DriverError> {
        let target = handle
            .id()
            .strip_prefix('h')
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|n| self.handles.get(n))
            .cloned()
            .ok_or_else(|| DriverError::StaleElement(handle.id().to_string()))?;
        if self.current.as_deref() != Some(target.page.as_str()) {
            return Err(DriverError::StaleElement(handle.id().to_string()));
        }
        Ok(target)
    }

    fn element_mut(&mut self, target: &HandleTarget) -> &mut MockElement {
        let page = self.pages.get_mut(&target.page).map(|p| &mut p.elements);
        match page {
            Some(elements) => &mut elements[target.element],
            None => panic!("handle points at unknown page {}", target.page),
        }
    }

    fn register(&mut self, page: &str, element: usize, option: Option<usize>) -> ElementHandle {
        self.handles.push(HandleTarget {
            page: page.to_string(),
            element,
            option,
        });
        ElementHandle::new(format!("h{}", self.handles.len() - 1))
    }

    fn fail(&mut self, failure: &MockFailure) -> DriverError {
        if *failure == MockFailure::SessionLost {
            self.lost = true;
        }
        failure.to_error()
    }

    fn describe(element: &MockElement) -> String {
        match element.get("id").or_else(|| element.get("name")) {
            Some(key) => format!("{}#{}", element.tag, key),
            None => element.tag.clone(),
        }
    }
}

impl Driver for MockDriver {
    fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.alive()?;
        self.log.push(format!("navigate {}", url));
        let reload = !self.loaded.insert(url.to_string());
        if self.failing_loads.contains(url) || (reload && self.failing_reloads.contains(url)) {
            return Err(DriverError::Navigation(format!("net::ERR_CONNECTION_REFUSED at {}", url)));
        }
        let landed = self.redirects.get(url).cloned().unwrap_or_else(|| url.to_string());
        self.pages.entry(landed.clone()).or_default();
        self.current = Some(landed);
        Ok(())
    }

    fn current_url(&mut self) -> Result<String, DriverError> {
        self.alive()?;
        self.current
            .clone()
            .ok_or_else(|| DriverError::Navigation("no page loaded".into()))
    }

    fn query(&mut self, css: &str) -> Result<Vec<ElementHandle>, DriverError> {
        self.alive()?;
        let Some(url) = self.current.clone() else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::new();
        if let Some(page) = self.pages.get_mut(&url) {
            for (i, element) in page.elements.iter_mut().enumerate() {
                if element.present() && element.matches(css) {
                    element.matched += 1;
                    hits.push(i);
                }
            }
        }
        Ok(hits
            .into_iter()
            .map(|i| self.register(&url, i, None))
            .collect())
    }

    fn tag_name(&mut self, handle: &ElementHandle) -> Result<String, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        if target.option.is_some() {
            return Ok("option".into());
        }
        Ok(self.element_mut(&target).tag.clone())
    }

    fn attribute(
        &mut self,
        handle: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        Ok(self.element_mut(&target).get(name).map(str::to_string))
    }

    fn text(&mut self, handle: &ElementHandle) -> Result<String, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let element = self.element_mut(&target);
        Ok(match target.option {
            Some(j) => element.options[j].clone(),
            None => element.text.clone(),
        })
    }

    fn is_displayed(&mut self, handle: &ElementHandle) -> Result<bool, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        Ok(self.element_mut(&target).displayed)
    }

    fn is_enabled(&mut self, handle: &ElementHandle) -> Result<bool, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        Ok(self.element_mut(&target).enabled)
    }

    fn is_selected(&mut self, handle: &ElementHandle) -> Result<bool, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let element = self.element_mut(&target);
        Ok(match target.option {
            Some(j) => element.selected_option == Some(j),
            None => element.selected,
        })
    }

    fn click(&mut self, handle: &ElementHandle) -> Result<(), DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let element = self.element_mut(&target).clone();
        if let Some(failure) = &element.click_failure {
            return Err(self.fail(failure));
        }

        match target.option {
            Some(j) => {
                self.log.push(format!("select {} option {}", Self::describe(&element), j));
                self.element_mut(&target).selected_option = Some(j);
            }
            None => {
                self.log.push(format!("click {}", Self::describe(&element)));
                let el = self.element_mut(&target);
                if el.get("type").is_some_and(|t| t == "checkbox" || t == "radio") {
                    el.selected = !el.selected;
                }
                if let Some(url) = element.navigates_to {
                    self.pages.entry(url.clone()).or_default();
                    self.current = Some(url);
                }
            }
        }
        Ok(())
    }

    fn clear(&mut self, handle: &ElementHandle) -> Result<(), DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let element = self.element_mut(&target).clone();
        self.log.push(format!("clear {}", Self::describe(&element)));
        Ok(())
    }

    fn send_keys(&mut self, handle: &ElementHandle, text: &str) -> Result<(), DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let element = self.element_mut(&target).clone();
        if let Some(failure) = &element.type_failure {
            return Err(self.fail(failure));
        }
        self.log
            .push(format!("type {} {:?}", Self::describe(&element), text));
        Ok(())
    }

    fn scroll_into_view(&mut self, handle: &ElementHandle) -> Result<(), DriverError> {
        self.alive()?;
        self.target(handle)?;
        Ok(())
    }

    fn options(&mut self, handle: &ElementHandle) -> Result<Vec<ElementHandle>, DriverError> {
        self.alive()?;
        let target = self.target(handle)?;
        let count = self.element_mut(&target).options.len();
        Ok((0..count)
            .map(|j| self.register(&target.page, target.element, Some(j)))
            .collect())
    }

    fn quit(&mut self) -> Result<(), DriverError> {
        self.log.push("quit".into());
        self.lost = true;
        Ok(())
    }
}
