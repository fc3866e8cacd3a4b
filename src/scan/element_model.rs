use serde::{Deserialize, Serialize};

/// Capability class of a discovered element.
///
/// Declaration order is the scan order: inputs first, links last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Input,
    Textarea,
    Select,
    Button,
    Link,
}

impl ElementType {
    /// Scan order paired with the CSS query used to find each class.
    pub const SCAN_ORDER: [(&'static str, ElementType); 5] = [
        ("input", ElementType::Input),
        ("textarea", ElementType::Textarea),
        ("select", ElementType::Select),
        ("button", ElementType::Button),
        ("a[href]", ElementType::Link),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Input => "input",
            ElementType::Textarea => "textarea",
            ElementType::Select => "select",
            ElementType::Button => "button",
            ElementType::Link => "link",
        }
    }
}

/// An interactive DOM node as seen at scan time.
///
/// Identity is `(selector, page_url)`. Never mutated after the scanner
/// creates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub element_type: ElementType,

    /// Lower-case tag name
    pub tag: String,

    /// Locator produced by the selector resolver
    pub selector: String,

    /// `name` attribute, empty when absent
    pub name: String,

    /// `id` attribute, empty when absent
    pub id: String,

    /// Trimmed visible text, at most 50 characters
    pub text: String,

    /// Page the element was scanned on
    pub page_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub readonly: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Element {
    /// Build an element with only the common fields set.
    pub fn new(
        element_type: ElementType,
        tag: impl Into<String>,
        selector: impl Into<String>,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            element_type,
            tag: tag.into(),
            selector: selector.into(),
            name: String::new(),
            id: String::new(),
            text: String::new(),
            page_url: page_url.into(),
            input_type: None,
            placeholder: None,
            readonly: None,
            href: None,
        }
    }

    pub fn is_readonly(&self) -> bool {
        self.readonly.unwrap_or(false)
    }

    /// `input_type`, defaulting to `text`.
    pub fn input_type_or_text(&self) -> &str {
        self.input_type.as_deref().unwrap_or("text")
    }
}
