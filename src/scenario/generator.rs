use sha1::{Digest, Sha1};

use crate::scan::element_model::{Element, ElementType};
use crate::scan::scanner::truncate_chars;

use super::scenario_model::{Action, Scenario, ScenarioCounter, ScenarioKind};
use super::test_data::{
    CHECKABLE_INPUT_TYPES, CLICKABLE_INPUT_TYPES, INVALID_VALUE_TYPES, TEXTAREA_SAMPLE,
    invalid_value, valid_value,
};

/// Scenario before its ID is assigned.
struct Draft {
    title: String,
    kind: ScenarioKind,
    action: Action,
    test_data: String,
}

impl Draft {
    fn new(title: String, kind: ScenarioKind, action: Action, test_data: &str) -> Self {
        Self {
            title,
            kind,
            action,
            test_data: test_data.to_string(),
        }
    }
}

// ============================================================================
// Scenario generation
// ============================================================================

/// Expand one element into its deterministic test scenarios.
///
/// The rules are table-driven: identical elements always produce identical
/// scenarios, and IDs depend only on how many scenarios the run produced
/// before this call. The counter is advanced by the number returned.
pub fn generate(element: &Element, counter: &mut ScenarioCounter) -> Vec<Scenario> {
    let drafts = draft_scenarios(element);
    if drafts.is_empty() {
        return Vec::new();
    }

    let prefix = counter.claim(drafts.len());

    drafts
        .into_iter()
        .enumerate()
        .map(|(i, d)| Scenario {
            scenario_id: format!("{}_{}", prefix, i + 1),
            title: d.title,
            kind: d.kind,
            action: d.action,
            selector: element.selector.clone(),
            test_data: d.test_data,
        })
        .collect()
}

/// Generate scenarios for every element in order, sharing one counter.
pub fn generate_all(elements: &[Element], counter: &mut ScenarioCounter) -> Vec<Scenario> {
    elements
        .iter()
        .flat_map(|e| generate(e, counter))
        .collect()
}

fn draft_scenarios(element: &Element) -> Vec<Draft> {
    match element.element_type {
        ElementType::Input => draft_input(element),
        ElementType::Textarea => vec![Draft::new(
            format!("Valid textarea input: {}", element.name),
            ScenarioKind::Functional,
            Action::Fill,
            TEXTAREA_SAMPLE,
        )],
        ElementType::Select => vec![Draft::new(
            format!("Select dropdown: {}", element.name),
            ScenarioKind::Functional,
            Action::Select,
            "",
        )],
        ElementType::Button => vec![Draft::new(
            format!("Click button: {}", truncate_chars(&element.text, 30)),
            ScenarioKind::Functional,
            Action::Click,
            "",
        )],
        ElementType::Link => vec![Draft::new(
            format!("Click link: {}", truncate_chars(&element.text, 30)),
            ScenarioKind::Functional,
            Action::Click,
            "",
        )],
    }
}

fn draft_input(element: &Element) -> Vec<Draft> {
    let input_type = element.input_type_or_text();

    if CLICKABLE_INPUT_TYPES.contains(&input_type) {
        return vec![Draft::new(
            format!("Click input button: {}", element.name),
            ScenarioKind::Functional,
            Action::Click,
            "",
        )];
    }

    if CHECKABLE_INPUT_TYPES.contains(&input_type) {
        return vec![Draft::new(
            format!("Toggle {}: {}", input_type, element.name),
            ScenarioKind::Functional,
            Action::Check,
            "",
        )];
    }

    if element.is_readonly() {
        return Vec::new();
    }

    let name = &element.name;
    let mut drafts = vec![
        Draft::new(
            format!("Valid input test: {}", name),
            ScenarioKind::Functional,
            Action::Fill,
            valid_value(input_type),
        ),
        Draft::new(
            format!("Empty input test: {}", name),
            ScenarioKind::Negative,
            Action::Fill,
            "",
        ),
    ];

    if INVALID_VALUE_TYPES.contains(&input_type) {
        drafts.push(Draft::new(
            format!("Invalid {} test: {}", input_type, name),
            ScenarioKind::Negative,
            Action::Fill,
            invalid_value(input_type),
        ));
    }

    drafts
}

// ============================================================================
// Fingerprinting
// ============================================================================

/// SHA-1 over the canonical JSON of an ordered scenario list.
///
/// Two runs over identical element sets produce the same fingerprint.
pub fn fingerprint(scenarios: &[Scenario]) -> String {
    let mut hasher = Sha1::new();
    for scenario in scenarios {
        let line = serde_json::to_string(scenario).unwrap_or_default();
        hasher.update(line.as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
