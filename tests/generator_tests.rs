use ui_sweep::scan::element_model::{Element, ElementType};
use ui_sweep::scenario::generator::{fingerprint, generate, generate_all};
use ui_sweep::scenario::scenario_model::{Action, ScenarioCounter, ScenarioKind};
use ui_sweep::scenario::test_data::{invalid_value, valid_value};

const URL: &str = "https://shop.test/";

fn input(selector: &str, name: &str, input_type: &str) -> Element {
    let mut e = Element::new(ElementType::Input, "input", selector, URL);
    e.name = name.to_string();
    e.input_type = Some(input_type.to_string());
    e.readonly = Some(false);
    e
}

fn with_text(element_type: ElementType, tag: &str, text: &str) -> Element {
    let mut e = Element::new(element_type, tag, tag, URL);
    e.text = text.to_string();
    e
}

// ============================================================================
// Input rules
// ============================================================================

#[test]
fn email_input_yields_valid_empty_and_invalid_fills() {
    let mut counter = ScenarioCounter::new();
    let scenarios = generate(&input("#email", "email", "email"), &mut counter);

    assert_eq!(scenarios.len(), 3);

    assert_eq!(scenarios[0].title, "Valid input test: email");
    assert_eq!(scenarios[0].kind, ScenarioKind::Functional);
    assert_eq!(scenarios[0].action, Action::Fill);
    assert_eq!(scenarios[0].test_data, "test@example.com");

    assert_eq!(scenarios[1].title, "Empty input test: email");
    assert_eq!(scenarios[1].kind, ScenarioKind::Negative);
    assert_eq!(scenarios[1].test_data, "");

    assert_eq!(scenarios[2].title, "Invalid email test: email");
    assert_eq!(scenarios[2].kind, ScenarioKind::Negative);
    assert_eq!(scenarios[2].test_data, "invalid_email");

    assert!(scenarios.iter().all(|s| s.selector == "#email"));
}

#[test]
fn text_input_gets_no_invalid_value_test() {
    let mut counter = ScenarioCounter::new();
    let scenarios = generate(&input("input[name='q']", "q", "text"), &mut counter);

    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0].test_data, "Test Input");
}

#[test]
fn submit_input_is_clicked() {
    let mut counter = ScenarioCounter::new();
    let scenarios = generate(&input("#go", "go", "submit"), &mut counter);

    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].action, Action::Click);
    assert_eq!(scenarios[0].title, "Click input button: go");
}

#[test]
fn checkbox_and_radio_are_toggled() {
    let mut counter = ScenarioCounter::new();
    let checkbox = generate(&input("#terms", "terms", "checkbox"), &mut counter);
    let radio = generate(&input("#plan", "plan", "radio"), &mut counter);

    assert_eq!(checkbox[0].action, Action::Check);
    assert_eq!(checkbox[0].title, "Toggle checkbox: terms");
    assert_eq!(radio[0].title, "Toggle radio: plan");
}

#[test]
fn readonly_input_gets_no_fill_scenarios() {
    let mut counter = ScenarioCounter::new();

    let mut text = input("#locked", "locked", "text");
    text.readonly = Some(true);
    assert!(generate(&text, &mut counter).is_empty());

    let mut check = input("#agree", "agree", "checkbox");
    check.readonly = Some(true);
    let scenarios = generate(&check, &mut counter);
    assert_eq!(scenarios.len(), 1);
    assert_eq!(scenarios[0].action, Action::Check);

    assert_eq!(counter.produced(), 1, "readonly text input consumed no IDs");
}

#[test]
fn unnamed_input_keeps_empty_name_in_title() {
    let mut counter = ScenarioCounter::new();
    let scenarios = generate(&input("input", "", "number"), &mut counter);
    assert_eq!(scenarios[0].title, "Valid input test: ");
    assert_eq!(scenarios[1].title, "Empty input test: ");
    assert_eq!(scenarios[2].title, "Invalid number test: ");
    assert_eq!(scenarios[2].test_data, "abc");
}

// ============================================================================
// Other element classes
// ============================================================================

#[test]
fn textarea_select_button_and_link_rules() {
    let mut counter = ScenarioCounter::new();

    let mut textarea = Element::new(ElementType::Textarea, "textarea", "#notes", URL);
    textarea.name = "notes".into();
    let t = generate(&textarea, &mut counter);
    assert_eq!(t[0].title, "Valid textarea input: notes");
    assert_eq!(t[0].test_data, "Test text area content");

    let mut select = Element::new(ElementType::Select, "select", "#country", URL);
    select.name = "country".into();
    let s = generate(&select, &mut counter);
    assert_eq!(s[0].title, "Select dropdown: country");
    assert_eq!(s[0].action, Action::Select);

    let b = generate(&with_text(ElementType::Button, "button", "Add to cart"), &mut counter);
    assert_eq!(b[0].title, "Click button: Add to cart");

    let l = generate(&with_text(ElementType::Link, "a", ""), &mut counter);
    assert_eq!(l[0].title, "Click link: ");

    let unnamed = Element::new(ElementType::Select, "select", "select", URL);
    assert_eq!(generate(&unnamed, &mut counter)[0].title, "Select dropdown: ");
}

#[test]
fn button_title_truncated_to_thirty_chars() {
    let mut counter = ScenarioCounter::new();
    let long = "Subscribe to our weekly newsletter today";
    let b = generate(&with_text(ElementType::Button, "button", long), &mut counter);
    assert_eq!(b[0].title, format!("Click button: {}", &long[..30]));
}

// ============================================================================
// Scenario IDs
// ============================================================================

#[test]
fn ids_follow_run_wide_counter() {
    let mut counter = ScenarioCounter::new();
    let elements = vec![
        input("#email", "email", "email"),
        with_text(ElementType::Button, "button", "Go"),
        input("#q", "q", "text"),
    ];

    let scenarios = generate_all(&elements, &mut counter);
    let ids: Vec<&str> = scenarios.iter().map(|s| s.scenario_id.as_str()).collect();

    assert_eq!(
        ids,
        vec![
            "TEST_0001_1",
            "TEST_0001_2",
            "TEST_0001_3",
            "TEST_0004_1",
            "TEST_0005_1",
            "TEST_0005_2",
        ]
    );
    assert_eq!(counter.produced(), 6);
}

#[test]
fn ids_are_unique_across_pages() {
    let mut counter = ScenarioCounter::new();
    let first = generate_all(&[input("#a", "a", "text")], &mut counter);
    let second = generate_all(&[input("#a", "a", "text")], &mut counter);

    assert_eq!(first[0].scenario_id, "TEST_0001_1");
    assert_eq!(second[0].scenario_id, "TEST_0003_1");
}

// ============================================================================
// Fingerprint and test data
// ============================================================================

#[test]
fn fingerprint_is_stable_and_order_sensitive() {
    let elements = vec![
        input("#email", "email", "email"),
        with_text(ElementType::Button, "button", "Go"),
    ];

    let a = generate_all(&elements, &mut ScenarioCounter::new());
    let b = generate_all(&elements, &mut ScenarioCounter::new());
    assert_eq!(fingerprint(&a), fingerprint(&b));
    assert_eq!(fingerprint(&a).len(), 40);

    let mut reversed = a.clone();
    reversed.reverse();
    assert_ne!(fingerprint(&a), fingerprint(&reversed));
}

#[test]
fn test_data_tables() {
    assert_eq!(valid_value("password"), "TestPass123!");
    assert_eq!(valid_value("date"), "2024-01-01");
    assert_eq!(valid_value("week"), "Test Data");
    assert_eq!(invalid_value("url"), "invalid_url");
    assert_eq!(invalid_value("tel"), "abc");
}

#[test]
fn scenarios_round_trip_through_yaml() {
    let scenarios = generate_all(&[input("#email", "email", "email")], &mut ScenarioCounter::new());
    let yaml = serde_yaml::to_string(&scenarios).unwrap();
    assert!(yaml.contains("scenario_id: TEST_0001_1"));
    assert!(yaml.contains("kind: negative"));
    let back: Vec<ui_sweep::scenario::scenario_model::Scenario> = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(back, scenarios);
}
