// ============================================================================
// Test data tables
// ============================================================================

/// Sample text typed into textareas.
pub const TEXTAREA_SAMPLE: &str = "Test text area content";

/// Input types that should be clicked like buttons.
pub const CLICKABLE_INPUT_TYPES: &[&str] = &["submit", "button", "reset"];

/// Input types toggled with a check action.
pub const CHECKABLE_INPUT_TYPES: &[&str] = &["checkbox", "radio"];

/// Input types that also get a type-invalid negative scenario.
pub const INVALID_VALUE_TYPES: &[&str] = &["email", "number", "url"];

/// Well-formed value for an input type.
pub fn valid_value(input_type: &str) -> &'static str {
    match input_type {
        "text" => "Test Input",
        "email" => "test@example.com",
        "password" => "TestPass123!",
        "number" => "123",
        "tel" => "1234567890",
        "url" => "https://example.com",
        "search" => "test query",
        "date" => "2024-01-01",
        "color" => "#ff0000",
        _ => "Test Data",
    }
}

/// Value the browser should reject for an input type.
///
/// `tel` shares the `number` invalid value; it is not checked against any phone
/// format.
pub fn invalid_value(input_type: &str) -> &'static str {
    match input_type {
        "email" => "invalid_email",
        "number" => "abc",
        "url" => "invalid_url",
        "tel" => "abc",
        _ => "invalid_data",
    }
}
