use tracing::{debug, warn};

use crate::browser::driver::{Driver, DriverError, ElementHandle};

use super::element_model::{Element, ElementType};
use super::selector::resolve;

/// Maximum characters of visible text kept per element.
pub const MAX_TEXT_CHARS: usize = 50;

// ============================================================================
// Page scanning
// ============================================================================

/// Enumerate the interactive elements of the page currently loaded.
///
/// Queries each capability class in `ElementType::SCAN_ORDER`, keeping DOM
/// order within a class. Hidden or disabled elements are dropped. A failure
/// while reading one element skips that element only; a failing class query
/// skips that class. The returned order drives scenario ID sequencing.
///
/// Only fatal driver errors (session lost) are returned as `Err`.
pub fn scan(driver: &mut dyn Driver, current_url: &str) -> Result<Vec<Element>, DriverError> {
    let mut elements = Vec::new();

    for (css, element_type) in ElementType::SCAN_ORDER {
        let handles = match driver.query(css) {
            Ok(handles) => handles,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!(selector = css, error = %e, "element query failed, skipping class");
                continue;
            }
        };

        for handle in &handles {
            match extract_element(driver, handle, element_type, current_url) {
                Ok(Some(element)) => elements.push(element),
                Ok(None) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    debug!(selector = css, error = %e, "skipping unreadable element");
                }
            }
        }
    }

    Ok(elements)
}

/// Read one element's scan-time attributes.
///
/// `Ok(None)` means the element was filtered out (hidden, disabled, or no
/// selector could be resolved).
fn extract_element(
    driver: &mut dyn Driver,
    handle: &ElementHandle,
    element_type: ElementType,
    current_url: &str,
) -> Result<Option<Element>, DriverError> {
    if !driver.is_displayed(handle)? || !driver.is_enabled(handle)? {
        return Ok(None);
    }

    let tag = driver.tag_name(handle)?;
    let name = driver.attribute(handle, "name")?.unwrap_or_default();
    let id = driver.attribute(handle, "id")?.unwrap_or_default();
    let text = truncate_chars(driver.text(handle)?.trim(), MAX_TEXT_CHARS);

    let Some(selector) = resolve(driver, handle) else {
        return Ok(None);
    };

    let mut element = Element::new(element_type, tag, selector, current_url);
    element.name = name;
    element.id = id;
    element.text = text;

    match element_type {
        ElementType::Input => {
            let input_type = driver
                .attribute(handle, "type")?
                .filter(|t| !t.is_empty())
                .map(|t| t.to_lowercase())
                .unwrap_or_else(|| "text".to_string());
            element.input_type = Some(input_type);
            element.placeholder = Some(driver.attribute(handle, "placeholder")?.unwrap_or_default());
            element.readonly = Some(is_truthy(driver.attribute(handle, "readonly")?));
        }
        ElementType::Link => {
            element.href = Some(driver.attribute(handle, "href")?.unwrap_or_default());
        }
        _ => {}
    }

    Ok(Some(element))
}

/// Boolean attribute semantics: present and not explicitly "false".
fn is_truthy(value: Option<String>) -> bool {
    match value {
        Some(v) => !v.eq_ignore_ascii_case("false"),
        None => false,
    }
}

/// Truncate to at most `max` characters (not bytes).
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
