use tracing::debug;

use crate::browser::driver::{Driver, DriverError, ElementHandle};

// ============================================================================
// Selector resolution
// ============================================================================

/// Derive a CSS locator for a live element.
///
/// Priority (first match wins): `#id`, `tag[name='value']`,
/// `tag.class1.class2`, bare `tag`. Class and tag locators may match several
/// elements; the executor acts on the first match.
///
/// Returns `None` when the driver fails while reading attributes (for
/// example the element detached mid-read). Callers skip such elements.
pub fn resolve(driver: &mut dyn Driver, element: &ElementHandle) -> Option<String> {
    match try_resolve(driver, element) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!(handle = element.id(), error = %e, "selector resolution failed");
            None
        }
    }
}

fn try_resolve(driver: &mut dyn Driver, element: &ElementHandle) -> Result<String, DriverError> {
    if let Some(id) = non_empty(driver.attribute(element, "id")?) {
        return Ok(format!("#{}", id));
    }

    let tag = driver.tag_name(element)?;

    if let Some(name) = non_empty(driver.attribute(element, "name")?) {
        return Ok(format!("{}[name='{}']", tag, name));
    }

    if let Some(class) = non_empty(driver.attribute(element, "class")?) {
        return Ok(format!("{}.{}", tag, class.trim().replace(' ', ".")));
    }

    Ok(tag)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
