//! Application services for the administrative surface.

pub mod navigation;
pub mod pages;
pub mod posts;
pub mod profile;
pub mod social;
pub mod tags;
pub mod travels;

/// Trim the value and treat blank input as absent.
pub(crate) fn trimmed(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

pub(crate) fn require_non_blank(value: &str, field: &'static str) -> Result<String, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(field);
    }
    Ok(trimmed.to_string())
}
