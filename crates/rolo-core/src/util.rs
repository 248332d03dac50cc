//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Treat `None`, empty strings and empty lists alike.
pub(crate) trait Populated {
    fn is_populated(&self) -> bool;
}

impl Populated for Option<String> {
    fn is_populated(&self) -> bool {
        self.as_deref().is_some_and(|value| !value.is_empty())
    }
}

impl<T> Populated for Option<Vec<T>> {
    fn is_populated(&self) -> bool {
        self.as_ref().is_some_and(|values| !values.is_empty())
    }
}

/// Keep a list only when it has entries.
pub(crate) fn non_empty<T>(values: Vec<T>) -> Option<Vec<T>> {
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Split a `", "`-joined string back into its parts.
pub(crate) fn split_joined(value: &str) -> Vec<String> {
    value.split(", ").map(str::to_string).collect()
}
