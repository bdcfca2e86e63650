//! Small form-validation helpers shared by services.

/// Lowercase and sanity-check an email address.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    if normalized.is_empty() || !normalized.contains('@') {
        return None;
    }
    let parts = normalized.split('@').collect::<Vec<_>>();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }
    Some(normalized)
}

/// Trimmed value, or `None` when blank.
#[must_use]
pub fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Trim every entry and drop the blank ones, keeping order.
#[must_use]
pub fn clean_list(values: Vec<String>) -> Vec<String> {
    values.iter().filter_map(|v| non_blank(v)).collect()
}

/// Blank optional strings collapse to `None`.
#[must_use]
pub fn clean_optional(value: Option<String>) -> Option<String> {
    value.as_deref().and_then(non_blank)
}

#[cfg(test)]
#[path = "validate_test.rs"]
mod tests;
