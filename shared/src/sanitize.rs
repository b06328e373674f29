//! Normalization of raw form input. Every value that ends up in a request
//! body goes through one of these first.

/// Trim and strip angle brackets from free text.
pub fn text(input: &str) -> String {
    input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Lowercase a hostname and reduce it to letters, digits, dots and single
/// hyphens with no hyphen at either end.
pub fn domain(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-') {
            continue;
        }
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('-').to_string()
}

/// Lowercase and shape-check an email address; anything that does not look
/// like one collapses to the empty string.
pub fn email(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    if crate::validate::is_valid_email(&lowered) {
        lowered
    } else {
        String::new()
    }
}

/// Identifiers (domain ids, RT/ringba campaign ids): alphanumerics,
/// underscore and hyphen only.
pub fn id(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect()
}

/// Phone numbers keep digits, `+`, `-`, parentheses and spaces.
pub fn phone(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '(' | ')' | ' '))
        .collect()
}

/// Lowercase a route path, reduce to path-safe characters, collapse repeated
/// slashes and trim slashes at both ends.
pub fn route(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '/')) {
            continue;
        }
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out.trim_matches('/').to_string()
}
