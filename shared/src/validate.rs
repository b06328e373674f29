//! Checks applied to sanitized values before a request is composed.

/// Hostname check over already-lowercased input: dotted labels, 3-253 chars,
/// no empty labels, no hyphen at a label boundary.
pub fn is_valid_domain(domain: &str) -> bool {
    if domain.len() < 3 || domain.len() > 253 {
        return false;
    }
    if !domain.contains('.') || domain.contains("..") {
        return false;
    }
    if domain.starts_with('-') || domain.ends_with('-') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    if !domain
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return false;
    }
    domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

pub fn is_valid_email(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    let Some((name, tld)) = host.rsplit_once('.') else {
        return false;
    };
    let ok = |part: &str| !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '@');
    ok(local) && ok(name) && ok(tld)
}

pub fn is_required(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn min_length(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

pub fn max_length(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_validation() {
        assert!(is_valid_domain("example.com"));
        assert!(is_valid_domain("sub.example-site.co"));
        assert!(!is_valid_domain("ab"));
        assert!(!is_valid_domain("nodots"));
        assert!(!is_valid_domain("double..dot.com"));
        assert!(!is_valid_domain("-leading.com"));
        assert!(!is_valid_domain("trailing.com-"));
        assert!(!is_valid_domain("label-.example.com"));
        assert!(!is_valid_domain("UPPER.com"));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jake@paragonmedia.io"));
        assert!(!is_valid_email("jake@paragonmedia"));
        assert!(!is_valid_email("@paragonmedia.io"));
        assert!(!is_valid_email("jake @paragonmedia.io"));
    }

    #[test]
    fn required_and_lengths() {
        assert!(is_required("x"));
        assert!(!is_required("   "));
        assert!(min_length("abc", 3));
        assert!(!min_length("ab", 3));
        assert!(max_length("abc", 3));
        assert!(!max_length("abcd", 3));
    }
}
