//! Input normalisation and validation for credentials

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Emails are unique case-insensitively; store them trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn normalize_username(username: &str) -> String {
    username.trim().to_string()
}

/// Usernames: 3-32 ASCII letters, digits, `_`, `.` or `-`
pub fn is_valid_username(username: &str) -> bool {
    (MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_.-".contains(c))
}

/// Validate email format (expects a normalised address)
pub fn is_valid_email(email: &str) -> bool {
    // Length checks per RFC 5321
    if email.len() > 254 || email.is_empty() {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false;
    }

    // Local part validation
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_alphanumeric() || ".+-_".contains(c))
    {
        return false;
    }

    // Domain validation
    if domain.starts_with('-') || domain.ends_with('-') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
        return false;
    }

    // Must have a TLD of at least 2 letters
    match domain.rsplit_once('.') {
        Some((_, tld)) if tld.len() >= 2 && tld.chars().all(|c| c.is_alphabetic()) => {}
        _ => return false,
    }

    domain
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
    }

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("a.b-c_d"));
        assert!(is_valid_username("abc"));
        assert!(is_valid_username(&"x".repeat(32)));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username(&"x".repeat(33)));
        assert!(!is_valid_username("has space"));
        assert!(!is_valid_username("emoji😀"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("@x.com"));
        assert!(!is_valid_email("a@x"));
        assert!(!is_valid_email("a@x.c"));
        assert!(!is_valid_email("a@.x.com"));
        assert!(!is_valid_email("a..b@x.com"));
        assert!(!is_valid_email("a@x..com"));
        assert!(!is_valid_email("a b@x.com"));
    }
}
