//! Registration input validation.

/// Minimum password length accepted at registration.
pub(crate) const MIN_PASSWORD_LEN: usize = 8;

/// Checks the simple `local@domain.tld` shape: exactly one `@`, non-empty
/// local and domain parts, no whitespace, and a dot inside the domain.
pub(crate) fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    // The domain needs an interior dot: "a.b", not ".b" or "a."
    match domain.split_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'),
        None => false,
    }
}

pub(crate) fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}
