//! Field validators shared by the record kinds and the database services.

use crate::errors::ModelError;

pub const MAX_NAME_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;

/// Non-blank, at most [`MAX_NAME_LEN`] characters.
pub fn validate_name(field: &'static str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(field, "must not be empty"));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(ModelError::invalid(field, format!("must be at most {MAX_NAME_LEN} characters")));
    }
    Ok(())
}

/// `local@domain.tld` with a dot-separated domain of alphanumeric/hyphen labels.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let invalid = |reason: &str| Err(ModelError::invalid("email", reason.to_string()));
    if email.len() > MAX_EMAIL_LEN {
        return invalid("is too long");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return invalid("must contain '@'");
    };
    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return invalid("local part must be 1..=64 characters");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return invalid("local part has misplaced dots");
    }
    let local_ok = local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-/=?^_`{|}~.".contains(c));
    if !local_ok {
        return invalid("local part has invalid characters");
    }
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return invalid("domain must contain a dot");
    }
    for label in &labels {
        if label.is_empty() || label.starts_with('-') || label.ends_with('-') {
            return invalid("domain has an empty or malformed label");
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return invalid("domain has invalid characters");
        }
    }
    let tld = labels[labels.len() - 1];
    if tld.len() < 2 || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return invalid("top-level domain must be alphabetic");
    }
    Ok(())
}

/// Non-negative integer that fits a `u32`.
pub fn validate_age(age: i64) -> Result<u32, ModelError> {
    if age < 0 {
        return Err(ModelError::invalid("age", "must be a non-negative integer"));
    }
    u32::try_from(age).map_err(|_| ModelError::invalid("age", "is too large"))
}

/// Finite and non-negative.
pub fn validate_amount(field: &'static str, value: f64) -> Result<(), ModelError> {
    if !value.is_finite() {
        return Err(ModelError::invalid(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(ModelError::invalid(field, "must not be negative"));
    }
    Ok(())
}

pub fn validate_tags(tags: &[String]) -> Result<(), ModelError> {
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(ModelError::invalid("tags", "must not contain empty tags"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_emails() {
        for ok in ["john@example.com", "a.b+c@sub.example.co", "x_y@d-1.org"] {
            assert!(validate_email(ok).is_ok(), "{ok}");
        }
    }

    #[test]
    fn rejects_malformed_emails() {
        for bad in ["", "plain", "@example.com", "a@", "a@b", "a@b.c", "a..b@x.com", "a@-x.com", "a b@x.com", "a@x..com", "a@x.c0m"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn age_must_be_non_negative() {
        assert_eq!(validate_age(30).unwrap(), 30);
        assert_eq!(validate_age(0).unwrap(), 0);
        assert!(validate_age(-1).is_err());
        assert!(validate_age(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn names_must_not_be_blank() {
        assert!(validate_name("name", "  ").is_err());
        assert!(validate_name("name", &"x".repeat(MAX_NAME_LEN + 1)).is_err());
        assert!(validate_name("name", "Laptop").is_ok());
    }

    #[test]
    fn amounts_are_finite_and_non_negative() {
        assert!(validate_amount("price", 999.99).is_ok());
        assert!(validate_amount("price", -0.01).is_err());
        assert!(validate_amount("price", f64::NAN).is_err());
        assert!(validate_amount("price", f64::INFINITY).is_err());
    }
}
