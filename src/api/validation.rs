use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use super::ApiError;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+7\d{10}$").expect("phone regex"));
static IIN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{12}$").expect("iin regex"));

pub const MIN_PASSWORD_LEN: usize = 8;

/// Collects per-field messages so a request with several bad fields reports
/// them all at once.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

#[must_use]
pub fn is_valid_iin(iin: &str) -> bool {
    IIN_RE.is_match(iin)
}

/// Minimal shape check; deliverability is the relay's problem.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[must_use]
pub fn is_valid_password(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_format() {
        assert!(is_valid_phone("+77001234567"));
        assert!(is_valid_phone("+70000000000"));
        // 10 digits after +7 required, exactly
        assert!(!is_valid_phone("+7700123456"));
        assert!(!is_valid_phone("+770012345678"));
        // missing plus
        assert!(!is_valid_phone("77001234567"));
        assert!(!is_valid_phone("+87001234567"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_iin_format() {
        assert!(is_valid_iin("123456789012"));
        assert!(!is_valid_iin("12345678901"));
        assert!(!is_valid_iin("1234567890123"));
        assert!(!is_valid_iin("12345678901a"));
    }

    #[test]
    fn test_email_shape() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("userexample.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@nodot"));
    }

    #[test]
    fn test_password_length() {
        assert!(is_valid_password("12345678"));
        assert!(!is_valid_password("1234567"));
    }

    #[test]
    fn test_field_errors_collect() {
        let mut errors = FieldErrors::new();
        errors.add("phone", "Invalid phone format");
        errors.add("email", "Already registered");
        let err = errors.into_result().unwrap_err();
        match err {
            ApiError::Validation(fields) => {
                assert_eq!(fields.len(), 2);
                assert!(fields.contains_key("phone"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
