//! Short code generation and validation utilities.
//!
//! Codes are drawn uniformly from the 62-character alphanumeric alphabet.
//! Caller-supplied codes must be 6-8 characters from the same alphabet.

use crate::error::AppError;
use rand::Rng;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Alphabet random codes are drawn from.
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Length of randomly generated codes.
pub const GENERATED_CODE_LENGTH: usize = 6;

static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]{6,8}$").expect("code pattern compiles"));

/// Path segments claimed by other routes; never resolved as short codes.
const RESERVED_ROUTES: &[&str] = &["api", "healthz", "code", "_next", "favicon.ico"];

/// Generates a random 6-character alphanumeric code.
///
/// Uniqueness is not checked here; see
/// [`LinkService::allocate_code`](crate::application::services::LinkService::allocate_code).
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..GENERATED_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Returns `true` if `code` matches `^[A-Za-z0-9]{6,8}$`.
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Validates the format of a short code.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the code is blank or does not match
/// the 6-8 alphanumeric format.
pub fn validate_code(code: &str) -> Result<(), AppError> {
    if code.is_empty() {
        return Err(AppError::bad_request("Code cannot be empty", json!({})));
    }

    if !is_valid_code(code) {
        return Err(AppError::bad_request(
            "Invalid code format. Must be 6-8 alphanumeric characters [A-Za-z0-9]",
            json!({ "code": code }),
        ));
    }

    Ok(())
}

/// Returns `true` if the path segment belongs to another route.
///
/// Comparison is case-insensitive.
pub fn is_reserved_route(segment: &str) -> bool {
    RESERVED_ROUTES
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_code_has_correct_length() {
        assert_eq!(generate_code().len(), GENERATED_CODE_LENGTH);
    }

    #[test]
    fn test_generate_code_alphanumeric() {
        for _ in 0..100 {
            let code = generate_code();
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()), "{code}");
            assert!(is_valid_code(&code));
        }
    }

    #[test]
    fn test_generate_code_produces_distinct_codes() {
        let codes: HashSet<String> = (0..1000).map(|_| generate_code()).collect();
        // 62^6 possibilities; a handful of collisions would indicate a broken draw.
        assert!(codes.len() > 990);
    }

    #[test]
    fn test_valid_lengths() {
        assert!(is_valid_code("abc123"));
        assert!(is_valid_code("abcD1234"));
        assert!(is_valid_code("ABCDEFG"));
    }

    #[test]
    fn test_invalid_lengths() {
        assert!(!is_valid_code("ab"));
        assert!(!is_valid_code("abc12"));
        assert!(!is_valid_code("abc123456"));
    }

    #[test]
    fn test_invalid_characters() {
        assert!(!is_valid_code("abc-123"));
        assert!(!is_valid_code("abc_123"));
        assert!(!is_valid_code("abc 123"));
        assert!(!is_valid_code("abcé123"));
    }

    #[test]
    fn test_validate_code_messages() {
        let err = validate_code("").unwrap_err();
        assert!(err.to_string().contains("cannot be empty"));

        let err = validate_code("ab").unwrap_err();
        assert!(err.to_string().contains("6-8 alphanumeric"));
        assert!(matches!(err, AppError::Validation { .. }));

        assert!(validate_code("Promo2025").is_err());
        assert!(validate_code("Promo202").is_ok());
    }

    #[test]
    fn test_reserved_routes() {
        assert!(is_reserved_route("api"));
        assert!(is_reserved_route("HEALTHZ"));
        assert!(is_reserved_route("favicon.ico"));
        assert!(!is_reserved_route("abc123"));
    }
}
