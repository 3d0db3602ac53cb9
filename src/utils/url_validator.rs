//! Validation of destination URLs submitted for shortening.

use url::Url;

/// Maximum accepted length of a destination URL, in characters after trimming.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a destination URL is rejected.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("URL cannot be empty")]
    Empty,

    #[error("URL is too long (maximum {MAX_URL_LENGTH} characters)")]
    TooLong { length: usize },

    #[error("Invalid URL format. Must be http:// or https://")]
    InvalidFormat(String),

    #[error("Invalid URL format. Must be http:// or https://")]
    UnsupportedProtocol,
}

/// Validates a destination URL and returns it trimmed.
///
/// The URL is stored exactly as submitted (minus surrounding whitespace), so
/// no normalization is applied beyond the trim.
///
/// # Rules
///
/// 1. Must not be blank
/// 2. At most [`MAX_URL_LENGTH`] characters
/// 3. Must parse as an absolute URL
/// 4. Scheme must be `http` or `https`
pub fn validate_url(input: &str) -> Result<&str, UrlValidationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    let length = trimmed.chars().count();
    if length > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong { length });
    }

    let url = Url::parse(trimmed).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(trimmed),
        _ => Err(UrlValidationError::UnsupportedProtocol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_https() {
        assert_eq!(validate_url("https://example.com"), Ok("https://example.com"));
    }

    #[test]
    fn test_accepts_http_with_path_and_query() {
        let url = "http://example.com/a/b?c=d#frag";
        assert_eq!(validate_url(url), Ok(url));
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(
            validate_url("  https://example.com/path \n"),
            Ok("https://example.com/path")
        );
    }

    #[test]
    fn test_rejects_blank() {
        assert_eq!(validate_url("   "), Err(UrlValidationError::Empty));
    }

    #[test]
    fn test_rejects_relative() {
        assert!(matches!(
            validate_url("not-a-url"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_rejects_other_schemes() {
        for url in ["ftp://example.com", "javascript:alert(1)", "file:///etc/passwd"] {
            assert_eq!(
                validate_url(url),
                Err(UrlValidationError::UnsupportedProtocol),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_length_limit() {
        let base = "https://example.com/";
        let at_limit = format!("{base}{}", "a".repeat(MAX_URL_LENGTH - base.len()));
        assert!(validate_url(&at_limit).is_ok());

        let over_limit = format!("{at_limit}a");
        assert_eq!(
            validate_url(&over_limit),
            Err(UrlValidationError::TooLong {
                length: MAX_URL_LENGTH + 1
            })
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            UrlValidationError::TooLong { length: 3000 }.to_string(),
            "URL is too long (maximum 2048 characters)"
        );
        assert_eq!(
            UrlValidationError::UnsupportedProtocol.to_string(),
            "Invalid URL format. Must be http:// or https://"
        );
    }

    #[test]
    fn test_length_limit_counts_characters() {
        // 1120 characters, 2220 bytes
        let url = format!("https://example.com/{}", "é".repeat(1100));
        assert!(url.len() > MAX_URL_LENGTH);
        assert_eq!(validate_url(&url), Ok(url.as_str()));

        let url = format!("https://example.com/{}", "é".repeat(2029));
        assert_eq!(
            validate_url(&url),
            Err(UrlValidationError::TooLong { length: 2049 })
        );
    }
}
