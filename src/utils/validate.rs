//! Input validation run before classification and before URL lookups.

use thiserror::Error;

/// Validation error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Please enter a URL, DOI, ISBN, or YouTube link")]
    EmptyInput,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Reject empty or whitespace-only input, returning the trimmed text.
pub fn validate_input(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyInput);
    }
    Ok(trimmed)
}

/// Parse a page URL for host/path inspection.
///
/// Only `http` and `https` URLs with a host are accepted.
pub fn parse_page_url(input: &str) -> Result<url::Url, ValidationError> {
    let input = input.trim();

    if input.contains('\0') {
        return Err(ValidationError::InvalidUrl("contains null byte".to_string()));
    }

    let parsed = url::Url::parse(input).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(ValidationError::InvalidUrl(format!(
                "invalid scheme: {}",
                other
            )))
        }
    }

    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl("missing host".to_string()));
    }

    Ok(parsed)
}
