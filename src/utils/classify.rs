//! Input classification: decide whether raw text is an ISBN, DOI, YouTube
//! link or web URL, and normalize it for the matching source.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{DetectedInput, InputKind};

#[allow(clippy::expect_used)]
static ISBN_10: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("ISBN-10 regex is valid"));

#[allow(clippy::expect_used)]
static ISBN_13: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^97[89][0-9]{10}$").expect("ISBN-13 regex is valid"));

#[allow(clippy::expect_used)]
static DOI_URL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^https?://(dx\.)?doi\.org/").expect("DOI URL prefix regex is valid")
});

#[allow(clippy::expect_used)]
static DOI_LABEL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^doi:\s*").expect("DOI label regex is valid"));

#[allow(clippy::expect_used)]
static DOI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^10\.[0-9]{4,}/\S+$").expect("DOI regex is valid"));

/// Known YouTube URL shapes, each capturing the 11-character video id
#[allow(clippy::expect_used)]
static YOUTUBE: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/embed/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/shorts/([a-zA-Z0-9_-]{11})",
    ]
    .map(|pattern| Regex::new(pattern).expect("YouTube regex is valid"))
});

/// Classify raw user input.
///
/// Checks run in a fixed order and the first match wins: ISBN, DOI,
/// YouTube, URL. Anything else is [`InputKind::Unknown`] with the trimmed
/// input passed through. Never fails.
pub fn classify(raw: &str) -> DetectedInput {
    let trimmed = raw.trim();

    if let Some(isbn) = match_isbn(trimmed) {
        return DetectedInput::new(InputKind::Isbn, isbn);
    }

    if let Some(doi) = match_doi(trimmed) {
        return DetectedInput::new(InputKind::Doi, doi);
    }

    if let Some(video_id) = match_youtube(trimmed) {
        return DetectedInput::new(InputKind::YouTube, video_id);
    }

    if looks_like_url(trimmed) {
        return DetectedInput::new(InputKind::Url, with_scheme(trimmed));
    }

    DetectedInput::new(InputKind::Unknown, trimmed)
}

/// Classification for as-you-type feedback.
///
/// Returns `None` until the trimmed input is longer than three characters.
pub fn detect_live(raw: &str) -> Option<InputKind> {
    if raw.trim().chars().count() > 3 {
        Some(classify(raw).kind)
    } else {
        None
    }
}

/// ISBN with hyphens and whitespace removed, if it is a 10 or 13 digit form
pub fn match_isbn(input: &str) -> Option<String> {
    let cleaned: String = input
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .collect();

    if ISBN_10.is_match(&cleaned) || ISBN_13.is_match(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

/// DOI with any `doi.org` URL or `doi:` label stripped
pub fn match_doi(input: &str) -> Option<String> {
    let without_url = DOI_URL_PREFIX.replace(input, "");
    let cleaned = DOI_LABEL_PREFIX.replace(&without_url, "");
    let cleaned = cleaned.trim();

    if DOI.is_match(cleaned) {
        Some(cleaned.to_string())
    } else {
        None
    }
}

/// YouTube video id from any of the known link shapes
pub fn match_youtube(input: &str) -> Option<String> {
    YOUTUBE.iter().find_map(|pattern| {
        pattern
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Explicit http(s) scheme, or a bare domain containing a dot
pub fn looks_like_url(input: &str) -> bool {
    has_scheme(input) || input.contains('.')
}

/// Prepend `https://` when no http(s) scheme is present
pub fn with_scheme(input: &str) -> String {
    if has_scheme(input) {
        input.to_string()
    } else {
        format!("https://{}", input)
    }
}

fn has_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_doi() {
        let detected = classify("10.1038/nature12373");
        assert_eq!(detected.kind, InputKind::Doi);
        assert_eq!(detected.value, "10.1038/nature12373");
    }

    #[test]
    fn test_doi_prefixes_stripped() {
        for input in [
            "https://doi.org/10.1038/nature12373",
            "http://dx.doi.org/10.1038/nature12373",
            "HTTPS://DOI.ORG/10.1038/nature12373",
            "doi:10.1038/nature12373",
            "DOI: 10.1038/nature12373",
            "  10.1038/nature12373  ",
        ] {
            let detected = classify(input);
            assert_eq!(detected.kind, InputKind::Doi, "input: {}", input);
            assert_eq!(detected.value, "10.1038/nature12373", "input: {}", input);
        }
    }

    #[test]
    fn test_short_doi_prefix_is_not_doi() {
        // registrant must have at least four digits
        let detected = classify("10.123/abc");
        assert_eq!(detected.kind, InputKind::Url);
    }

    #[test]
    fn test_isbn_13_with_hyphens() {
        let detected = classify("978-0-321-12521-7");
        assert_eq!(detected.kind, InputKind::Isbn);
        assert_eq!(detected.value, "9780321125217");
    }

    #[test]
    fn test_isbn_10_with_spaces() {
        let detected = classify("0 321 12521 5");
        assert_eq!(detected.kind, InputKind::Isbn);
        assert_eq!(detected.value, "0321125215");
    }

    #[test]
    fn test_isbn_rejects_other_lengths() {
        assert_eq!(classify("123456789").kind, InputKind::Unknown);
        assert_eq!(classify("12345678901").kind, InputKind::Unknown);
        // 13 digits must start with 978 or 979
        assert_eq!(classify("1234567890123").kind, InputKind::Unknown);
        assert_eq!(classify("9791234567890").kind, InputKind::Isbn);
    }

    #[test]
    fn test_youtube_shapes() {
        for input in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ&t=42",
        ] {
            let detected = classify(input);
            assert_eq!(detected.kind, InputKind::YouTube, "input: {}", input);
            assert_eq!(detected.value, "dQw4w9WgXcQ", "input: {}", input);
        }
    }

    #[test]
    fn test_youtube_channel_is_plain_url() {
        let detected = classify("https://www.youtube.com/@somechannel");
        assert_eq!(detected.kind, InputKind::Url);
    }

    #[test]
    fn test_bare_domain_gets_scheme() {
        let detected = classify("example.com/some-page-title");
        assert_eq!(detected.kind, InputKind::Url);
        assert_eq!(detected.value, "https://example.com/some-page-title");
    }

    #[test]
    fn test_url_with_scheme_kept() {
        let detected = classify("http://example.org/a");
        assert_eq!(detected.kind, InputKind::Url);
        assert_eq!(detected.value, "http://example.org/a");
    }

    #[test]
    fn test_unknown_passthrough() {
        let detected = classify("  just some words  ");
        assert_eq!(detected.kind, InputKind::Unknown);
        assert_eq!(detected.value, "just some words");
    }

    #[test]
    fn test_non_ascii_digits_are_not_identifiers() {
        let detected = classify("١٢٣٤٥٦٧٨٩٠");
        assert_eq!(detected.kind, InputKind::Unknown);
        assert_eq!(match_isbn("٩٧٨٠٢٦٢٠٣٣٨٤٨"), None);

        assert_eq!(match_doi("10.١٢٣٤/x"), None);
        assert_eq!(classify("10.١٢٣٤/x").kind, InputKind::Url);
    }

    #[test]
    fn test_detect_live() {
        assert_eq!(detect_live("10."), None);
        assert_eq!(detect_live("   abc  "), None);
        assert_eq!(detect_live("abcd"), Some(InputKind::Unknown));
        assert_eq!(detect_live("10.1038/nature12373"), Some(InputKind::Doi));
    }

    #[test]
    fn test_classify_is_deterministic() {
        let input = "https://doi.org/10.1000/xyz123";
        assert_eq!(classify(input), classify(input));
    }
}
