//! Utility modules supporting citation extraction.
//!
//! - [`classify`]: Decide whether raw input is an ISBN, DOI, YouTube link or URL
//! - [`detect_live`]: Type hint while the user is still typing
//! - [`validate_input`] / [`parse_page_url`]: Reject empty input and malformed page URLs
//! - [`format_citation`]: Render a [`Metadata`](crate::models::Metadata) record in one of five styles
//! - [`HttpClient`]: Shared reqwest client with JSON decoding and status mapping
//! - [`with_retry`]: Retry transient provider failures with exponential backoff
//!
//! # Classification
//!
//! ```rust
//! use research_cite::models::InputKind;
//! use research_cite::utils::classify;
//!
//! let detected = classify("https://doi.org/10.1038/nature12373");
//! assert_eq!(detected.kind, InputKind::Doi);
//! assert_eq!(detected.value, "10.1038/nature12373");
//! ```

mod classify;
mod cite;
mod http;
mod retry;
mod validate;

pub use classify::{
    classify, detect_live, looks_like_url, match_doi, match_isbn, match_youtube, with_scheme,
};
pub use cite::{
    format_access_date, format_all, format_citation, get_structured_citation, CitationStyle,
    StructuredCitation,
};
pub use http::HttpClient;
pub use retry::{with_retry, RetryConfig, TransientError};
pub use validate::{parse_page_url, validate_input, ValidationError};
