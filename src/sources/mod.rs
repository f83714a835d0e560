//! Metadata sources with an extensible trait-based architecture.
//!
//! This module defines the [`Source`] trait that every external metadata
//! provider implements. A source advertises what it can do through
//! [`SourceCapabilities`] and is registered with the [`SourceRegistry`],
//! which the extractor queries by capability.
//!
//! # Built-in Sources
//!
//! - `crossref` - DOI registry lookups (CrossRef REST API)
//! - `openlibrary` - ISBN lookups (Open Library books API)
//! - `noembed` - YouTube video title/channel via oEmbed
//! - `semantic` - Semantic Scholar paper search (IEEE document fallback, tier 1)
//! - `openalex` - OpenAlex works search (IEEE document fallback, tier 2)
//!
//! Document search sources are tried in registration order, so
//! registering Semantic Scholar before OpenAlex makes it the first tier.
//!
//! Arbitrary web pages never reach a source: [`webpage::extract_page`]
//! derives a record from the URL alone and cannot fail.
//!
//! # Endpoints
//!
//! Base URLs come from the `[endpoints]` section of the configuration, so
//! every source can be pointed at a mirror or a local mock server.

mod crossref;
mod noembed;
mod openalex;
mod openlibrary;
pub mod patterns;
mod registry;
mod semantic;
pub mod webpage;

pub mod mock;

pub use crossref::CrossRefSource;
pub use mock::MockSource;
pub use noembed::NoEmbedSource;
pub use openalex::OpenAlexSource;
pub use openlibrary::OpenLibrarySource;
pub use patterns::{default_patterns, LookupTarget, PublisherPattern};
pub use registry::{SourceCapabilities, SourceRegistry};
pub use semantic::SemanticScholarSource;

use crate::models::Metadata;
use async_trait::async_trait;

/// A request to find a publisher document by its site-specific id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentQuery {
    /// Publisher keyword, e.g. "ieee"
    pub publisher: String,

    /// Document id taken from the page path
    pub document_id: String,

    /// The page the user entered; used as the record URL
    pub page_url: String,
}

impl DocumentQuery {
    pub fn new(
        publisher: impl Into<String>,
        document_id: impl Into<String>,
        page_url: impl Into<String>,
    ) -> Self {
        Self {
            publisher: publisher.into(),
            document_id: document_id.into(),
            page_url: page_url.into(),
        }
    }
}

/// The Source trait defines the interface for all metadata providers.
///
/// # Implementing a New Source
///
/// 1. Create a struct that implements `Source`
/// 2. Implement `id`, `name` and `capabilities`
/// 3. Implement the lookup methods matching the advertised capabilities
/// 4. Register it with [`SourceRegistry::register`]
///
/// Lookups return a fully built [`Metadata`] record or a [`SourceError`].
/// A source that has no record for the identifier returns
/// [`SourceError::NotFound`] with a user-facing reason.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g. "crossref")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Describe the capabilities of this source
    fn capabilities(&self) -> SourceCapabilities;

    /// Look up a work by DOI
    async fn get_by_doi(&self, _doi: &str) -> Result<Metadata, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Look up a book by ISBN (digits only)
    async fn get_by_isbn(&self, _isbn: &str) -> Result<Metadata, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Look up a YouTube video by its 11-character id
    async fn get_video(&self, _video_id: &str) -> Result<Metadata, SourceError> {
        Err(SourceError::NotImplemented)
    }

    /// Find a publisher document by its site-specific id
    async fn find_document(&self, _query: &DocumentQuery) -> Result<Metadata, SourceError> {
        Err(SourceError::NotImplemented)
    }
}

/// Errors that can occur when interacting with a source
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SourceError {
    /// The requested operation is not implemented for this source
    #[error("Operation not implemented for this source")]
    NotImplemented,

    /// Transport failure: timeout, DNS, connection reset
    #[error("Network error: {0}")]
    Network(String),

    /// Body was not JSON, or not the JSON we expected
    #[error("{0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// The source has no record for the identifier
    #[error("{0}")]
    NotFound(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl SourceError {
    /// Whether this error means "no record here" rather than a broken exchange
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound(_))
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("Unexpected response structure: {}", err))
    }
}
