//! Extraction: classify raw input, look it up through the matching source,
//! and hand back a record ready for formatting.
//!
//! [`Extractor`] is stateless; every call is independent. [`CitationSession`]
//! wraps one extractor with the interactive state a front end needs.

mod page;
mod session;

pub use session::{CitationSession, ExtractOutcome, SessionState};

use std::sync::Arc;

use crate::config::Config;
use crate::models::{DetectedInput, InputKind, Metadata};
use crate::sources::{
    default_patterns, PublisherPattern, Source, SourceCapabilities, SourceError,
    SourceRegistry,
};
use crate::utils::{
    classify, format_citation, get_structured_citation, validate_input, with_scheme,
    CitationStyle, StructuredCitation, ValidationError,
};

/// Message shown when nothing can handle the input
pub const UNSUPPORTED_INPUT: &str =
    "Could not determine input type. Enter a valid URL, DOI, ISBN, or YouTube link.";

/// Errors surfaced by an extraction
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    /// Rejected before classification
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Classified as unknown and not URL-like
    #[error("{}", UNSUPPORTED_INPUT)]
    Unsupported(String),

    /// The source for this kind failed; the message is the reason
    #[error("{0}")]
    Lookup(#[from] SourceError),
}

impl ExtractError {
    /// Single human-readable line for the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ExtractError::Validation(_))
    }
}

/// A successful extraction
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Classification the lookup was dispatched on
    pub input: DetectedInput,

    pub metadata: Metadata,
}

impl Extraction {
    /// Render the record in `style`
    pub fn citation(&self, style: CitationStyle) -> String {
        format_citation(&self.metadata, style, self.input.kind)
    }

    pub fn structured(&self, style: CitationStyle) -> StructuredCitation {
        get_structured_citation(&self.metadata, style, self.input.kind)
    }
}

/// Dispatches classified input to sources
#[derive(Debug, Clone)]
pub struct Extractor {
    registry: SourceRegistry,
    patterns: Vec<PublisherPattern>,
}

impl Extractor {
    /// Create an extractor over `registry` with the built-in publisher table
    pub fn new(registry: SourceRegistry) -> Self {
        Self {
            registry,
            patterns: default_patterns(),
        }
    }

    /// Create an extractor with every built-in source
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Ok(Self::new(SourceRegistry::from_config(config)?))
    }

    /// Replace the publisher table; patterns are tried in the given order
    pub fn with_patterns(mut self, patterns: Vec<PublisherPattern>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Validate, classify and look up raw user input
    pub async fn extract(&self, raw: &str) -> Result<Extraction, ExtractError> {
        let trimmed = validate_input(raw)?;
        let detected = classify(trimmed);
        tracing::debug!(kind = %detected.kind, value = %detected.value, "Classified input");

        self.lookup(detected).await
    }

    /// Look up an already classified input
    pub async fn lookup(&self, detected: DetectedInput) -> Result<Extraction, ExtractError> {
        let input = resolve_unknown(detected)?;
        let metadata = self.dispatch(&input).await?;

        tracing::info!(kind = %input.kind, title = %metadata.title, "Extraction complete");

        Ok(Extraction { input, metadata })
    }

    async fn dispatch(&self, input: &DetectedInput) -> Result<Metadata, ExtractError> {
        let value = input.value.as_str();

        let result = match input.kind {
            InputKind::Doi => {
                self.source_for(SourceCapabilities::DOI_LOOKUP)?
                    .get_by_doi(value)
                    .await
            }
            InputKind::Isbn => {
                self.source_for(SourceCapabilities::ISBN_LOOKUP)?
                    .get_by_isbn(value)
                    .await
            }
            InputKind::YouTube => {
                self.source_for(SourceCapabilities::VIDEO_LOOKUP)?
                    .get_video(value)
                    .await
            }
            InputKind::Url => return page::extract_url(&self.registry, &self.patterns, value).await,
            InputKind::Unknown => return Err(ExtractError::Unsupported(value.to_string())),
        };

        result.map_err(|e| {
            tracing::warn!(kind = %input.kind, error = %e, "Lookup failed");
            ExtractError::Lookup(e)
        })
    }

    fn source_for(
        &self,
        capability: SourceCapabilities,
    ) -> Result<&Arc<dyn Source>, SourceError> {
        self.registry.first_with(capability).ok_or_else(|| {
            SourceError::Other(format!("No source registered for {:?}", capability))
        })
    }
}

/// Unknown input containing a dot is retried as a URL; anything else has no source
fn resolve_unknown(detected: DetectedInput) -> Result<DetectedInput, ExtractError> {
    match detected.kind {
        InputKind::Unknown if detected.value.contains('.') => Ok(DetectedInput::new(
            InputKind::Url,
            with_scheme(&detected.value),
        )),
        InputKind::Unknown => Err(ExtractError::Unsupported(detected.value)),
        _ => Ok(detected),
    }
}
