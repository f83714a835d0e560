//! Registry for managing metadata sources.

use std::sync::Arc;

use super::{
    CrossRefSource, NoEmbedSource, OpenAlexSource, OpenLibrarySource, SemanticScholarSource,
    Source, SourceError,
};
use crate::config::Config;
use crate::utils::HttpClient;

bitflags::bitflags! {
    /// Capabilities that a source can support
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SourceCapabilities: u32 {
        const DOI_LOOKUP = 1 << 0;
        const ISBN_LOOKUP = 1 << 1;
        const VIDEO_LOOKUP = 1 << 2;
        const DOCUMENT_SEARCH = 1 << 3;
    }
}

/// Registry for all available metadata sources
///
/// Sources keep their registration order; capability queries return them
/// in that order, which is the order fallbacks are tried in.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with every built-in source, configured from `config`
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let client = Arc::new(HttpClient::new(&config.http)?);
        let endpoints = &config.endpoints;

        let mut registry = Self::new();

        let mut crossref = CrossRefSource::new(Arc::clone(&client), &endpoints.crossref);
        if let Some(mailto) = &config.http.mailto {
            crossref = crossref.with_mailto(mailto);
        }
        registry.register(Arc::new(crossref));

        registry.register(Arc::new(OpenLibrarySource::new(
            Arc::clone(&client),
            &endpoints.openlibrary,
        )));
        registry.register(Arc::new(NoEmbedSource::new(
            Arc::clone(&client),
            &endpoints.noembed,
        )));

        // Tier order for document search: Semantic Scholar, then OpenAlex
        let mut semantic =
            SemanticScholarSource::new(Arc::clone(&client), &endpoints.semantic_scholar);
        if let Some(key) = &config.api_keys.semantic_scholar {
            semantic = semantic.with_api_key(key);
        }
        registry.register(Arc::new(semantic));

        let mut openalex = OpenAlexSource::new(Arc::clone(&client), &endpoints.openalex);
        if let Some(email) = &config.api_keys.openalex_email {
            openalex = openalex.with_email(email);
        }
        registry.register(Arc::new(openalex));

        Ok(registry)
    }

    /// Register a source. A source with the same id is replaced in place.
    pub fn register(&mut self, source: Arc<dyn Source>) {
        if let Some(slot) = self.sources.iter_mut().find(|s| s.id() == source.id()) {
            *slot = source;
        } else {
            self.sources.push(source);
        }
    }

    /// Get a source by ID
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Source>> {
        self.sources.iter().find(|s| s.id() == id)
    }

    /// Get all registered sources
    pub fn all(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.iter()
    }

    /// Get all source IDs
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.id())
    }

    /// Get sources that support a specific capability, in registration order
    pub fn with_capability(&self, capability: SourceCapabilities) -> Vec<&Arc<dyn Source>> {
        self.all()
            .filter(|s| s.capabilities().contains(capability))
            .collect()
    }

    /// First source supporting a capability
    pub fn first_with(&self, capability: SourceCapabilities) -> Option<&Arc<dyn Source>> {
        self.all().find(|s| s.capabilities().contains(capability))
    }

    /// Check if a source exists
    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Get the number of registered sources
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::MockSource;

    fn registry() -> SourceRegistry {
        SourceRegistry::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_registry_basic() {
        let registry = registry();

        assert_eq!(registry.len(), 5);
        assert!(!registry.is_empty());
        assert!(SourceRegistry::new().is_empty());
    }

    #[test]
    fn test_all_sources_registered() {
        let registry = registry();

        for source_id in ["crossref", "openlibrary", "noembed", "semantic", "openalex"] {
            assert!(
                registry.has(source_id),
                "Source '{}' should be registered",
                source_id
            );
        }
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_capabilities() {
        let registry = registry();

        let doi = registry.first_with(SourceCapabilities::DOI_LOOKUP).unwrap();
        assert_eq!(doi.id(), "crossref");

        let isbn = registry.first_with(SourceCapabilities::ISBN_LOOKUP).unwrap();
        assert_eq!(isbn.id(), "openlibrary");

        let video = registry.first_with(SourceCapabilities::VIDEO_LOOKUP).unwrap();
        assert_eq!(video.id(), "noembed");
    }

    #[test]
    fn test_document_search_tier_order() {
        let registry = registry();

        let tiers: Vec<&str> = registry
            .with_capability(SourceCapabilities::DOCUMENT_SEARCH)
            .into_iter()
            .map(|s| s.id())
            .collect();

        assert_eq!(tiers, vec!["semantic", "openalex"]);
    }

    #[test]
    fn test_register_replaces_in_place() {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(MockSource::with_id("a")));
        registry.register(Arc::new(MockSource::with_id("b")));
        registry.register(Arc::new(MockSource::with_id("a")));

        let ids: Vec<&str> = registry.ids().collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
