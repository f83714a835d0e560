//! Publisher URL patterns.
//!
//! Each pattern pairs a host keyword with a path regex. When both match a
//! page URL, the captured id becomes a [`LookupTarget`]: either a DOI to
//! resolve through the DOI registry, or a document query for the search
//! sources. Adding a publisher is a new table entry.

use std::sync::LazyLock;

use regex::Regex;

use super::DocumentQuery;

/// What a matched publisher URL should be resolved through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTarget {
    /// Resolve through a DOI lookup source
    Doi(String),

    /// Search the document sources in tier order
    Document(DocumentQuery),
}

/// A publisher-specific URL pattern
#[derive(Debug, Clone)]
pub struct PublisherPattern {
    /// Publisher keyword, used in logs and document queries
    pub id: &'static str,

    /// Substring the hostname must contain
    pub host_contains: &'static str,

    /// Path regex; capture group 1 is the publisher's id
    pub path: Regex,

    /// Turn (captured id, page URL) into a lookup target
    pub target: fn(&str, &str) -> LookupTarget,
}

impl PublisherPattern {
    /// Lookup target for this page, if host and path both match
    pub fn matches(&self, host: &str, path: &str, page_url: &str) -> Option<LookupTarget> {
        if !host.contains(self.host_contains) {
            return None;
        }

        let captured = self.path.captures(path)?.get(1)?.as_str();
        Some((self.target)(captured, page_url))
    }
}

#[allow(clippy::expect_used)]
static DEFAULT_PATTERNS: LazyLock<Vec<PublisherPattern>> = LazyLock::new(|| {
    vec![
        PublisherPattern {
            id: "ieee",
            host_contains: "ieee",
            path: Regex::new(r"document/([0-9]+)").expect("IEEE path regex is valid"),
            target: |id, page_url| LookupTarget::Document(DocumentQuery::new("ieee", id, page_url)),
        },
        PublisherPattern {
            id: "arxiv",
            host_contains: "arxiv",
            path: Regex::new(r"abs/([0-9]+\.[0-9]+)").expect("arXiv path regex is valid"),
            target: |id, _| LookupTarget::Doi(format!("10.48550/arXiv.{}", id)),
        },
        PublisherPattern {
            id: "nature",
            host_contains: "nature",
            path: Regex::new(r"(?i)articles/([a-z0-9-]+)").expect("Nature path regex is valid"),
            target: |slug, _| LookupTarget::Doi(format!("10.1038/{}", slug)),
        },
        PublisherPattern {
            id: "springer",
            host_contains: "springer",
            path: Regex::new(r"(?i)(?:article|chapter)/(10\.[0-9]+/[^?#]+)")
                .expect("Springer path regex is valid"),
            target: |suffix, _| {
                let doi = urlencoding::decode(suffix)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| suffix.to_string());
                LookupTarget::Doi(doi)
            },
        },
    ]
});

/// The built-in publisher table, in the order patterns are tried
pub fn default_patterns() -> Vec<PublisherPattern> {
    DEFAULT_PATTERNS.clone()
}
