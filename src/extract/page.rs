//! URL extraction chain: publisher patterns first, generic page record last.

use crate::models::Metadata;
use crate::sources::webpage::{extract_page, site_host};
use crate::sources::{
    LookupTarget, PublisherPattern, SourceCapabilities, SourceError, SourceRegistry,
};
use crate::utils::parse_page_url;

use super::ExtractError;

/// Resolve a page URL.
///
/// Patterns are checked in table order and only the first one matching
/// the host and path is attempted. If its lookup fails, or nothing
/// matches, the generic page record is returned. Only an unparseable URL
/// fails.
pub(super) async fn extract_url(
    registry: &SourceRegistry,
    patterns: &[PublisherPattern],
    raw_url: &str,
) -> Result<Metadata, ExtractError> {
    let page = parse_page_url(raw_url)?;
    let host = site_host(&page);

    let matched = patterns.iter().find_map(|pattern| {
        pattern
            .matches(&host, page.path(), raw_url)
            .map(|target| (pattern.id, target))
    });

    if let Some((publisher, target)) = matched {
        tracing::debug!(publisher, ?target, "Publisher URL matched");

        match resolve(registry, &target).await {
            Ok(metadata) => return Ok(metadata),
            Err(e) => tracing::warn!(
                publisher,
                error = %e,
                "Publisher lookup failed, using page record"
            ),
        }
    }

    Ok(extract_page(&page, raw_url))
}

async fn resolve(registry: &SourceRegistry, target: &LookupTarget) -> Result<Metadata, SourceError> {
    match target {
        LookupTarget::Doi(doi) => {
            let source = registry
                .first_with(SourceCapabilities::DOI_LOOKUP)
                .ok_or_else(|| SourceError::Other("No DOI source registered".to_string()))?;
            source.get_by_doi(doi).await
        }
        LookupTarget::Document(query) => {
            let mut last_error = None;

            for source in registry.with_capability(SourceCapabilities::DOCUMENT_SEARCH) {
                match source.find_document(query).await {
                    Ok(metadata) => return Ok(metadata),
                    Err(e) => {
                        tracing::info!(source = source.id(), error = %e, "Document search tier failed");
                        last_error = Some(e);
                    }
                }
            }

            Err(last_error.unwrap_or_else(|| {
                SourceError::Other("No document search source registered".to_string())
            }))
        }
    }
}
