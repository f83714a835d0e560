//! Semantic Scholar paper search source.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Metadata, MetadataBuilder, PaperDetails, SourceDetails};
use crate::sources::{DocumentQuery, Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

const SEARCH_FIELDS: &str = "title,authors,year,venue,externalIds";

/// Semantic Scholar source
///
/// Finds publisher documents through the Graph API paper search, using a
/// query made of the publisher keyword and the document id.
#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: Arc<HttpClient>,
    base_url: String,
    api_key: Option<String>,
}

impl SemanticScholarSource {
    pub fn new(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Send an API key for the higher rate limit tier
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    fn search_url(&self, query: &DocumentQuery) -> String {
        format!(
            "{}/paper/search?query={}+{}&limit=1&fields={}",
            self.base_url,
            urlencoding::encode(&query.publisher),
            urlencoding::encode(&query.document_id),
            SEARCH_FIELDS
        )
    }
}

#[async_trait]
impl Source for SemanticScholarSource {
    fn id(&self) -> &str {
        "semantic"
    }

    fn name(&self) -> &str {
        "Semantic Scholar"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOCUMENT_SEARCH
    }

    async fn find_document(&self, query: &DocumentQuery) -> Result<Metadata, SourceError> {
        let url = self.search_url(query);

        let headers: Vec<(&str, &str)> = self
            .api_key
            .as_deref()
            .map(|key| vec![("x-api-key", key)])
            .unwrap_or_default();

        let data: SSSearchResponse = self.client.get_json(&url, &headers).await?;

        let paper = data.data.into_iter().next().ok_or_else(|| {
            SourceError::NotFound(format!(
                "No Semantic Scholar result for {} document {}",
                query.publisher, query.document_id
            ))
        })?;

        Ok(paper.into_metadata(query))
    }
}

// ===== Semantic Scholar API Types =====

#[derive(Debug, Deserialize)]
struct SSSearchResponse {
    #[serde(default)]
    data: Vec<SSPaper>,
}

#[derive(Debug, Deserialize)]
struct SSPaper {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<SSAuthor>,
    year: Option<i64>,
    venue: Option<String>,
    #[serde(rename = "externalIds")]
    external_ids: Option<SSExternalIds>,
}

#[derive(Debug, Deserialize)]
struct SSAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SSExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

impl SSPaper {
    fn into_metadata(self, query: &DocumentQuery) -> Metadata {
        let authors: Vec<String> = self.authors.into_iter().filter_map(|a| a.name).collect();

        let site_name = self
            .venue
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| query.publisher.to_uppercase());

        let mut builder = MetadataBuilder::new(&query.page_url)
            .authors(authors)
            .site_name(site_name)
            .details(SourceDetails::Paper(PaperDetails {
                doi: self.external_ids.and_then(|ids| ids.doi),
                ..PaperDetails::default()
            }));

        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(year) = self.year {
            builder = builder.year(year);
        }

        builder.build()
    }
}
