//! CrossRef DOI registry source.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Metadata, MetadataBuilder, PaperDetails, SourceDetails};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

/// Site name used when a work has neither a container title nor a publisher
const DEFAULT_SITE_NAME: &str = "Academic Publication";

/// CrossRef research source
///
/// Uses the CrossRef REST API (`/works/{doi}`) for DOI metadata lookup.
#[derive(Debug, Clone)]
pub struct CrossRefSource {
    client: Arc<HttpClient>,
    base_url: String,
    mailto: Option<String>,
}

impl CrossRefSource {
    pub fn new(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            mailto: None,
        }
    }

    /// Identify requests for the CrossRef polite pool
    pub fn with_mailto(mut self, mailto: &str) -> Self {
        self.mailto = Some(mailto.to_string());
        self
    }

    fn work_url(&self, doi: &str) -> String {
        let mut url = format!("{}/works/{}", self.base_url, urlencoding::encode(doi));
        if let Some(mailto) = &self.mailto {
            url.push_str(&format!("?mailto={}", urlencoding::encode(mailto)));
        }
        url
    }
}

#[async_trait]
impl Source for CrossRefSource {
    fn id(&self) -> &str {
        "crossref"
    }

    fn name(&self) -> &str {
        "CrossRef"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOI_LOOKUP
    }

    async fn get_by_doi(&self, doi: &str) -> Result<Metadata, SourceError> {
        let url = self.work_url(doi);

        let data: CRResponse = self.client.get_json(&url, &[]).await.map_err(|e| {
            if e.is_not_found() {
                SourceError::NotFound("DOI not found".to_string())
            } else {
                e
            }
        })?;

        let work = data
            .message
            .ok_or_else(|| SourceError::NotFound("DOI not found".to_string()))?;

        tracing::debug!(doi, "CrossRef work found");

        Ok(work.into_metadata(doi))
    }
}

// ===== CrossRef API Types =====

#[derive(Debug, Deserialize)]
struct CRResponse {
    message: Option<CRWork>,
}

/// CrossRef sends `title` as an array, a few mirrors send a bare string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CRTitle {
    Many(Vec<String>),
    One(String),
}

impl CRTitle {
    fn first(self) -> Option<String> {
        match self {
            CRTitle::Many(titles) => titles.into_iter().next(),
            CRTitle::One(title) => Some(title),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CRWork {
    title: Option<CRTitle>,
    #[serde(default)]
    author: Vec<CRAuthor>,
    published: Option<CRDate>,
    #[serde(rename = "container-title", default)]
    container_title: Vec<String>,
    volume: Option<String>,
    issue: Option<String>,
    publisher: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRAuthor {
    given: Option<String>,
    family: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CRDate {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i64>>>,
}

impl CRWork {
    fn into_metadata(self, doi: &str) -> Metadata {
        let authors: Vec<String> = self
            .author
            .iter()
            .map(|a| {
                format!(
                    "{} {}",
                    a.given.as_deref().unwrap_or_default(),
                    a.family.as_deref().unwrap_or_default()
                )
                .trim()
                .to_string()
            })
            .collect();

        let year = self
            .published
            .as_ref()
            .and_then(|p| p.date_parts.first())
            .and_then(|parts| parts.first().copied().flatten());

        let journal = self.container_title.into_iter().next();
        let site_name = journal
            .clone()
            .or_else(|| self.publisher.clone())
            .unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());

        let mut builder = MetadataBuilder::new(format!("https://doi.org/{}", doi))
            .authors(authors)
            .site_name(site_name)
            .details(SourceDetails::Paper(PaperDetails {
                doi: Some(doi.to_string()),
                journal,
                volume: self.volume,
                issue: self.issue,
                publisher: self.publisher,
            }));

        if let Some(title) = self.title.and_then(CRTitle::first) {
            builder = builder.title(title);
        }
        if let Some(year) = year {
            builder = builder.year(year);
        }

        builder.build()
    }
}
