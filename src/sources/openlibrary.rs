//! Open Library books source.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::models::{BookDetails, Metadata, MetadataBuilder, SourceDetails};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

/// Site name used when a book lists no publisher
const DEFAULT_SITE_NAME: &str = "Publisher";

#[allow(clippy::expect_used)]
static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("year regex is valid"));

/// Open Library source
///
/// Uses the books API (`/api/books?bibkeys=ISBN:...&jscmd=data`), which
/// answers with an object keyed by the requested bibkey.
#[derive(Debug, Clone)]
pub struct OpenLibrarySource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl OpenLibrarySource {
    pub fn new(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Source for OpenLibrarySource {
    fn id(&self) -> &str {
        "openlibrary"
    }

    fn name(&self) -> &str {
        "Open Library"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::ISBN_LOOKUP
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Metadata, SourceError> {
        let key = format!("ISBN:{}", isbn);
        let url = format!(
            "{}/api/books?bibkeys={}&format=json&jscmd=data",
            self.base_url,
            urlencoding::encode(&key)
        );

        let mut data: HashMap<String, OLBook> = self.client.get_json(&url, &[]).await?;

        let book = data
            .remove(&key)
            .ok_or_else(|| SourceError::NotFound("ISBN not found".to_string()))?;

        Ok(book.into_metadata(isbn))
    }
}

// ===== Open Library API Types =====

#[derive(Debug, Deserialize)]
struct OLBook {
    title: Option<String>,
    #[serde(default)]
    authors: Vec<OLNamed>,
    publish_date: Option<String>,
    #[serde(default)]
    publishers: Vec<OLNamed>,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OLNamed {
    name: Option<String>,
}

impl OLBook {
    fn into_metadata(self, isbn: &str) -> Metadata {
        let authors: Vec<String> = self.authors.into_iter().filter_map(|a| a.name).collect();

        let year = self
            .publish_date
            .as_deref()
            .and_then(|date| YEAR.find(date))
            .map(|m| m.as_str().to_string());

        let publisher = self.publishers.into_iter().find_map(|p| p.name);

        let url = self
            .url
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| format!("https://openlibrary.org/isbn/{}", isbn));

        let mut builder = MetadataBuilder::new(url)
            .authors(authors)
            .site_name(publisher.as_deref().unwrap_or(DEFAULT_SITE_NAME))
            .details(SourceDetails::Book(BookDetails {
                isbn: isbn.to_string(),
                publisher,
            }));

        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(year) = year {
            builder = builder
                .publish_date(format!("{}-01-01", year))
                .publish_year(year);
        }

        builder.build()
    }
}
