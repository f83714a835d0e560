//! OpenAlex works search source.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Metadata, MetadataBuilder, PaperDetails, SourceDetails};
use crate::sources::{DocumentQuery, Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

/// Restricts document searches to works with US-affiliated institutions
const INSTITUTION_FILTER: &str = "institutions.country_code:US";

/// OpenAlex source
///
/// Second-tier document search over the OpenAlex works index.
#[derive(Debug, Clone)]
pub struct OpenAlexSource {
    client: Arc<HttpClient>,
    base_url: String,
    email: Option<String>,
}

impl OpenAlexSource {
    pub fn new(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: None,
        }
    }

    /// Identify requests for the OpenAlex polite pool
    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    fn search_url(&self, query: &DocumentQuery) -> String {
        let mut url = format!(
            "{}/works?search={}&filter={}&per_page=1",
            self.base_url,
            urlencoding::encode(&query.document_id),
            INSTITUTION_FILTER
        );
        if let Some(email) = &self.email {
            url.push_str(&format!("&mailto={}", urlencoding::encode(email)));
        }
        url
    }
}

#[async_trait]
impl Source for OpenAlexSource {
    fn id(&self) -> &str {
        "openalex"
    }

    fn name(&self) -> &str {
        "OpenAlex"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::DOCUMENT_SEARCH
    }

    async fn find_document(&self, query: &DocumentQuery) -> Result<Metadata, SourceError> {
        let url = self.search_url(query);

        let data: OAResponse = self.client.get_json(&url, &[]).await?;

        let work = data.results.into_iter().next().ok_or_else(|| {
            SourceError::NotFound(format!(
                "No OpenAlex result for {} document {}",
                query.publisher, query.document_id
            ))
        })?;

        Ok(work.into_metadata(query))
    }
}

// ===== OpenAlex API Types =====

#[derive(Debug, Deserialize)]
struct OAResponse {
    #[serde(default)]
    results: Vec<OAWork>,
}

#[derive(Debug, Deserialize)]
struct OAWork {
    title: Option<String>,
    doi: Option<String>,
    publication_date: Option<String>,
    publication_year: Option<i64>,
    #[serde(default)]
    authorships: Vec<OAAuthorship>,
    primary_location: Option<OALocation>,
}

#[derive(Debug, Deserialize)]
struct OAAuthorship {
    author: Option<OAAuthor>,
}

#[derive(Debug, Deserialize)]
struct OAAuthor {
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OALocation {
    source: Option<OASource>,
}

#[derive(Debug, Deserialize)]
struct OASource {
    display_name: Option<String>,
}

impl OAWork {
    fn into_metadata(self, query: &DocumentQuery) -> Metadata {
        let authors: Vec<String> = self
            .authorships
            .into_iter()
            .filter_map(|a| a.author.and_then(|author| author.display_name))
            .filter(|name| !name.is_empty())
            .collect();

        let site_name = self
            .primary_location
            .and_then(|loc| loc.source)
            .and_then(|source| source.display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| query.publisher.to_uppercase());

        let doi = self.doi.map(|doi| {
            doi.strip_prefix("https://doi.org/")
                .map(str::to_string)
                .unwrap_or(doi)
        });

        let mut builder = MetadataBuilder::new(&query.page_url)
            .authors(authors)
            .site_name(site_name)
            .details(SourceDetails::Paper(PaperDetails {
                doi,
                ..PaperDetails::default()
            }));

        if let Some(title) = self.title {
            builder = builder.title(title);
        }
        if let Some(date) = self.publication_date {
            builder = builder.publish_date(date);
        }
        if let Some(year) = self.publication_year {
            builder = builder.publish_year(year.to_string());
        }

        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn source(base: &str) -> OpenAlexSource {
        let client = Arc::new(HttpClient::new(&HttpConfig::default()).unwrap());
        OpenAlexSource::new(client, base)
    }

    fn ieee_query() -> DocumentQuery {
        DocumentQuery::new(
            "ieee",
            "1234567",
            "https://ieeexplore.ieee.org/document/1234567",
        )
    }

    #[tokio::test]
    async fn test_find_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".to_string(), "1234567".to_string()),
                Matcher::UrlEncoded("filter".to_string(), INSTITUTION_FILTER.to_string()),
                Matcher::UrlEncoded("per_page".to_string(), "1".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "meta": {"count": 1},
                    "results": [{
                        "id": "https://openalex.org/W1",
                        "title": "Gradient-Based Learning",
                        "doi": "https://doi.org/10.1109/5.726791",
                        "publication_date": "1998-11-01",
                        "publication_year": 1998,
                        "authorships": [
                            {"author": {"display_name": "Yann LeCun"}},
                            {"author": {"display_name": null}},
                            {"author": {"display_name": "Léon Bottou"}}
                        ],
                        "primary_location": {"source": {"display_name": "Proceedings of the IEEE"}}
                    }]
                })
                .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let metadata = source(&server.url())
            .find_document(&ieee_query())
            .await
            .unwrap();

        assert_eq!(metadata.title, "Gradient-Based Learning");
        assert_eq!(metadata.author, "Yann LeCun, Léon Bottou");
        assert_eq!(metadata.publish_date.as_deref(), Some("1998-11-01"));
        assert_eq!(metadata.year(), "1998");
        assert_eq!(metadata.site_name, "Proceedings of the IEEE");
        assert_eq!(metadata.doi(), Some("10.1109/5.726791"));
        assert_eq!(metadata.url, "https://ieeexplore.ieee.org/document/1234567");

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_find_document_defaults() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": [{"primary_location": null}]}).to_string())
            .create_async()
            .await;

        let metadata = source(&server.url())
            .find_document(&ieee_query())
            .await
            .unwrap();

        assert_eq!(metadata.title, "Untitled");
        assert_eq!(metadata.author, "Unknown Author");
        assert_eq!(metadata.site_name, "IEEE");
        assert_eq!(metadata.year(), "n.d.");
    }

    #[tokio::test]
    async fn test_find_document_no_results() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/works")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"results": []}).to_string())
            .create_async()
            .await;

        let err = source(&server.url())
            .find_document(&ieee_query())
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_email_is_sent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/works")
            .match_query(Matcher::UrlEncoded(
                "mailto".to_string(),
                "me@example.com".to_string(),
            ))
            .with_status(200)
            .with_body(json!({"results": [{"title": "Polite"}]}).to_string())
            .expect(1)
            .create_async()
            .await;

        let metadata = source(&server.url())
            .with_email("me@example.com")
            .find_document(&ieee_query())
            .await
            .unwrap();

        assert_eq!(metadata.title, "Polite");
        mock.assert_async().await;
    }
}
