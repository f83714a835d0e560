//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::models::{Metadata, MetadataBuilder};
use crate::sources::{DocumentQuery, Source, SourceCapabilities, SourceError};

/// A mock source that answers every lookup with a predefined response.
///
/// Records each request it receives so tests can assert on fallback order.
#[derive(Debug)]
pub struct MockSource {
    id: String,
    capabilities: SourceCapabilities,
    response: Mutex<Option<Result<Metadata, SourceError>>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<String>>,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a mock with every capability and no configured response.
    pub fn new() -> Self {
        Self::with_id("mock")
    }

    /// Create a mock registered under a custom id.
    pub fn with_id(id: &str) -> Self {
        Self {
            id: id.to_string(),
            capabilities: SourceCapabilities::all(),
            response: Mutex::new(None),
            delay: None,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_capabilities(mut self, capabilities: SourceCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Sleep before answering, to simulate a slow provider.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answer every lookup with this record.
    pub fn returning(self, metadata: Metadata) -> Self {
        self.set_response(Ok(metadata));
        self
    }

    /// Fail every lookup with this error.
    pub fn failing(self, error: SourceError) -> Self {
        self.set_response(Err(error));
        self
    }

    /// Replace the configured response.
    pub fn set_response(&self, response: Result<Metadata, SourceError>) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) = Some(response);
    }

    /// Number of lookups received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Identifiers received, in order, e.g. `doi:10.1000/x`.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn answer(&self, request: String) -> Result<Metadata, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.response
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| Err(SourceError::NotFound("Mock has no record".to_string())))
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    fn capabilities(&self) -> SourceCapabilities {
        self.capabilities
    }

    async fn get_by_doi(&self, doi: &str) -> Result<Metadata, SourceError> {
        self.answer(format!("doi:{}", doi)).await
    }

    async fn get_by_isbn(&self, isbn: &str) -> Result<Metadata, SourceError> {
        self.answer(format!("isbn:{}", isbn)).await
    }

    async fn get_video(&self, video_id: &str) -> Result<Metadata, SourceError> {
        self.answer(format!("video:{}", video_id)).await
    }

    async fn find_document(&self, query: &DocumentQuery) -> Result<Metadata, SourceError> {
        self.answer(format!("document:{}:{}", query.publisher, query.document_id))
            .await
    }
}

/// Helper function to create a mock record for testing.
pub fn make_metadata(title: &str, url: &str) -> Metadata {
    MetadataBuilder::new(url)
        .title(title)
        .author("Test Author")
        .site_name("Test Site")
        .build()
}
