//! Metadata model describing one citable work, whatever source produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder title when a source gives none
pub const DEFAULT_TITLE: &str = "Untitled";

/// Placeholder author when a source gives none
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Placeholder site name when a source gives none
pub const DEFAULT_SITE_NAME: &str = "Website";

/// Year placeholder used by every citation style
pub const NO_DATE: &str = "n.d.";

/// Kind-specific fields of a [`Metadata`] record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceDetails {
    Book(BookDetails),
    Paper(PaperDetails),
    Video(VideoDetails),
    Web,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetails {
    pub isbn: String,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperDetails {
    pub doi: Option<String>,
    pub journal: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub publisher: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub channel_title: Option<String>,
}

/// A normalized metadata record.
///
/// `title`, `author`, `site_name`, `url` and `access_date` are always
/// populated; [`MetadataBuilder::build`] fills placeholders for anything a
/// source left empty. Records are never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,

    /// Display string for all authors
    pub author: String,

    /// Individual author names, in source order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub authors: Vec<String>,

    /// Publication date (ISO format)
    pub publish_date: Option<String>,

    pub publish_year: Option<String>,

    /// When the record was extracted
    pub access_date: DateTime<Utc>,

    pub site_name: String,

    /// Canonical source URL
    pub url: String,

    pub details: SourceDetails,
}

impl Metadata {
    /// Publication year, falling back to the year of `publish_date`, then `n.d.`
    pub fn year(&self) -> String {
        if let Some(year) = self.publish_year.as_deref().filter(|y| !y.is_empty()) {
            return year.to_string();
        }

        self.publish_date
            .as_deref()
            .and_then(year_from_date)
            .unwrap_or_else(|| NO_DATE.to_string())
    }

    /// DOI, when the source knew one
    pub fn doi(&self) -> Option<&str> {
        match &self.details {
            SourceDetails::Paper(paper) => paper.doi.as_deref(),
            _ => None,
        }
    }

    pub fn publisher(&self) -> Option<&str> {
        match &self.details {
            SourceDetails::Book(book) => book.publisher.as_deref(),
            SourceDetails::Paper(paper) => paper.publisher.as_deref(),
            _ => None,
        }
    }

    pub fn paper(&self) -> Option<&PaperDetails> {
        match &self.details {
            SourceDetails::Paper(paper) => Some(paper),
            _ => None,
        }
    }

    pub fn channel_title(&self) -> Option<&str> {
        match &self.details {
            SourceDetails::Video(video) => video
                .channel_title
                .as_deref()
                .filter(|name| !name.trim().is_empty()),
            _ => None,
        }
    }
}

/// Leading four-digit year of an ISO-ish date string
fn year_from_date(date: &str) -> Option<String> {
    let year = date.trim().get(..4)?;
    if year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

/// Builder for constructing Metadata records
#[derive(Debug, Clone)]
pub struct MetadataBuilder {
    title: Option<String>,
    author: Option<String>,
    authors: Vec<String>,
    publish_date: Option<String>,
    publish_year: Option<String>,
    access_date: Option<DateTime<Utc>>,
    site_name: Option<String>,
    url: String,
    details: SourceDetails,
}

impl MetadataBuilder {
    /// Create a new builder for a web page record
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: None,
            author: None,
            authors: Vec::new(),
            publish_date: None,
            publish_year: None,
            access_date: None,
            site_name: None,
            url: url.into(),
            details: SourceDetails::Web,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the author display string explicitly
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set individual authors; the display string defaults to them joined by ", "
    pub fn authors(mut self, authors: Vec<String>) -> Self {
        self.authors = authors;
        self
    }

    pub fn publish_date(mut self, date: impl Into<String>) -> Self {
        self.publish_date = Some(date.into());
        self
    }

    pub fn publish_year(mut self, year: impl Into<String>) -> Self {
        self.publish_year = Some(year.into());
        self
    }

    /// Year known as a number: sets both the year and a January 1st date
    pub fn year(self, year: i64) -> Self {
        self.publish_year(year.to_string())
            .publish_date(format!("{}-01-01", year))
    }

    pub fn access_date(mut self, at: DateTime<Utc>) -> Self {
        self.access_date = Some(at);
        self
    }

    pub fn site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    pub fn details(mut self, details: SourceDetails) -> Self {
        self.details = details;
        self
    }

    /// Build the record, filling placeholders for missing required fields
    pub fn build(self) -> Metadata {
        let title = non_empty(self.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let author = non_empty(self.author)
            .or_else(|| non_empty(Some(self.authors.join(", "))))
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        let site_name =
            non_empty(self.site_name).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());

        Metadata {
            title,
            author,
            authors: self.authors,
            publish_date: non_empty(self.publish_date),
            publish_year: non_empty(self.publish_year),
            access_date: self.access_date.unwrap_or_else(Utc::now),
            site_name,
            url: self.url,
            details: self.details,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
