//! Citation formatting in various styles.
//!
//! Supports APA, MLA, Chicago, Harvard and IEEE. Templates depend on the
//! kind of input the metadata came from: books, DOI papers and YouTube
//! videos get their own layouts in some styles, everything else is cited as
//! a web page.

use crate::models::{InputKind, Metadata, DEFAULT_SITE_NAME};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Citation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
    Harvard,
    Ieee,
}

impl CitationStyle {
    /// All styles, in display order
    pub const ALL: [CitationStyle; 5] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
        CitationStyle::Ieee,
    ];
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationStyle::Apa => write!(f, "APA"),
            CitationStyle::Mla => write!(f, "MLA"),
            CitationStyle::Chicago => write!(f, "Chicago"),
            CitationStyle::Harvard => write!(f, "Harvard"),
            CitationStyle::Ieee => write!(f, "IEEE"),
        }
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "mla" => Ok(CitationStyle::Mla),
            "chicago" => Ok(CitationStyle::Chicago),
            "harvard" => Ok(CitationStyle::Harvard),
            "ieee" => Ok(CitationStyle::Ieee),
            other => Err(format!("unknown citation style: {}", other)),
        }
    }
}

/// Placeholder for a missing book publisher
const NO_PUBLISHER: &str = "Publisher";

/// Placeholder for a missing volume or issue in MLA
const UNKNOWN_PART: &str = "?";

/// Format a citation for `metadata` in `style`.
///
/// `kind` selects the per-kind template; kinds without a dedicated template
/// in a style use that style's web page layout. Pure and total.
pub fn format_citation(metadata: &Metadata, style: CitationStyle, kind: InputKind) -> String {
    let parts = Parts::new(metadata);

    match style {
        CitationStyle::Apa => format_apa(&parts, metadata, kind),
        CitationStyle::Mla => format_mla(&parts, metadata, kind),
        CitationStyle::Chicago => format_chicago(&parts, metadata, kind),
        CitationStyle::Harvard => format_harvard(&parts),
        CitationStyle::Ieee => format_ieee(&parts),
    }
}

/// Format a citation in every style
pub fn format_all(metadata: &Metadata, kind: InputKind) -> Vec<(CitationStyle, String)> {
    CitationStyle::ALL
        .iter()
        .map(|style| (*style, format_citation(metadata, *style, kind)))
        .collect()
}

/// Fields shared by every template
struct Parts<'a> {
    author: &'a str,
    year: String,
    title: &'a str,
    site: &'a str,
    url: &'a str,
    accessed: String,
}

impl<'a> Parts<'a> {
    fn new(metadata: &'a Metadata) -> Self {
        let site = if metadata.site_name.is_empty() {
            DEFAULT_SITE_NAME
        } else {
            metadata.site_name.as_str()
        };

        Self {
            author: &metadata.author,
            year: metadata.year(),
            title: &metadata.title,
            site,
            url: &metadata.url,
            accessed: format_access_date(metadata),
        }
    }
}

/// Access date in long form, e.g. "March 5, 2024"
pub fn format_access_date(metadata: &Metadata) -> String {
    metadata.access_date.format("%B %-d, %Y").to_string()
}

/// APA
/// Book:  Author. (Year). Title. Publisher.
/// Paper: Author. (Year). Title. Journal, Vol(Issue). https://doi.org/DOI
/// Video: Channel. (Year). Title [Video]. YouTube. URL
/// Web:   Author. (Year). Title. Site. Retrieved Date, from URL
fn format_apa(p: &Parts<'_>, metadata: &Metadata, kind: InputKind) -> String {
    match kind {
        InputKind::Isbn => format!(
            "{}. ({}). {}. {}.",
            p.author,
            p.year,
            p.title,
            metadata.publisher().unwrap_or(NO_PUBLISHER)
        ),
        InputKind::Doi => {
            let paper = metadata.paper();
            let journal = optional(paper.and_then(|d| d.journal.as_deref()), " ", "");
            let volume = optional(paper.and_then(|d| d.volume.as_deref()), ", ", "");
            let issue = optional(paper.and_then(|d| d.issue.as_deref()), "(", ")");
            let doi = optional(metadata.doi(), " https://doi.org/", "");
            format!(
                "{}. ({}). {}.{}{}{}.{}",
                p.author, p.year, p.title, journal, volume, issue, doi
            )
        }
        InputKind::YouTube => format!(
            "{}. ({}). {} [Video]. YouTube. {}",
            metadata.channel_title().unwrap_or(p.author),
            p.year,
            p.title,
            p.url
        ),
        InputKind::Url | InputKind::Unknown => format!(
            "{}. ({}). {}. {}. Retrieved {}, from {}",
            p.author, p.year, p.title, p.site, p.accessed, p.url
        ),
    }
}

/// MLA
/// Book:  Author. Title. Publisher, Year.
/// Paper: Author. "Title." Journal, vol. Vol, no. Issue, Year.
/// Other: "Title." Site, Year, URL. Accessed Date.
fn format_mla(p: &Parts<'_>, metadata: &Metadata, kind: InputKind) -> String {
    match kind {
        InputKind::Isbn => format!(
            "{}. {}. {}, {}.",
            p.author,
            p.title,
            metadata.publisher().unwrap_or(NO_PUBLISHER),
            p.year
        ),
        InputKind::Doi => {
            let paper = metadata.paper();
            format!(
                "{}. \"{}.\" {}, vol. {}, no. {}, {}.",
                p.author,
                p.title,
                paper.and_then(|d| d.journal.as_deref()).unwrap_or(""),
                paper
                    .and_then(|d| d.volume.as_deref())
                    .unwrap_or(UNKNOWN_PART),
                paper
                    .and_then(|d| d.issue.as_deref())
                    .unwrap_or(UNKNOWN_PART),
                p.year
            )
        }
        InputKind::YouTube | InputKind::Url | InputKind::Unknown => format!(
            "\"{}.\" {}, {}, {}. Accessed {}.",
            p.title, p.site, p.year, p.url, p.accessed
        ),
    }
}

/// Chicago
/// Book:  Author. Title. Publisher, Year.
/// Other: Author. "Title." Site. Year. URL.
fn format_chicago(p: &Parts<'_>, metadata: &Metadata, kind: InputKind) -> String {
    match kind {
        InputKind::Isbn => format!(
            "{}. {}. {}, {}.",
            p.author,
            p.title,
            metadata.publisher().unwrap_or(NO_PUBLISHER),
            p.year
        ),
        InputKind::Doi | InputKind::YouTube | InputKind::Url | InputKind::Unknown => format!(
            "{}. \"{}.\" {}. {}. {}.",
            p.author, p.title, p.site, p.year, p.url
        ),
    }
}

/// Harvard: Author (Year) 'Title', Site. Available at: URL (Accessed: Date).
fn format_harvard(p: &Parts<'_>) -> String {
    format!(
        "{} ({}) '{}', {}. Available at: {} (Accessed: {}).",
        p.author, p.year, p.title, p.site, p.url, p.accessed
    )
}

/// IEEE: Author, "Title," Site, Year. [Online]. Available: URL. [Accessed: Date].
fn format_ieee(p: &Parts<'_>) -> String {
    format!(
        "{}, \"{},\" {}, {}. [Online]. Available: {}. [Accessed: {}].",
        p.author, p.title, p.site, p.year, p.url, p.accessed
    )
}

/// Wrap a present, non-empty value; absent values render as nothing
fn optional(value: Option<&str>, before: &str, after: &str) -> String {
    match value.filter(|v| !v.is_empty()) {
        Some(v) => format!("{}{}{}", before, v, after),
        None => String::new(),
    }
}

/// Structured citation data for JSON output
#[derive(Debug, Serialize)]
pub struct StructuredCitation {
    pub style: String,
    pub kind: InputKind,
    pub formatted: String,
    pub author: String,
    pub title: String,
    pub year: String,
    pub site_name: String,
    pub doi: Option<String>,
    pub url: String,
    pub accessed: String,
}

/// Get structured citation data
pub fn get_structured_citation(
    metadata: &Metadata,
    style: CitationStyle,
    kind: InputKind,
) -> StructuredCitation {
    StructuredCitation {
        style: style.to_string(),
        kind,
        formatted: format_citation(metadata, style, kind),
        author: metadata.author.clone(),
        title: metadata.title.clone(),
        year: metadata.year(),
        site_name: metadata.site_name.clone(),
        doi: metadata.doi().map(str::to_string),
        url: metadata.url.clone(),
        accessed: format_access_date(metadata),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BookDetails, MetadataBuilder, PaperDetails, SourceDetails, VideoDetails,
    };
    use chrono::{TimeZone, Utc};

    fn accessed() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap()
    }

    fn book() -> Metadata {
        MetadataBuilder::new("https://openlibrary.org/books/OL1M")
            .title("Domain-Driven Design")
            .authors(vec!["Eric Evans".to_string()])
            .year(2003)
            .site_name("Addison-Wesley")
            .access_date(accessed())
            .details(SourceDetails::Book(BookDetails {
                isbn: "9780321125217".to_string(),
                publisher: Some("Addison-Wesley".to_string()),
            }))
            .build()
    }

    fn paper() -> Metadata {
        MetadataBuilder::new("https://doi.org/10.1038/nature12373")
            .title("Nanometre-scale thermometry in a living cell")
            .authors(vec!["G. Kucsko".to_string(), "P. C. Maurer".to_string()])
            .year(2013)
            .site_name("Nature")
            .access_date(accessed())
            .details(SourceDetails::Paper(PaperDetails {
                doi: Some("10.1038/nature12373".to_string()),
                journal: Some("Nature".to_string()),
                volume: Some("500".to_string()),
                issue: Some("7460".to_string()),
                publisher: Some("Springer Science and Business Media LLC".to_string()),
            }))
            .build()
    }

    fn video() -> Metadata {
        MetadataBuilder::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .title("Never Gonna Give You Up")
            .author("Rick Astley")
            .site_name("YouTube")
            .access_date(accessed())
            .details(SourceDetails::Video(VideoDetails {
                channel_title: Some("Rick Astley".to_string()),
            }))
            .build()
    }

    fn page() -> Metadata {
        MetadataBuilder::new("https://example.com/some-page-title")
            .title("Some Page Title")
            .author("Example")
            .site_name("example.com")
            .access_date(accessed())
            .build()
    }

    #[test]
    fn test_apa_templates() {
        assert_eq!(
            format_citation(&book(), CitationStyle::Apa, InputKind::Isbn),
            "Eric Evans. (2003). Domain-Driven Design. Addison-Wesley."
        );
        assert_eq!(
            format_citation(&paper(), CitationStyle::Apa, InputKind::Doi),
            "G. Kucsko, P. C. Maurer. (2013). Nanometre-scale thermometry in a living cell. \
             Nature, 500(7460). https://doi.org/10.1038/nature12373"
        );
        assert_eq!(
            format_citation(&video(), CitationStyle::Apa, InputKind::YouTube),
            "Rick Astley. (n.d.). Never Gonna Give You Up [Video]. YouTube. \
             https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            format_citation(&page(), CitationStyle::Apa, InputKind::Url),
            "Example. (n.d.). Some Page Title. example.com. Retrieved March 5, 2024, \
             from https://example.com/some-page-title"
        );
    }

    #[test]
    fn test_apa_paper_omits_missing_parts() {
        let bare = MetadataBuilder::new("https://doi.org/10.1000/x")
            .title("T")
            .access_date(accessed())
            .details(SourceDetails::Paper(PaperDetails::default()))
            .build();

        assert_eq!(
            format_citation(&bare, CitationStyle::Apa, InputKind::Doi),
            "Unknown Author. (n.d.). T.."
        );
    }

    #[test]
    fn test_mla_templates() {
        assert_eq!(
            format_citation(&book(), CitationStyle::Mla, InputKind::Isbn),
            "Eric Evans. Domain-Driven Design. Addison-Wesley, 2003."
        );
        assert_eq!(
            format_citation(&paper(), CitationStyle::Mla, InputKind::Doi),
            "G. Kucsko, P. C. Maurer. \"Nanometre-scale thermometry in a living cell.\" \
             Nature, vol. 500, no. 7460, 2013."
        );
        assert_eq!(
            format_citation(&page(), CitationStyle::Mla, InputKind::Url),
            "\"Some Page Title.\" example.com, n.d., https://example.com/some-page-title. \
             Accessed March 5, 2024."
        );
        // videos use the web page layout
        assert_eq!(
            format_citation(&video(), CitationStyle::Mla, InputKind::YouTube),
            "\"Never Gonna Give You Up.\" YouTube, n.d., \
             https://www.youtube.com/watch?v=dQw4w9WgXcQ. Accessed March 5, 2024."
        );
    }

    #[test]
    fn test_mla_paper_placeholders() {
        let bare = MetadataBuilder::new("https://doi.org/10.1000/x")
            .title("T")
            .author("A")
            .publish_year("2020")
            .access_date(accessed())
            .details(SourceDetails::Paper(PaperDetails::default()))
            .build();

        assert_eq!(
            format_citation(&bare, CitationStyle::Mla, InputKind::Doi),
            "A. \"T.\" , vol. ?, no. ?, 2020."
        );
    }

    #[test]
    fn test_book_without_publisher() {
        let bare = MetadataBuilder::new("https://openlibrary.org/isbn/0321125215")
            .title("T")
            .author("A")
            .access_date(accessed())
            .details(SourceDetails::Book(BookDetails {
                isbn: "0321125215".to_string(),
                publisher: None,
            }))
            .build();

        assert_eq!(
            format_citation(&bare, CitationStyle::Apa, InputKind::Isbn),
            "A. (n.d.). T. Publisher."
        );
        assert_eq!(
            format_citation(&bare, CitationStyle::Chicago, InputKind::Isbn),
            "A. T. Publisher, n.d.."
        );
    }

    #[test]
    fn test_chicago_templates() {
        assert_eq!(
            format_citation(&book(), CitationStyle::Chicago, InputKind::Isbn),
            "Eric Evans. Domain-Driven Design. Addison-Wesley, 2003."
        );
        assert_eq!(
            format_citation(&paper(), CitationStyle::Chicago, InputKind::Doi),
            "G. Kucsko, P. C. Maurer. \"Nanometre-scale thermometry in a living cell.\" \
             Nature. 2013. https://doi.org/10.1038/nature12373."
        );
    }

    #[test]
    fn test_harvard_and_ieee_ignore_kind() {
        for kind in [InputKind::Url, InputKind::Doi, InputKind::Isbn, InputKind::YouTube] {
            assert_eq!(
                format_citation(&page(), CitationStyle::Harvard, kind),
                "Example (n.d.) 'Some Page Title', example.com. Available at: \
                 https://example.com/some-page-title (Accessed: March 5, 2024)."
            );
            assert_eq!(
                format_citation(&page(), CitationStyle::Ieee, kind),
                "Example, \"Some Page Title,\" example.com, n.d.. [Online]. Available: \
                 https://example.com/some-page-title. [Accessed: March 5, 2024]."
            );
        }
    }

    #[test]
    fn test_missing_year_renders_nd_everywhere() {
        let metadata = page();
        for (_, citation) in format_all(&metadata, InputKind::Url) {
            assert!(citation.contains("n.d."), "citation: {}", citation);
        }
    }

    #[test]
    fn test_format_is_idempotent() {
        let metadata = paper();
        for style in CitationStyle::ALL {
            assert_eq!(
                format_citation(&metadata, style, InputKind::Doi),
                format_citation(&metadata, style, InputKind::Doi)
            );
        }
    }

    #[test]
    fn test_style_parse_and_display() {
        assert_eq!("ieee".parse::<CitationStyle>(), Ok(CitationStyle::Ieee));
        assert_eq!(" APA ".parse::<CitationStyle>(), Ok(CitationStyle::Apa));
        assert!("bibtex".parse::<CitationStyle>().is_err());
        assert_eq!(CitationStyle::Chicago.to_string(), "Chicago");
        assert_eq!(CitationStyle::default(), CitationStyle::Apa);
    }

    #[test]
    fn test_structured_citation() {
        let structured = get_structured_citation(&paper(), CitationStyle::Apa, InputKind::Doi);
        assert_eq!(structured.style, "APA");
        assert_eq!(structured.year, "2013");
        assert_eq!(structured.doi.as_deref(), Some("10.1038/nature12373"));
        assert_eq!(structured.accessed, "March 5, 2024");
        assert!(structured.formatted.contains("https://doi.org/10.1038/nature12373"));
    }
}
