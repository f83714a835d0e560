//! Classified user input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What kind of thing the user typed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Url,
    Doi,
    Isbn,
    #[serde(rename = "youtube")]
    YouTube,
    Unknown,
}

impl InputKind {
    /// Human-readable label shown next to a detected input
    pub fn label(&self) -> &'static str {
        match self {
            InputKind::Url => "Website",
            InputKind::Doi => "Academic Paper (DOI)",
            InputKind::Isbn => "Book (ISBN)",
            InputKind::YouTube => "YouTube Video",
            InputKind::Unknown => "Unknown",
        }
    }

    /// Icon shown next to the label
    pub fn icon(&self) -> &'static str {
        match self {
            InputKind::Url => "🌐",
            InputKind::Doi => "📄",
            InputKind::Isbn => "📚",
            InputKind::YouTube => "📺",
            InputKind::Unknown => "❓",
        }
    }

    /// Short identifier, used in logs and JSON output
    pub fn id(&self) -> &'static str {
        match self {
            InputKind::Url => "url",
            InputKind::Doi => "doi",
            InputKind::Isbn => "isbn",
            InputKind::YouTube => "youtube",
            InputKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Url => write!(f, "URL"),
            InputKind::Doi => write!(f, "DOI"),
            InputKind::Isbn => write!(f, "ISBN"),
            InputKind::YouTube => write!(f, "YouTube"),
            InputKind::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of classifying one raw input string.
///
/// `value` is the normalized form handed to a source: hyphen-free ISBN,
/// prefix-free DOI, bare YouTube video id, or a URL with a scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedInput {
    pub kind: InputKind,
    pub value: String,
}

impl DetectedInput {
    pub fn new(kind: InputKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for DetectedInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(InputKind::Doi.label(), "Academic Paper (DOI)");
        assert_eq!(InputKind::Isbn.icon(), "📚");
        assert_eq!(InputKind::YouTube.id(), "youtube");
    }

    #[test]
    fn test_display() {
        let detected = DetectedInput::new(InputKind::Isbn, "9780321125217");
        assert_eq!(detected.to_string(), "[ISBN] 9780321125217");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&InputKind::YouTube).unwrap();
        assert_eq!(json, "\"youtube\"");
    }
}
