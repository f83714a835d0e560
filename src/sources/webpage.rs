//! Generic web page records derived from the URL alone.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::{Metadata, MetadataBuilder};

/// Title used when the URL has no path segments
pub const UNTITLED_PAGE: &str = "Untitled Page";

#[allow(clippy::expect_used)]
static FILE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[A-Za-z0-9_]+$").expect("extension regex is valid"));

/// Build a record for an arbitrary page. Never fails.
///
/// The title comes from the last path segment, the author from the first
/// label of the hostname, and the site name is the hostname itself.
pub fn extract_page(page: &Url, raw_url: &str) -> Metadata {
    let host = site_host(page);

    MetadataBuilder::new(raw_url)
        .title(title_from_path(page.path()))
        .author(capitalize(host.split('.').next().unwrap_or_default()))
        .site_name(host)
        .build()
}

/// Hostname without a leading `www.`
pub fn site_host(page: &Url) -> String {
    let host = page.host_str().unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Human-readable title from the last non-empty path segment
pub fn title_from_path(path: &str) -> String {
    let Some(last) = path.split('/').filter(|s| !s.is_empty()).next_back() else {
        return UNTITLED_PAGE.to_string();
    };

    let spaced = last.replace(['-', '_'], " ");
    let stripped = FILE_EXTENSION.replace(&spaced, "");

    stripped
        .split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
