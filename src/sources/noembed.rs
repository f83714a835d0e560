//! noembed oEmbed source for YouTube videos.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;

use crate::models::{Metadata, MetadataBuilder, SourceDetails, VideoDetails};
use crate::sources::{Source, SourceCapabilities, SourceError};
use crate::utils::HttpClient;

const DEFAULT_VIDEO_TITLE: &str = "Untitled Video";
const DEFAULT_CHANNEL: &str = "Unknown Channel";

/// Canonical watch URL for a YouTube video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// noembed source
///
/// Resolves a YouTube video id to its title and channel through the
/// noembed oEmbed proxy, which needs no API key.
#[derive(Debug, Clone)]
pub struct NoEmbedSource {
    client: Arc<HttpClient>,
    base_url: String,
}

impl NoEmbedSource {
    pub fn new(client: Arc<HttpClient>, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Source for NoEmbedSource {
    fn id(&self) -> &str {
        "noembed"
    }

    fn name(&self) -> &str {
        "noembed"
    }

    fn capabilities(&self) -> SourceCapabilities {
        SourceCapabilities::VIDEO_LOOKUP
    }

    async fn get_video(&self, video_id: &str) -> Result<Metadata, SourceError> {
        let video_url = watch_url(video_id);
        let url = format!(
            "{}/embed?url={}",
            self.base_url,
            urlencoding::encode(&video_url)
        );

        let data: NEResponse = self.client.get_json(&url, &[]).await?;

        if let Some(error) = data.error {
            tracing::debug!(video_id, %error, "noembed reported an error");
            return Err(SourceError::NotFound("YouTube video not found".to_string()));
        }

        let title = non_blank(data.title);
        let channel = non_blank(data.author_name);

        Ok(MetadataBuilder::new(video_url)
            .title(title.unwrap_or_else(|| DEFAULT_VIDEO_TITLE.to_string()))
            .author(
                channel
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CHANNEL.to_string()),
            )
            .site_name("YouTube")
            .details(SourceDetails::Video(VideoDetails {
                channel_title: channel,
            }))
            .build())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Deserialize)]
struct NEResponse {
    title: Option<String>,
    author_name: Option<String>,
    error: Option<serde_json::Value>,
}
