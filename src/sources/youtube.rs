use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{VideoDirectory, VideoMeta};
use crate::{PressError, Result};

const DATA_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Channel directory backed by the YouTube Data API v3.
///
/// Resolving a channel name to its uploads takes three calls: a channel
/// search, a channel detail read for the uploads playlist id, and a playlist
/// items listing.
pub struct YoutubeDirectory {
    client: Client,
    api_key: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    #[serde(rename = "contentDetails")]
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistSnippet,
}

#[derive(Debug, Deserialize)]
struct PlaylistSnippet {
    title: String,
    #[serde(rename = "resourceId")]
    resource_id: PlaylistResourceId,
}

#[derive(Debug, Deserialize)]
struct PlaylistResourceId {
    #[serde(rename = "videoId")]
    video_id: String,
}

impl YoutubeDirectory {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DATA_API_BASE)
    }

    /// Create a directory against a non-default API endpoint
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.endpoint.trim_end_matches('/'), resource);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| PressError::LookupFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PressError::LookupFailed(format!("HTTP {status}: {body}")).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PressError::LookupFailed(format!("unexpected response shape: {e}")).into())
    }

    /// Resolve a channel display name to a channel id via search
    async fn resolve_channel_id(&self, channel_name: &str) -> Result<String> {
        tracing::debug!("Searching for channel: {}", channel_name);

        let search: SearchResponse = self
            .get_json(
                "search",
                &[
                    ("q", channel_name),
                    ("type", "channel"),
                    ("part", "id,snippet"),
                    ("maxResults", "1"),
                ],
            )
            .await?;

        search
            .items
            .into_iter()
            .next()
            .and_then(|item| item.id.channel_id)
            .ok_or_else(|| PressError::ChannelNotFound(channel_name.to_string()).into())
    }

    /// Look up the channel's uploads playlist id
    async fn uploads_playlist_id(&self, channel_id: &str) -> Result<String> {
        let channels: ChannelListResponse = self
            .get_json("channels", &[("id", channel_id), ("part", "contentDetails")])
            .await?;

        channels
            .items
            .into_iter()
            .next()
            .map(|item| item.content_details.related_playlists.uploads)
            .ok_or_else(|| {
                PressError::LookupFailed(format!("channel {channel_id} has no upload details"))
                    .into()
            })
    }
}

#[async_trait]
impl VideoDirectory for YoutubeDirectory {
    async fn find_recent_videos(
        &self,
        channel_name: &str,
        max_results: u32,
    ) -> Result<Vec<VideoMeta>> {
        let channel_id = self.resolve_channel_id(channel_name).await?;
        let playlist_id = self.uploads_playlist_id(&channel_id).await?;

        tracing::debug!(
            "Listing up to {} uploads from playlist {}",
            max_results,
            playlist_id
        );

        let max_results = max_results.to_string();
        let playlist: PlaylistItemsResponse = self
            .get_json(
                "playlistItems",
                &[
                    ("playlistId", playlist_id.as_str()),
                    ("part", "snippet"),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        Ok(playlist
            .items
            .into_iter()
            .map(|item| VideoMeta {
                video_id: item.snippet.resource_id.video_id,
                title: item.snippet.title,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "items": [
                {"id": {"kind": "youtube#channel", "channelId": "UC12345"}}
            ]
        }"#;

        let parsed: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items[0].id.channel_id.as_deref(), Some("UC12345"));
    }

    #[test]
    fn test_parse_channel_response() {
        let json = r#"{
            "items": [
                {"contentDetails": {"relatedPlaylists": {"uploads": "UU12345"}}}
            ]
        }"#;

        let parsed: ChannelListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.items[0].content_details.related_playlists.uploads,
            "UU12345"
        );
    }

    #[test]
    fn test_parse_playlist_items_response() {
        let json = r#"{
            "items": [
                {"snippet": {"title": "First video", "resourceId": {"videoId": "abc123"}}},
                {"snippet": {"title": "Second video", "resourceId": {"videoId": "def456"}}}
            ]
        }"#;

        let parsed: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.items.len(), 2);
        assert_eq!(parsed.items[0].snippet.title, "First video");
        assert_eq!(parsed.items[1].snippet.resource_id.video_id, "def456");
    }

    #[test]
    fn test_empty_search_is_channel_not_found() {
        let parsed: SearchResponse = serde_json::from_str(r#"{"items": []}"#).unwrap();
        assert!(parsed.items.is_empty());
    }
}
