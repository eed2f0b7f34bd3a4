use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod captions;
pub mod youtube;

use crate::Result;

/// A video surfaced by the channel directory lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMeta {
    /// YouTube video id
    pub video_id: String,

    /// Video title as listed in the uploads playlist
    pub title: String,
}

/// Atomic caption unit from the transcript source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptFragment {
    /// Caption text as spoken
    pub text: String,

    /// Start time in seconds
    pub start_offset: f64,

    /// Display duration in seconds
    pub duration: f64,
}

/// Why a transcript could not be fetched. The batch loop branches on these
/// to report each skipped video, so the conditions stay distinguishable.
#[derive(thiserror::Error, Debug)]
pub enum TranscriptError {
    #[error("transcripts are disabled for this video")]
    Disabled,

    #[error("no transcript found for this video")]
    NotFound,

    #[error("transcript fetch failed: {0}")]
    Transport(String),
}

/// Trait for looking up a channel's recent uploads
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoDirectory: Send + Sync {
    /// Find the most recent videos for a channel by display name
    async fn find_recent_videos(
        &self,
        channel_name: &str,
        max_results: u32,
    ) -> Result<Vec<VideoMeta>>;
}

/// Trait for fetching a video's caption transcript
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch the ordered caption fragments for a video
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> std::result::Result<Vec<TranscriptFragment>, TranscriptError>;
}
