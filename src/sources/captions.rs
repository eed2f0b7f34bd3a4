use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{TranscriptError, TranscriptFragment, TranscriptSource};

const TIMEDTEXT_BASE: &str = "https://video.google.com/timedtext";

/// Caption source backed by the timedtext endpoint in its JSON3 framing.
///
/// The endpoint does not announce "captions disabled" as cleanly as a
/// dedicated client library would; the status mapping below keeps the three
/// caller-visible conditions apart and confines the guesswork to this file.
pub struct TimedTextSource {
    client: Client,
    language: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<CaptionEvent>,
}

#[derive(Debug, Deserialize)]
struct CaptionEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,

    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,

    #[serde(default)]
    segs: Vec<CaptionSegment>,
}

#[derive(Debug, Deserialize)]
struct CaptionSegment {
    #[serde(rename = "utf8", default)]
    text: String,
}

impl TimedTextSource {
    pub fn new(language: impl Into<String>) -> Self {
        Self::with_endpoint(language, TIMEDTEXT_BASE)
    }

    /// Create a source against a non-default caption endpoint
    pub fn with_endpoint(language: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            language: language.into(),
            endpoint: endpoint.into(),
        }
    }

    fn fragments_from(payload: TimedTextResponse) -> Vec<TranscriptFragment> {
        payload
            .events
            .into_iter()
            .filter_map(|event| {
                let text = event
                    .segs
                    .iter()
                    .map(|seg| seg.text.as_str())
                    .collect::<String>();
                let text = text.trim();

                if text.is_empty() {
                    return None;
                }

                Some(TranscriptFragment {
                    text: text.to_string(),
                    start_offset: event.start_ms as f64 / 1000.0,
                    duration: event.duration_ms as f64 / 1000.0,
                })
            })
            .collect()
    }
}

#[async_trait]
impl TranscriptSource for TimedTextSource {
    async fn fetch_transcript(
        &self,
        video_id: &str,
    ) -> Result<Vec<TranscriptFragment>, TranscriptError> {
        tracing::debug!("Fetching captions for video: {}", video_id);

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("v", video_id),
                ("lang", self.language.as_str()),
                ("fmt", "json3"),
            ])
            .send()
            .await
            .map_err(|e| TranscriptError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::FORBIDDEN | StatusCode::GONE => return Err(TranscriptError::Disabled),
            StatusCode::NOT_FOUND => return Err(TranscriptError::NotFound),
            status if !status.is_success() => {
                return Err(TranscriptError::Transport(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| TranscriptError::Transport(e.to_string()))?;

        // The endpoint answers 200 with an empty body for untracked videos.
        if body.trim().is_empty() {
            return Err(TranscriptError::NotFound);
        }

        let payload: TimedTextResponse = serde_json::from_str(&body)
            .map_err(|e| TranscriptError::Transport(format!("unexpected caption payload: {e}")))?;

        let fragments = Self::fragments_from(payload);
        if fragments.is_empty() {
            return Err(TranscriptError::NotFound);
        }

        Ok(fragments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_caption_payload() {
        let json = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 1500, "segs": [{"utf8": "hes"}]},
                {"tStartMs": 1500, "dDurationMs": 1200, "segs": [{"utf8": "going "}, {"utf8": "home."}]},
                {"tStartMs": 2700, "dDurationMs": 300, "segs": [{"utf8": "\n"}]}
            ]
        }"#;

        let payload: TimedTextResponse = serde_json::from_str(json).unwrap();
        let fragments = TimedTextSource::fragments_from(payload);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].text, "hes");
        assert_eq!(fragments[1].text, "going home.");
        assert!((fragments[1].start_offset - 1.5).abs() < f64::EPSILON);
        assert!((fragments[1].duration - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn test_newline_only_events_are_dropped() {
        let json = r#"{"events": [{"tStartMs": 0, "segs": [{"utf8": "\n"}]}]}"#;
        let payload: TimedTextResponse = serde_json::from_str(json).unwrap();
        assert!(TimedTextSource::fragments_from(payload).is_empty());
    }

    #[test]
    fn test_payload_without_events() {
        let payload: TimedTextResponse = serde_json::from_str("{}").unwrap();
        assert!(TimedTextSource::fragments_from(payload).is_empty());
    }
}
