use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::TranscriptRewriter;
use crate::Result;

const GENERATIVE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Client for the generative-language `generateContent` endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,

    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, max_output_tokens: u32) -> Self {
        Self::with_endpoint(api_key, model, max_output_tokens, GENERATIVE_API_BASE)
    }

    /// Create a client against a non-default API endpoint
    pub fn with_endpoint(
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_output_tokens: u32,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(300))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
            max_output_tokens,
        }
    }

    /// Run one generation request and return the concatenated candidate text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![ContentPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: self.max_output_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("generative API error ({status}): {body}");
        }

        let payload = response.json::<GenerateContentResponse>().await?;
        let text = Self::extract_text(&payload);

        if text.is_empty() {
            anyhow::bail!("generative API returned no candidate text");
        }

        Ok(text)
    }

    fn extract_text(response: &GenerateContentResponse) -> String {
        response
            .candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .map(|part| part.text.as_str())
            .collect()
    }
}

#[async_trait]
impl TranscriptRewriter for GeminiClient {
    async fn rewrite(&self, text: &str, instruction: &str) -> String {
        let full_prompt = format!("{instruction}\n\nHere is the text:\n---\n{text}\n---");

        match self.complete(&full_prompt).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::error!("Rewrite model call failed: {}", e);
                format!("Error calling the rewrite model: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![ContentPart {
                    text: "hello".to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: 512,
            },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 512);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "first "}, {"text": "second"}], "role": "model"}}
            ]
        }"#;

        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(GeminiClient::extract_text(&response), "first second");
    }

    #[test]
    fn test_extract_text_handles_empty_response() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(GeminiClient::extract_text(&response), "");
    }
}
