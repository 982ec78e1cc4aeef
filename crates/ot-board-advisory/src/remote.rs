//! Remote tip source backed by the Gemini generateContent API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::prompts;
use crate::source::{AdvisoryError, AdvisoryResult, TipSource};

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

// Bounded so a stalled fetch cannot outlive the 30s refresh cadence.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Tip source calling a hosted Gemini model.
pub struct GeminiTips {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiTips {
    /// Build a client for the default endpoint.
    pub fn new(api_key: impl Into<String>) -> AdvisoryResult<Self> {
        Self::with_endpoint(DEFAULT_ENDPOINT, api_key)
    }

    /// Build a client for a custom endpoint (test servers, proxies).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> AdvisoryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AdvisoryError::Http(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

#[async_trait]
impl TipSource for GeminiTips {
    async fn fetch_tip(&self) -> AdvisoryResult<String> {
        let body = json!({
            "system_instruction": { "parts": [{ "text": prompts::SYSTEM_PROMPT }] },
            "contents": [{ "parts": [{ "text": prompts::make_tip_prompt() }] }],
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AdvisoryError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AdvisoryError::Http(format!("status {}", response.status())));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AdvisoryError::BadResponse(e.to_string()))?;

        let tip = parsed
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.trim().to_string())
            .ok_or_else(|| AdvisoryError::BadResponse("no candidates in response".into()))?;

        if tip.is_empty() {
            return Err(AdvisoryError::Empty);
        }
        Ok(tip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_generate_response() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [{ "text": "  Stay hydrated.  " }] } }
            ]
        }"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        let tip = parsed.candidates[0].content.parts[0].text.trim();
        assert_eq!(tip, "Stay hydrated.");
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
