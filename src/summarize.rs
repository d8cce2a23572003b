use std::future::Future;

use log::debug;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{Error, GenerationErrorKind, Result, TranscriptText};

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Bumped whenever a template's wording changes
pub const TEMPLATE_VERSION: u32 = 1;

const DETAILED_TEMPLATE: &str = "You are a YouTube video summarizer specially for lecture videos. \
Provide a detailed summary of the following transcript within 250 words. \
Include main topics covered, key takeaways, and important concepts discussed. \
Format the output with proper headings and bullet points where appropriate.\n\nTranscript: ";

const QUICK_TEMPLATE: &str = "Provide a brief, concise summary of the main points from this video transcript \
in no more than 100 words. Focus on the core message and key takeaways.\n\nTranscript: ";

/// Summary length and structure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Quick,
    #[default]
    Detailed,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Quick, Mode::Detailed];

    /// Instruction text placed in front of the transcript
    pub fn template(&self) -> &'static str {
        match self {
            Mode::Quick => QUICK_TEMPLATE,
            Mode::Detailed => DETAILED_TEMPLATE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Quick => "Quick Summary",
            Mode::Detailed => "Detailed Summary",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Quick => "quick",
            Mode::Detailed => "detailed",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Template followed by the transcript, verbatim
pub fn build_prompt(mode: Mode, transcript: &TranscriptText) -> String {
    let template = mode.template();
    let mut prompt = String::with_capacity(template.len() + transcript.len());
    prompt.push_str(template);
    prompt.push_str(transcript.as_str());
    prompt
}

/// A hosted text-generation model
pub trait Summarizer {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Build the prompt for `mode` and submit it once; no retry, no caching
pub async fn request_summary<S: Summarizer>(summarizer: &S, transcript: &TranscriptText, mode: Mode) -> Result<String> {
    let prompt = build_prompt(mode, transcript);
    debug!("Requesting {mode} summary ({} prompt bytes)", prompt.len());
    summarizer.generate(&prompt).await
}

/// Google Generative Language API client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate_content(&self, prompt: &str) -> Result<String> {
        debug!("Summarizing via Gemini API with model {}", self.model);

        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::generation(GenerationErrorKind::Transport, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(classify_failure(status, &body));
        }

        let json: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| Error::generation(GenerationErrorKind::MalformedResponse, e.to_string()))?;
        extract_gemini_text(&json)
    }
}

impl Summarizer for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_content(prompt).await
    }
}

fn classify_failure(status: StatusCode, body: &str) -> Error {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.pointer("/error/message")?.as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());

    let kind = match status {
        StatusCode::TOO_MANY_REQUESTS => GenerationErrorKind::Quota,
        _ if body.contains("RESOURCE_EXHAUSTED") => GenerationErrorKind::Quota,
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => GenerationErrorKind::InvalidRequest,
        _ => GenerationErrorKind::Upstream,
    };

    Error::generation(kind, format!("Gemini API returned {status}: {message}"))
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(reason) = json.pointer("/promptFeedback/blockReason").and_then(|r| r.as_str()) {
        return Err(Error::generation(
            GenerationErrorKind::Blocked,
            format!("prompt blocked: {reason}"),
        ));
    }

    if let Some(parts) = json.pointer("/candidates/0/content/parts").and_then(|p| p.as_array()) {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect::<Vec<_>>()
            .join("");
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json.pointer("/candidates/0/finishReason").and_then(|r| r.as_str()) {
        if reason == "SAFETY" {
            return Err(Error::generation(
                GenerationErrorKind::Blocked,
                "response blocked: SAFETY".to_string(),
            ));
        }
    }

    Err(Error::generation(
        GenerationErrorKind::MalformedResponse,
        "unexpected Gemini API response format",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Segment;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transcript(text: &str) -> TranscriptText {
        TranscriptText::from_segments(&[Segment {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }])
    }

    #[test]
    fn test_quick_prompt_layout() {
        let t = transcript("the whole lecture, verbatim");
        let prompt = build_prompt(Mode::Quick, &t);
        assert!(prompt.starts_with(Mode::Quick.template()));
        assert!(prompt.ends_with("the whole lecture, verbatim"));
        assert_eq!(prompt.len(), Mode::Quick.template().len() + t.len());
    }

    #[test]
    fn test_detailed_prompt_layout() {
        let t = transcript("A B C");
        let prompt = build_prompt(Mode::Detailed, &t);
        assert!(prompt.starts_with(Mode::Detailed.template()));
        assert!(prompt.ends_with("A B C"));
        assert_eq!(prompt.len(), Mode::Detailed.template().len() + t.len());
    }

    #[test]
    fn test_templates_name_their_limits() {
        assert!(Mode::Quick.template().contains("100 words"));
        assert!(Mode::Detailed.template().contains("250 words"));
        assert!(Mode::Detailed.template().contains("headings"));
    }

    #[test]
    fn test_default_mode_is_detailed() {
        assert_eq!(Mode::default(), Mode::Detailed);
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_string(&Mode::Quick).unwrap(), "\"quick\"");
        let mode: Mode = serde_json::from_str("\"detailed\"").unwrap();
        assert_eq!(mode, Mode::Detailed);
    }

    #[test]
    fn test_extract_gemini_text() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "parts": [
                            { "text": "## Summary\n" },
                            { "text": "- point one" }
                        ],
                        "role": "model"
                    },
                    "finishReason": "STOP"
                }
            ]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "## Summary\n- point one");
    }

    #[test]
    fn test_extract_gemini_text_blocked() {
        let json = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_gemini_text(&json).unwrap_err();
        assert_eq!(err.code(), "generation_blocked");
    }

    #[test]
    fn test_extract_gemini_text_empty() {
        let json = serde_json::json!({"candidates": []});
        let err = extract_gemini_text(&json).unwrap_err();
        assert_eq!(err.code(), "generation_malformed_response");
    }

    #[test]
    fn test_classify_failure() {
        let quota = classify_failure(StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(quota.code(), "generation_quota");

        let body = r#"{"error": {"code": 400, "message": "Request payload size exceeds the limit", "status": "INVALID_ARGUMENT"}}"#;
        let invalid = classify_failure(StatusCode::BAD_REQUEST, body);
        assert_eq!(invalid.code(), "generation_invalid_request");
        assert!(invalid.to_string().contains("Request payload size exceeds the limit"));

        let upstream = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, "oops");
        assert_eq!(upstream.code(), "generation_upstream");
    }

    #[tokio::test]
    async fn test_generate_sends_prompt_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-pro:generateContent"))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "Short summary."}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(reqwest::Client::new(), "test-key", DEFAULT_MODEL).with_base_url(server.uri());
        let summary = request_summary(&client, &transcript("A B C"), Mode::Quick).await.unwrap();
        assert_eq!(summary, "Short summary.");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        let sent = body.pointer("/contents/0/parts/0/text").and_then(|t| t.as_str()).unwrap();
        assert_eq!(sent, format!("{}A B C", Mode::Quick.template()));
    }

    #[tokio::test]
    async fn test_generate_quota_exceeded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_json(serde_json::json!({
                "error": {"code": 429, "message": "Quota exceeded", "status": "RESOURCE_EXHAUSTED"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(reqwest::Client::new(), "test-key", DEFAULT_MODEL).with_base_url(server.uri());
        let err = client.generate("prompt").await.unwrap_err();
        assert_eq!(err.code(), "generation_quota");
    }
}
