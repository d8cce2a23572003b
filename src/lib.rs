pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod web;
pub mod youtube;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use error::{Error, GenerationErrorKind, Result};

/// An 11-character YouTube video identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Segment texts joined by single spaces, in the order they were returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptText(String);

impl TranscriptText {
    pub fn from_segments(segments: &[Segment]) -> Self {
        TranscriptText(
            segments
                .iter()
                .map(|s| s.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl std::fmt::Display for TranscriptText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Tried in order; the first match wins.
static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // youtube.com/watch?v=ID (and any other v= query form)
        r"v=([0-9A-Za-z_-]{11})",
        // youtu.be/ID
        r"youtu\.be/([0-9A-Za-z_-]{11})",
        // youtube.com/embed/ID, /shorts/ID, /live/ID
        r"youtube\.com/(?:embed|shorts|live)/([0-9A-Za-z_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern compiles"))
    .collect()
});

/// Extract video ID from various YouTube URL formats
pub fn extract_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();

    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| VideoId(caps[1].to_string()))
}

/// Thumbnail image URL for a video, by YouTube's naming convention
pub fn thumbnail_url(video_id: &VideoId) -> String {
    format!("https://img.youtube.com/vi/{video_id}/0.jpg")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(input: &str) -> Option<String> {
        extract_video_id(input).map(|v| v.as_str().to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=5s"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_v_not_first_param() {
        assert_eq!(
            id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(id("https://youtu.be/dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
    }

    #[test]
    fn test_short_url_with_query() {
        assert_eq!(
            id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_id_embedded_in_text() {
        assert_eq!(
            id("watch this: youtu.be/abc_DEF-123 it's great"),
            Some("abc_DEF-123".to_string())
        );
    }

    #[test]
    fn test_v_param_wins_over_short_link() {
        // Pattern order decides, not position in the string
        assert_eq!(
            id("https://youtu.be/AAAAAAAAAAA?v=BBBBBBBBBBB"),
            Some("BBBBBBBBBBB".to_string())
        );
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(id("not a url"), None);
    }

    #[test]
    fn test_id_too_short() {
        assert_eq!(id("https://www.youtube.com/watch?v=short"), None);
    }

    #[test]
    fn test_unrelated_site_path() {
        assert_eq!(id("https://example.com/abcdefghijklmnop"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(id(""), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_deterministic() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(extract_video_id(url), extract_video_id(url));
    }

    #[test]
    fn test_thumbnail_url() {
        let vid = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(thumbnail_url(&vid), "https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg");
    }

    fn seg(text: &str) -> Segment {
        Segment {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    #[test]
    fn test_transcript_text_joins_with_spaces() {
        let text = TranscriptText::from_segments(&[seg("Hello"), seg("world")]);
        assert_eq!(text.as_str(), "Hello world");
    }

    #[test]
    fn test_transcript_text_preserves_order_and_duplicates() {
        let text = TranscriptText::from_segments(&[seg("C"), seg("A"), seg("A"), seg("B")]);
        assert_eq!(text.as_str(), "C A A B");
    }

    #[test]
    fn test_transcript_text_empty() {
        assert!(TranscriptText::from_segments(&[]).is_empty());
    }
}
