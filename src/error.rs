use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Why a generation request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    Quota,
    InvalidRequest,
    Blocked,
    Upstream,
    Transport,
    MalformedResponse,
}

impl std::fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationErrorKind::Quota => write!(f, "quota exceeded"),
            GenerationErrorKind::InvalidRequest => write!(f, "request rejected"),
            GenerationErrorKind::Blocked => write!(f, "prompt blocked"),
            GenerationErrorKind::Upstream => write!(f, "service error"),
            GenerationErrorKind::Transport => write!(f, "network failure"),
            GenerationErrorKind::MalformedResponse => write!(f, "unexpected response"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid YouTube URL: {input:?}")]
    InvalidInput { input: String },

    #[error("no transcript available for video {video_id}: {reason}")]
    TranscriptUnavailable { video_id: String, reason: String },

    #[error("transcript request for video {video_id} failed: {source}")]
    TranscriptTransport {
        video_id: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("summary generation failed ({kind}): {message}")]
    Generation { kind: GenerationErrorKind, message: String },

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    pub fn generation(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Error::Generation {
            kind,
            message: message.into(),
        }
    }

    /// Stable machine-readable code, used by the JSON API and the UI
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidInput { .. } => "invalid_input",
            Error::TranscriptUnavailable { .. } => "transcript_unavailable",
            Error::TranscriptTransport { .. } => "transcript_transport",
            Error::Generation { kind, .. } => match kind {
                GenerationErrorKind::Quota => "generation_quota",
                GenerationErrorKind::InvalidRequest => "generation_invalid_request",
                GenerationErrorKind::Blocked => "generation_blocked",
                GenerationErrorKind::Upstream => "generation_upstream",
                GenerationErrorKind::Transport => "generation_transport",
                GenerationErrorKind::MalformedResponse => "generation_malformed_response",
            },
            Error::Configuration(_) => "configuration",
        }
    }

    /// True for failures the user caused and can fix by changing the input
    pub fn is_user_error(&self) -> bool {
        matches!(self, Error::InvalidInput { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_kind() {
        let quota = Error::generation(GenerationErrorKind::Quota, "slow down");
        let blocked = Error::generation(GenerationErrorKind::Blocked, "SAFETY");
        assert_eq!(quota.code(), "generation_quota");
        assert_eq!(blocked.code(), "generation_blocked");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = Error::InvalidInput {
            input: "not a url".to_string(),
        };
        assert_eq!(err.to_string(), "invalid YouTube URL: \"not a url\"");
        assert!(err.is_user_error());
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn test_generation_message_includes_kind() {
        let err = Error::generation(GenerationErrorKind::Quota, "429 Too Many Requests");
        assert_eq!(
            err.to_string(),
            "summary generation failed (quota exceeded): 429 Too Many Requests"
        );
        assert!(!err.is_user_error());
    }
}
