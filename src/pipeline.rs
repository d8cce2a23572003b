use log::{debug, info, warn};
use serde::Serialize;

use crate::summarize::{Mode, Summarizer, request_summary};
use crate::youtube::{TranscriptProvider, fetch_transcript_for};
use crate::{Error, Result, VideoId, extract_video_id};

/// Where a request currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    ExtractingId,
    FetchingTranscript,
    RequestingSummary,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Idle => write!(f, "idle"),
            Stage::ExtractingId => write!(f, "extracting-id"),
            Stage::FetchingTranscript => write!(f, "fetching-transcript"),
            Stage::RequestingSummary => write!(f, "requesting-summary"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub video_id: VideoId,
    pub mode: Mode,
    pub text: String,
}

/// Terminal state of one request
#[derive(Debug)]
pub enum Outcome {
    /// No ID could be extracted, or the transcript could not be fetched
    TranscriptFailed { video_id: Option<VideoId>, error: Error },
    SummaryFailed { video_id: VideoId, error: Error },
    SummaryReady(Summary),
}

impl Outcome {
    pub fn into_result(self) -> Result<Summary> {
        match self {
            Outcome::TranscriptFailed { error, .. } | Outcome::SummaryFailed { error, .. } => Err(error),
            Outcome::SummaryReady(summary) => Ok(summary),
        }
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        match self {
            Outcome::TranscriptFailed { video_id, .. } => video_id.as_ref(),
            Outcome::SummaryFailed { video_id, .. } => Some(video_id),
            Outcome::SummaryReady(summary) => Some(&summary.video_id),
        }
    }
}

/// Runs URL → transcript → summary, one stage after another
#[derive(Debug, Clone)]
pub struct Pipeline<P, S> {
    provider: P,
    summarizer: S,
}

impl<P: TranscriptProvider, S: Summarizer> Pipeline<P, S> {
    pub fn new(provider: P, summarizer: S) -> Self {
        Self { provider, summarizer }
    }

    pub async fn run(&self, url: &str, mode: Mode) -> Outcome {
        let mut stage = Stage::Idle;
        advance(&mut stage, Stage::ExtractingId);

        let Some(video_id) = extract_video_id(url) else {
            warn!("No video ID in {url:?}");
            return Outcome::TranscriptFailed {
                video_id: None,
                error: Error::InvalidInput { input: url.to_string() },
            };
        };

        advance(&mut stage, Stage::FetchingTranscript);
        let transcript = match fetch_transcript_for(&self.provider, &video_id).await {
            Ok(transcript) => transcript,
            Err(error) => {
                warn!("Transcript for {video_id} failed: {error}");
                return Outcome::TranscriptFailed {
                    video_id: Some(video_id),
                    error,
                };
            }
        };

        advance(&mut stage, Stage::RequestingSummary);
        match request_summary(&self.summarizer, &transcript, mode).await {
            Ok(text) => {
                info!("{mode} summary ready for {video_id}");
                Outcome::SummaryReady(Summary { video_id, mode, text })
            }
            Err(error) => {
                warn!("Summary for {video_id} failed: {error}");
                Outcome::SummaryFailed { video_id, error }
            }
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("{stage} -> {next}");
    *stage = next;
}
