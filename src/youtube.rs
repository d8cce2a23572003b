use std::future::Future;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::{Error, Result, Segment, TranscriptText, VideoId, extract_video_id};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

pub const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Source of timed caption fragments for a video
pub trait TranscriptProvider {
    fn fetch(&self, video_id: &VideoId) -> impl Future<Output = Result<Vec<Segment>>> + Send;
}

/// Extract the video ID from `url`, fetch its captions and join them into one text.
///
/// Fails with [`Error::InvalidInput`] before any network call if no ID can be found.
/// Never returns a partial transcript.
pub async fn fetch_transcript<P: TranscriptProvider>(provider: &P, url: &str) -> Result<(VideoId, TranscriptText)> {
    let video_id = extract_video_id(url).ok_or_else(|| Error::InvalidInput { input: url.to_string() })?;
    let text = fetch_transcript_for(provider, &video_id).await?;
    Ok((video_id, text))
}

/// Fetch and join the captions of an already extracted video ID
pub async fn fetch_transcript_for<P: TranscriptProvider>(provider: &P, video_id: &VideoId) -> Result<TranscriptText> {
    let segments = provider.fetch(video_id).await?;
    let text = TranscriptText::from_segments(&segments);
    if text.as_str().trim().is_empty() {
        return Err(Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: "transcript is empty".to_string(),
        });
    }

    debug!("Transcript for {video_id}: {} segments, {} bytes", segments.len(), text.len());
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Caption fetcher backed by YouTube's InnerTube API
#[derive(Debug, Clone)]
pub struct YouTubeCaptions {
    client: reqwest::Client,
    base_url: String,
    lang: String,
}

impl YouTubeCaptions {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            lang: lang.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, url: &str, video_id: &VideoId) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .map_err(|e| transport(video_id, e))
    }

    async fn fetch_segments(&self, video_id: &VideoId) -> Result<Vec<Segment>> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("{}/watch?v={video_id}", self.base_url);
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .get(&watch_url, video_id)
            .await?
            .error_for_status()
            .map_err(|e| transport(video_id, e))?
            .text()
            .await
            .map_err(|e| transport(video_id, e))?;

        let api_key = extract_api_key(&page_html).ok_or_else(|| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: "could not extract InnerTube API key from watch page".to_string(),
        })?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("{}/youtubei/v1/player?key={api_key}&prettyPrint=false", self.base_url);

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id.as_str()
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport(video_id, e))?
            .json()
            .await
            .map_err(|e| transport(video_id, e))?;

        let track = select_track(resp, video_id, &self.lang)?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_resp = self.get(&track.base_url, video_id).await?;
        if !caption_resp.status().is_success() {
            return Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: format!("caption download returned {}", caption_resp.status()),
            });
        }
        let caption_xml = caption_resp.text().await.map_err(|e| transport(video_id, e))?;

        parse_caption_xml(&caption_xml).map_err(|reason| Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason,
        })
    }
}

impl TranscriptProvider for YouTubeCaptions {
    async fn fetch(&self, video_id: &VideoId) -> Result<Vec<Segment>> {
        self.fetch_segments(video_id).await
    }
}

fn transport(video_id: &VideoId, source: reqwest::Error) -> Error {
    Error::TranscriptTransport {
        video_id: video_id.to_string(),
        source,
    }
}

fn extract_api_key(html: &str) -> Option<String> {
    static PATTERNS: std::sync::LazyLock<[Regex; 2]> = std::sync::LazyLock::new(|| {
        [
            Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).expect("api key pattern compiles"),
            // Fallback: the newer pattern
            Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).expect("api key pattern compiles"),
        ]
    });

    PATTERNS
        .iter()
        .find_map(|re| re.captures(html))
        .map(|caps| caps[1].to_string())
}

/// Pick the caption track for `lang`, or the first available one
fn select_track(resp: InnerTubePlayerResponse, video_id: &VideoId, lang: &str) -> Result<CaptionTrack> {
    if let Some(status) = resp.playability_status {
        if status.status != "OK" {
            return Err(Error::TranscriptUnavailable {
                video_id: video_id.to_string(),
                reason: status.reason.unwrap_or(status.status),
            });
        }
    }

    let mut tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(Error::TranscriptUnavailable {
            video_id: video_id.to_string(),
            reason: "captions are disabled for this video".to_string(),
        });
    }

    let index = tracks.iter().position(|t| t.language_code == lang).unwrap_or(0);
    Ok(tracks.swap_remove(index))
}

fn parse_caption_xml(xml: &str) -> std::result::Result<Vec<Segment>, String> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    // Set between <text> and </text>
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                let start = start.unwrap_or_else(|| {
                    debug!("Caption cue without a valid start attribute, using 0.0");
                    0.0
                });
                current = Some((start, dur.unwrap_or(0.0), String::new()));
            }
            Ok(Event::Text(ref e)) => {
                if let Some((_, _, buf)) = current.as_mut() {
                    let raw_text = e.unescape().unwrap_or_default();
                    buf.push_str(&html_escape::decode_html_entities(&raw_text));
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                if let Some((start, duration, buf)) = current.take() {
                    let text = buf.split_whitespace().collect::<Vec<_>>().join(" ");
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(format!("error parsing caption XML: {e}")),
            _ => {}
        }
    }

    Ok(segments)
}
