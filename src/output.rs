//! HTML pages for the web UI.

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::pipeline::Outcome;
use crate::summarize::Mode;
use crate::{Error, VideoId, thumbnail_url};

const STYLE: &str = r#"
body { font-family: 'Helvetica Neue', sans-serif; margin: 0; display: flex; }
aside { width: 260px; padding: 20px; background-color: #f8f9fa; min-height: 100vh; }
main { flex: 1; padding: 20px 40px; }
.main-header { text-align: center; padding: 20px; background-color: #f0f2f6; border-radius: 10px; margin-bottom: 30px; }
input[type=text] { width: 100%; padding: 10px; box-sizing: border-box; }
button { width: 100%; border-radius: 20px; height: 3em; font-weight: bold; }
.video-info { padding: 15px; background-color: #f8f9fa; border-radius: 10px; margin-bottom: 20px; }
.summary-box { padding: 20px; border-radius: 10px; background-color: #ffffff; box-shadow: 0 2px 4px rgba(0,0,0,0.1); white-space: pre-wrap; }
.warning { padding: 12px; border-radius: 8px; background-color: #fff3cd; }
.error { padding: 12px; border-radius: 8px; background-color: #f8d7da; }
img.thumb { max-width: 480px; width: 100%; }
"#;

/// What the page shows below the input form
pub enum Notice<'a> {
    None,
    Preview(&'a VideoId),
    Invalid,
}

/// Landing page: form, optional preview of the entered video
pub fn render_index(url: &str, mode: Mode, notice: Notice<'_>) -> String {
    let body = match notice {
        Notice::None => String::new(),
        Notice::Preview(video_id) => render_preview(video_id, url, mode),
        Notice::Invalid => render_warning("Please enter a valid YouTube URL"),
    };
    page(url, mode, &body)
}

/// Result page for a finished request
pub fn render_outcome(url: &str, mode: Mode, outcome: &Outcome) -> String {
    let mut body = String::new();
    if let Some(video_id) = outcome.video_id() {
        body.push_str(&render_thumbnail(video_id));
    }

    match outcome {
        Outcome::SummaryReady(summary) => {
            body.push_str(&format!(
                "<div class=\"summary-box\"><h3>📝 {}</h3>{}</div>",
                text(summary.mode.label()),
                text(&summary.text)
            ));
        }
        Outcome::TranscriptFailed { error, .. } | Outcome::SummaryFailed { error, .. } => {
            body.push_str(&render_error(error));
        }
    }
    page(url, mode, &body)
}

fn render_error(error: &Error) -> String {
    if error.is_user_error() {
        return render_warning("Please enter a valid YouTube URL");
    }
    let heading = match error {
        Error::Generation { .. } => "Error generating summary",
        _ => "Error",
    };
    format!(
        "<div class=\"error\" data-code=\"{}\"><strong>{heading}:</strong> {}</div>",
        error.code(),
        text(&error.to_string())
    )
}

fn render_warning(message: &str) -> String {
    format!("<div class=\"warning\">{}</div>", text(message))
}

fn render_thumbnail(video_id: &VideoId) -> String {
    format!(
        "<h3>📺 Video Preview</h3><img class=\"thumb\" src=\"{}\" alt=\"thumbnail\">",
        attr(&thumbnail_url(video_id))
    )
}

fn render_preview(video_id: &VideoId, url: &str, mode: Mode) -> String {
    format!(
        "{}<div class=\"video-info\"><form method=\"post\" action=\"/summarize\">\
         <input type=\"hidden\" name=\"url\" value=\"{}\">\
         <input type=\"hidden\" name=\"mode\" value=\"{}\">\
         <button type=\"submit\">🔍 Analyze Video</button></form></div>",
        render_thumbnail(video_id),
        attr(url),
        mode.as_str()
    )
}

fn render_mode_choices(selected: Mode) -> String {
    Mode::ALL
        .iter()
        .map(|mode| {
            let checked = if *mode == selected { " checked" } else { "" };
            format!(
                "<label><input type=\"radio\" name=\"mode\" value=\"{}\"{checked}> {}</label><br>",
                mode.as_str(),
                mode.label()
            )
        })
        .collect()
}

fn page(url: &str, mode: Mode, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>YouTube Video Summarizer</title>
<style>{STYLE}</style>
</head>
<body>
<aside>
<form id="settings" method="get" action="/">
<h3>⚙️ Settings</h3>
<p>Choose Summary Type</p>
{modes}
</form>
<h3>💡 Tips</h3>
<ul>
<li>Paste any YouTube video URL</li>
<li>Works best with educational content</li>
<li>Supports multiple URL formats</li>
<li>Choose between quick or detailed summary</li>
</ul>
</aside>
<main>
<div class="main-header"><h1>🎥 YouTube Video/Lectures Summarizer</h1><p>Transform lengthy videos into concise, actionable summaries</p></div>
<label for="url">Enter YouTube Video Link:</label>
<input type="text" id="url" name="url" form="settings" value="{url}" placeholder="https://www.youtube.com/watch?v=...">
<button type="submit" form="settings">Load Video</button>
{body}
</main>
</body>
</html>
"#,
        modes = render_mode_choices(mode),
        url = attr(url),
    )
}
