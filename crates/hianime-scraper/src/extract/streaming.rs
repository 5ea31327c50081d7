//! Streaming link of an episode page.
//!
//! The player data is embedded as a script variable (`var streaming = {...}`
//! or `var sources = [...]`). Pages without it fall back to a `<video>`
//! source and then to an `<iframe>` player.

use serde_json::Value;
use shared::models::{StreamingLink, SubtitleTrack, TimeRange};
use tracing::debug;

use super::selectors::*;
use super::{attr, first, item, parse, ExtractError, PageExtractor};

const DEFAULT_LINK_TYPE: &str = "hls";

#[derive(Debug, Clone, Default)]
pub struct StreamingExtractor {
    /// Server the caller asked for, echoed in the output
    pub server: Option<String>,
}

impl StreamingExtractor {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: Some(server.into()),
        }
    }
}

impl PageExtractor for StreamingExtractor {
    type Output = StreamingLink;

    fn extract(&self, html: &str) -> StreamingLink {
        let document = parse(html);
        let root = document.root_element();
        let mut link = StreamingLink {
            server: self.server.clone(),
            ..Default::default()
        };

        for script in root.select(&SCRIPT) {
            let body: String = script.text().collect();
            if let Some(data) = player_data(&body) {
                apply_player_data(&mut link, data);
                break;
            }
        }

        if link.link.file.is_none() {
            if let Some(source) = first(root, &VIDEO_SOURCE) {
                link.link.file = attr(source, "src");
                link.link.file_type =
                    Some(attr(source, "type").unwrap_or_else(|| DEFAULT_LINK_TYPE.to_string()));
            }
        }

        if link.iframe.is_none() {
            link.iframe = first(root, &IFRAME).and_then(|iframe| attr(iframe, "src"));
        }

        link
    }
}

/// Decode the first player variable found in a script body
fn player_data(script: &str) -> Option<Value> {
    let captures = STREAMING_VAR
        .captures(script)
        .or_else(|| SOURCES_VAR.captures(script))?;
    let raw = captures.get(1)?.as_str();

    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(error = %e, "Player variable is not valid JSON");
            None
        }
    }
}

fn apply_player_data(link: &mut StreamingLink, data: Value) {
    match data {
        Value::Object(map) => {
            if let Some(source) = map.get("sources").and_then(|s| s.as_array()).and_then(|s| s.first()) {
                apply_source(link, source);
            }
            if let Some(tracks) = map.get("tracks").and_then(|t| t.as_array()) {
                link.tracks = tracks
                    .iter()
                    .enumerate()
                    .filter_map(|(i, track)| item("tracks", i, || subtitle_track(track)))
                    .collect();
            }
            if let Some(intro) = map.get("intro") {
                link.intro = time_range(intro);
            }
            if let Some(outro) = map.get("outro") {
                link.outro = time_range(outro);
            }
            if let Some(server) = map.get("server").and_then(scalar) {
                link.server = Some(server);
            }
            if let Some(iframe) = map.get("iframe").and_then(scalar) {
                link.iframe = Some(iframe);
            }
            if let Some(id) = map.get("id").and_then(scalar) {
                link.id = Some(id);
            }
            if let Some(stream_type) = map.get("type").and_then(scalar) {
                link.stream_type = Some(stream_type);
            }
        }
        Value::Array(sources) => {
            if let Some(source) = sources.first() {
                apply_source(link, source);
            }
        }
        _ => {}
    }
}

fn apply_source(link: &mut StreamingLink, source: &Value) {
    link.link.file = source.get("file").and_then(scalar);
    link.link.file_type = Some(
        source
            .get("type")
            .and_then(scalar)
            .unwrap_or_else(|| DEFAULT_LINK_TYPE.to_string()),
    );
}

fn subtitle_track(track: &Value) -> Result<SubtitleTrack, ExtractError> {
    if !track.is_object() {
        return Err(ExtractError::InvalidTrack(track.to_string()));
    }
    serde_json::from_value(track.clone()).map_err(|e| ExtractError::InvalidTrack(e.to_string()))
}

fn time_range(value: &Value) -> TimeRange {
    TimeRange {
        start: value.get("start").and_then(seconds),
        end: value.get("end").and_then(seconds),
    }
}

fn seconds(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
        .and_then(|n| u32::try_from(n).ok())
}

/// Strings and numbers as text; anything else is ignored
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_default() {
        assert_eq!(StreamingExtractor::default().extract(""), StreamingLink::default());
    }

    #[test]
    fn test_streaming_variable() {
        let html = r#"<html><body><script>
            var player = null;
            var streaming = {
                "id": 12352,
                "type": "sub",
                "sources": [{"file": "https://cdn/master.m3u8"}],
                "tracks": [
                    {"file": "https://cdn/en.vtt", "label": "English", "kind": "captions", "default": true},
                    "https://cdn/broken.vtt",
                    {"file": "https://cdn/thumbs.vtt", "kind": "thumbnails"}
                ],
                "intro": {"start": 31, "end": 121},
                "outro": {"start": 1300.5, "end": 1390}
            };
        </script></body></html>"#;

        let link = StreamingExtractor::new("HD-1").extract(html);
        assert_eq!(link.id.as_deref(), Some("12352"));
        assert_eq!(link.stream_type.as_deref(), Some("sub"));
        assert_eq!(link.link.file.as_deref(), Some("https://cdn/master.m3u8"));
        assert_eq!(link.link.file_type.as_deref(), Some("hls"));
        assert_eq!(link.server.as_deref(), Some("HD-1"));

        // The bare string track is skipped
        assert_eq!(link.tracks.len(), 2);
        assert_eq!(link.tracks[0].label.as_deref(), Some("English"));
        assert!(link.tracks[0].default);
        assert_eq!(link.tracks[1].kind.as_deref(), Some("thumbnails"));

        assert_eq!(link.intro, TimeRange { start: Some(31), end: Some(121) });
        assert_eq!(link.outro.start, Some(1300));
    }

    #[test]
    fn test_sources_array() {
        let html = r#"<script>var sources = [{"file": "https://cdn/a.mp4", "type": "mp4"}];</script>"#;
        let link = StreamingExtractor::default().extract(html);
        assert_eq!(link.link.file.as_deref(), Some("https://cdn/a.mp4"));
        assert_eq!(link.link.file_type.as_deref(), Some("mp4"));
    }

    #[test]
    fn test_video_and_iframe_fallbacks() {
        let html = r#"<html><body>
            <script>var streaming = {not json};</script>
            <video><source src="https://cdn/fallback.m3u8"></video>
            <iframe src="https://megacloud/embed/1"></iframe>
        </body></html>"#;

        let link = StreamingExtractor::new("HD-2").extract(html);
        assert_eq!(link.link.file.as_deref(), Some("https://cdn/fallback.m3u8"));
        assert_eq!(link.link.file_type.as_deref(), Some("hls"));
        assert_eq!(link.iframe.as_deref(), Some("https://megacloud/embed/1"));
        assert_eq!(link.server.as_deref(), Some("HD-2"));
    }
}
