//! Wire types of the YouTube endpoints and tools this crate talks to.

use serde::Deserialize;

/// Subset of the innertube `/youtubei/v1/player` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub playability_status: Option<PlayabilityStatus>,
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
pub struct PlayabilityStatus {
    pub status: String,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    pub player_captions_tracklist_renderer: Option<CaptionTracklist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTracklist {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `Some("asr")` for auto-generated tracks
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// A `timedtext` document in `fmt=json3`
#[derive(Debug, Deserialize)]
pub struct Json3Captions {
    #[serde(default)]
    pub events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Json3Event {
    #[serde(default)]
    pub t_start_ms: u64,
    #[serde(default)]
    pub d_duration_ms: u64,
    pub segs: Option<Vec<Json3Segment>>,
}

#[derive(Debug, Deserialize)]
pub struct Json3Segment {
    #[serde(default)]
    pub utf8: String,
}

/// Fields read from `yt-dlp --dump-single-json`
#[derive(Debug, Deserialize)]
pub struct YtDlpInfo {
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub thumbnail: Option<String>,
}

/// Response of `https://www.youtube.com/oembed`
#[derive(Debug, Deserialize)]
pub struct OEmbedResponse {
    pub title: Option<String>,
    pub author_name: Option<String>,
    pub thumbnail_url: Option<String>,
}
