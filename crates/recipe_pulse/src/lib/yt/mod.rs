pub mod transcript;
pub mod video_info;

use std::{fmt::Debug, future::Future};

use itertools::Itertools;
use recipe_schema::VideoInfo;

pub const YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Canonical watch page of a video
pub fn watch_url(video_id: &str) -> String {
    format!("{YOUTUBE_BASE_URL}/watch?v={video_id}")
}

pub trait TranscriptFetcher {
    type Error: Debug;

    /// Fetches the best matching caption track for `video_id`.
    ///
    /// `languages` is tried in order; the first language with a track wins.
    fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> impl Future<Output = Result<FetchedTranscript, Self::Error>>;
}

pub trait VideoInfoFetcher {
    type Error: Debug;

    fn fetch_video_info(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoInfo, Self::Error>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    /// seconds from the start of the video
    pub start: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTranscript {
    pub video_id: String,
    pub language_code: String,
    pub is_generated: bool,
    pub entries: Vec<TranscriptEntry>,
}

impl FetchedTranscript {
    /// All caption texts joined by a single space, in their original order
    pub fn to_text(&self) -> String {
        self.entries.iter().map(|e| e.text.as_str()).join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
