use std::{path::PathBuf, process::Stdio};

use recipe_schema::VideoInfo;
use reqwest::Client;
use tokio::process::Command;

use crate::{
    types::{OEmbedResponse, YtDlpInfo},
    yt::{watch_url, VideoInfoFetcher, YOUTUBE_BASE_URL},
};

#[derive(Debug, thiserror::Error)]
pub enum VideoInfoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yt-dlp exited with {status}: {stderr}")]
    YtDlp { status: String, stderr: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

/// Metadata extraction by shelling out to `yt-dlp` without downloading media
#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl Default for YtDlp {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn args(url: &str) -> [&str; 6] {
        [
            "--dump-single-json",
            "--skip-download",
            "--no-playlist",
            "--quiet",
            "--no-warnings",
            url,
        ]
    }
}

impl VideoInfoFetcher for YtDlp {
    type Error = VideoInfoError;

    #[tracing::instrument(skip(self))]
    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo, Self::Error> {
        let url = watch_url(video_id);

        let output = Command::new(&self.binary)
            .args(Self::args(&url))
            .stdin(Stdio::null())
            .output()
            .await
            .inspect_err(|e| {
                tracing::error!(error = %e, binary = ?self.binary, "Failed to run yt-dlp")
            })?;

        if !output.status.success() {
            return Err(VideoInfoError::YtDlp {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let info = serde_json::from_slice::<YtDlpInfo>(&output.stdout)?;
        Ok(info.into())
    }
}

impl From<YtDlpInfo> for VideoInfo {
    fn from(info: YtDlpInfo) -> Self {
        VideoInfo {
            title: info.title.unwrap_or_default(),
            author: info.uploader.unwrap_or_default(),
            thumbnail_url: info.thumbnail.unwrap_or_default(),
        }
    }
}

/// Metadata lookup through YouTube's oEmbed endpoint; needs no local tooling
#[derive(Debug, Clone)]
pub struct OEmbed {
    client: Client,
    base_url: String,
}

impl Default for OEmbed {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl OEmbed {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl VideoInfoFetcher for OEmbed {
    type Error = VideoInfoError;

    #[tracing::instrument(skip(self))]
    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo, Self::Error> {
        let resp = self
            .client
            .get(format!("{}/oembed", self.base_url))
            .query(&[("url", watch_url(video_id).as_str()), ("format", "json")])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(VideoInfoError::Api { status, message });
        }

        Ok(resp.json::<OEmbedResponse>().await?.into())
    }
}

impl From<OEmbedResponse> for VideoInfo {
    fn from(oembed: OEmbedResponse) -> Self {
        VideoInfo {
            title: oembed.title.unwrap_or_default(),
            author: oembed.author_name.unwrap_or_default(),
            thumbnail_url: oembed.thumbnail_url.unwrap_or_default(),
        }
    }
}

/// Runtime selection between the metadata sources
#[derive(Debug, Clone)]
pub enum VideoInfoBackend {
    YtDlp(YtDlp),
    OEmbed(OEmbed),
}

impl VideoInfoFetcher for VideoInfoBackend {
    type Error = VideoInfoError;

    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo, Self::Error> {
        match self {
            VideoInfoBackend::YtDlp(yt_dlp) => yt_dlp.fetch_video_info(video_id).await,
            VideoInfoBackend::OEmbed(oembed) => oembed.fetch_video_info(video_id).await,
        }
    }
}
