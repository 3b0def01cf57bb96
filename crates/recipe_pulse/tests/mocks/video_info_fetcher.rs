use std::sync::{Arc, Mutex};

use recipe_pulse::{recipe_schema::VideoInfo, yt::VideoInfoFetcher};

#[derive(Clone)]
pub struct MockVideoInfoFetcher {
    pub info: VideoInfo,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockVideoInfoFetcher {
    pub fn new(title: &str, author: &str, thumbnail_url: &str) -> Self {
        Self {
            info: VideoInfo {
                title: title.to_string(),
                author: author.to_string(),
                thumbnail_url: thumbnail_url.to_string(),
            },
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("", "", "")
        }
    }
}

impl VideoInfoFetcher for MockVideoInfoFetcher {
    type Error = anyhow::Error;

    async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo, Self::Error> {
        self.calls.lock().unwrap().push(video_id.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.info.clone())
    }
}
