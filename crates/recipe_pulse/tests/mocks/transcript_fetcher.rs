use std::sync::{Arc, Mutex};

use recipe_pulse::yt::{FetchedTranscript, TranscriptEntry, TranscriptFetcher};

#[derive(Clone)]
pub struct MockTranscriptFetcher {
    pub texts: Vec<String>,
    /// (video_id, languages) of every call
    pub calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    pub fail_with: Option<String>,
}

impl MockTranscriptFetcher {
    pub fn new(texts: &[&str]) -> Self {
        Self {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(&[])
        }
    }
}

impl TranscriptFetcher for MockTranscriptFetcher {
    type Error = anyhow::Error;

    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<FetchedTranscript, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), languages.to_vec()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language_code: languages.first().cloned().unwrap_or_default(),
            is_generated: false,
            entries: self
                .texts
                .iter()
                .enumerate()
                .map(|(i, text)| TranscriptEntry {
                    text: text.clone(),
                    start: i as f64 * 2.0,
                    duration: 2.0,
                })
                .collect(),
        })
    }
}
