pub mod builder;

use itertools::Itertools;
use recipe_schema::{BaseRecipe, Recipe, VideoInfo};

use crate::{
    llm::extractor::RecipeExtractor,
    yt::{TranscriptFetcher, VideoInfoFetcher},
};

/// Caption language always tried after the configured ones
pub const FALLBACK_LANGUAGE: &str = "en";

/// Why a run produced no recipe. The display text is the message shown to
/// the user; `reason` carries the underlying error.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Failed to retrieve transcript.")]
    Transcript { reason: String },
    #[error("Failed to retrieve video information.")]
    VideoInfo { reason: String },
    #[error("Failed to extract recipe")]
    Extraction { reason: String },
}

// Turns a YouTube cooking video into a schema.org recipe
pub struct RecipeProcessor<T, V, E>
where
    T: TranscriptFetcher,
    V: VideoInfoFetcher,
    E: RecipeExtractor,
{
    transcript_fetcher: T,
    video_info_fetcher: V,
    extractor: E,
    languages: Vec<String>,
}

impl<T, V, E> RecipeProcessor<T, V, E>
where
    T: TranscriptFetcher,
    V: VideoInfoFetcher,
    E: RecipeExtractor,
{
    /// Languages requested from the caption service, in order
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Fetches the transcript and flattens it into a single string
    #[tracing::instrument(skip(self))]
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<String, ProcessError> {
        let transcript = self
            .transcript_fetcher
            .fetch_transcript(video_id, &self.languages)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Error fetching transcript"))
            .map_err(|e| ProcessError::Transcript {
                reason: format!("{e:?}"),
            })?;

        if transcript.is_empty() {
            tracing::error!(language = %transcript.language_code, "Transcript has no entries");
            return Err(ProcessError::Transcript {
                reason: "transcript has no entries".into(),
            });
        }

        Ok(transcript.to_text())
    }

    #[tracing::instrument(skip(self))]
    pub async fn fetch_video_info(&self, video_id: &str) -> Result<VideoInfo, ProcessError> {
        self.video_info_fetcher
            .fetch_video_info(video_id)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Error fetching video info"))
            .map_err(|e| ProcessError::VideoInfo {
                reason: format!("{e:?}"),
            })
    }

    #[tracing::instrument(skip(self, transcript), fields(transcript_len = transcript.len()))]
    pub async fn extract_recipe(
        &self,
        title: &str,
        transcript: &str,
    ) -> Result<BaseRecipe, ProcessError> {
        self.extractor
            .extract_recipe(title, transcript)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Error extracting recipe"))
            .map_err(|e| ProcessError::Extraction {
                reason: format!("{e:?}"),
            })
    }

    /// Runs transcript → metadata → extraction → assembly, stopping at the
    /// first failure
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, video_id: &str) -> Result<Recipe, ProcessError> {
        let transcript = self.fetch_transcript(video_id).await?;
        let video_info = self.fetch_video_info(video_id).await?;

        tracing::info!(title = %video_info.title, "Extracting recipe");
        let base_recipe = self.extract_recipe(&video_info.title, &transcript).await?;

        Ok(Recipe::from_base_recipe(base_recipe, &video_info))
    }
}

/// Appends the fallback language unless it is already requested
pub(crate) fn with_fallback_language(preferred: Vec<String>) -> Vec<String> {
    preferred
        .into_iter()
        .chain(std::iter::once(FALLBACK_LANGUAGE.to_string()))
        .unique()
        .collect()
}
