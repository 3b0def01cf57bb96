use crate::{
    llm::extractor::RecipeExtractor,
    processor::with_fallback_language,
    yt::{TranscriptFetcher, VideoInfoFetcher},
    RecipeProcessor,
};

pub struct RecipeProcessorBuilder<T = (), V = (), E = ()> {
    transcript_fetcher: T,
    video_info_fetcher: V,
    extractor: E,
    preferred_languages: Vec<String>,
}

impl Default for RecipeProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecipeProcessorBuilder {
    pub fn new() -> Self {
        Self {
            transcript_fetcher: (),
            video_info_fetcher: (),
            extractor: (),
            preferred_languages: Vec::new(),
        }
    }
}

impl<T, V, E> RecipeProcessorBuilder<T, V, E> {
    pub fn transcript_fetcher<T2: TranscriptFetcher>(
        self,
        transcript_fetcher: T2,
    ) -> RecipeProcessorBuilder<T2, V, E> {
        RecipeProcessorBuilder {
            transcript_fetcher,
            video_info_fetcher: self.video_info_fetcher,
            extractor: self.extractor,
            preferred_languages: self.preferred_languages,
        }
    }

    pub fn video_info_fetcher<V2: VideoInfoFetcher>(
        self,
        video_info_fetcher: V2,
    ) -> RecipeProcessorBuilder<T, V2, E> {
        RecipeProcessorBuilder {
            transcript_fetcher: self.transcript_fetcher,
            video_info_fetcher,
            extractor: self.extractor,
            preferred_languages: self.preferred_languages,
        }
    }

    pub fn extractor<E2: RecipeExtractor>(self, extractor: E2) -> RecipeProcessorBuilder<T, V, E2> {
        RecipeProcessorBuilder {
            transcript_fetcher: self.transcript_fetcher,
            video_info_fetcher: self.video_info_fetcher,
            extractor,
            preferred_languages: self.preferred_languages,
        }
    }

    /// Transcript languages in order of preference. English is always tried
    /// last.
    pub fn preferred_languages(mut self, languages: Vec<String>) -> Self {
        self.preferred_languages = languages;
        self
    }
}

impl<T, V, E> RecipeProcessorBuilder<T, V, E>
where
    T: TranscriptFetcher,
    V: VideoInfoFetcher,
    E: RecipeExtractor,
{
    pub fn build(self) -> RecipeProcessor<T, V, E> {
        RecipeProcessor {
            transcript_fetcher: self.transcript_fetcher,
            video_info_fetcher: self.video_info_fetcher,
            extractor: self.extractor,
            languages: with_fallback_language(self.preferred_languages),
        }
    }
}
