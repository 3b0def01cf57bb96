pub mod recipe_extractor;
pub mod transcript_fetcher;
pub mod video_info_fetcher;
