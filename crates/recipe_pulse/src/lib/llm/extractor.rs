use std::{fmt::Debug, future::Future};

use recipe_schema::BaseRecipe;

pub trait RecipeExtractor {
    type Error: Debug;

    /// Extracts a structured recipe from a video title and its transcript
    fn extract_recipe(
        &self,
        title: &str,
        transcript: &str,
    ) -> impl Future<Output = Result<BaseRecipe, Self::Error>>;
}

/// The user message sent alongside the extraction instructions
pub fn recipe_input(title: &str, transcript: &str) -> String {
    format!("Title: {title}\nTranscript: {transcript}")
}
