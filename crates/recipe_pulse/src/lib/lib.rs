mod error;
mod llm;
pub mod parser;
mod processor;
pub mod settings;
pub mod tracing;
pub mod types;
pub mod yt;

pub use error::Error;
pub use llm::openai;
pub use llm::extractor::{recipe_input, RecipeExtractor};
pub use processor::{builder::RecipeProcessorBuilder, ProcessError, RecipeProcessor};
pub use recipe_schema;
