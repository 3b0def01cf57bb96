pub mod extractor;
pub mod openai;
