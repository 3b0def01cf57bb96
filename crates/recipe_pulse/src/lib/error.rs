#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}
