use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The font resources backing the document could not be loaded. Fatal for
    /// the render call; no document bytes are produced.
    #[error("font resources unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("invalid resume data: {0}")]
    InvalidResume(String),
}
