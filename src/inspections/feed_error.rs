use thiserror::Error;

/// Failures at one cascade stage. None of these are fatal: the stage that
/// hits one yields zero rows and the cascade moves on.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("decode error: {0}")]
    Decode(String),
    #[error("cannot encode query: {0}")]
    Encoding(String),
}
