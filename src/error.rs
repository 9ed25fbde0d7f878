//! Error type shared by the tracker and the pipeline collaborators.

/// Errors raised while processing a frame job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Frame does not have the fixed `(height, width, channels)` shape.
    #[error("invalid frame shape: expected {expected:?}, got {got:?}")]
    InvalidFrameShape {
        expected: (usize, usize, usize),
        got: (usize, usize, usize),
    },

    /// Detector answered with a payload missing required fields.
    #[error("malformed detection response: {0}")]
    MalformedResponse(String),

    /// Persisted tracker snapshot violates a tracker invariant.
    #[error("invalid tracker snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("detector request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "redis-store")]
    #[error(transparent)]
    Redis(#[from] redis::RedisError),

    #[cfg(feature = "sqlite-store")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Generic storage failure raised by a collaborator implementation.
    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
