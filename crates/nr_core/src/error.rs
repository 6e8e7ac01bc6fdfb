use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    CounterIndex(#[from] CounterIndexError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

/// Failure of a single article fetch. Transport and status failures are both
/// transport-class errors; a body that is not the expected JSON is a decode
/// error.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub fn is_transport(&self) -> bool {
        matches!(self, FetchError::Transport(_) | FetchError::Status { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }
}

/// A view counter was addressed outside the current page. This is a broken
/// caller contract, not a user-facing condition.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("view counter index {index} out of bounds for {len} counters")]
pub struct CounterIndexError {
    pub index: usize,
    pub len: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("page size must be at least 1")]
    ZeroPageSize,

    #[error("search query must not be empty")]
    EmptyQuery,

    #[error("date range start {from} is after end {to}")]
    InvertedDateRange { from: String, to: String },

    #[error("invalid endpoint {0}")]
    InvalidEndpoint(String),
}

pub type Result<T> = std::result::Result<T, Error>;
