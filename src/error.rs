//! Error types for unisearch.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid highlight pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("terminal error: {0}")]
    Terminal(String),

    #[error("search failed: {0}")]
    SearchFailed(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// Short machine-readable code used by robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::Io(_) => "io",
            Self::Json(_) | Self::Serialization(_) => "serialization",
            Self::Transport(_) => "transport",
            Self::Backend { .. } => "backend",
            Self::InvalidPattern(_) => "invalid_pattern",
            Self::Terminal(_) => "terminal",
            Self::SearchFailed(_) => "search_failed",
        }
    }

    /// Whether the error came from talking to the search backend.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Backend { .. })
    }
}
