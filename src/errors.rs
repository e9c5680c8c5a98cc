use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RabotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration loading error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(
        "LLM API key not found. Set GROQ_API_KEY (or RABOT__LLM__API_KEY) in the environment or a .env file"
    )]
    MissingApiKey,

    #[error("Vector index not found at {}. Run `rabot index` first to build it", .0.display())]
    IndexNotFound(PathBuf),

    #[error("Vector index error: {0}")]
    IndexError(String),

    #[error("Document error: {0}")]
    DocumentError(String),

    #[error("Document archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Document XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Embedding error: {0}")]
    EmbeddingError(String),

    #[error("{0}")]
    Custom(String),
}

impl From<reqwest::Error> for RabotError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl RabotError {
    /// Configuration failures are fatal at startup; everything else belongs to a single request.
    #[must_use]
    pub const fn is_startup_fatal(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::ConfigError(_)
                | Self::MissingApiKey
                | Self::IndexNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RabotError>;
