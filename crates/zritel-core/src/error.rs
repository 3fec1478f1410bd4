use thiserror::Error;

#[derive(Error, Debug)]
pub enum ZritelError {
    #[error("Invalid clock timestamp: {text:?}")]
    InvalidClock { text: String },

    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("Generation endpoint returned {status}")]
    HttpFailed { status: reqwest::StatusCode },

    #[error("Structured analysis missing required fields: {}", .missing.join(", "))]
    MissingFields { missing: Vec<String> },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ZritelError>;
