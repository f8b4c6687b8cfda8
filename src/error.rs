use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Input file not found: {path}")]
    MissingInput { path: String },

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Embedding for '{slug}' has {actual} dimensions, expected {expected}")]
    EmbeddingShape {
        slug: String,
        expected: usize,
        actual: usize,
    },

    #[error("Encoder error: {0}")]
    Encoder(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
