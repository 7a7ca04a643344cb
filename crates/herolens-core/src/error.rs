//! Error types for HeroLens

/// Result type alias using HeroLens's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for HeroLens operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Artifact download errors (network failure or non-success status)
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The artifact can only be loaded on an accelerator.
    ///
    /// Carries the operator-facing remediation text, not the backend message.
    #[error("{0}")]
    IncompatibleArtifact(String),

    /// Any other model deserialization failure, with the backend text unchanged
    #[error("{0}")]
    ModelLoad(String),

    /// Uploaded bytes could not be decoded as an image
    #[error("decode error: {0}")]
    Decode(String),

    /// Tensor construction or forward pass errors
    #[error("inference error: {0}")]
    Inference(String),

    /// Chart drawing or rasterization errors
    #[error("render error: {0}")]
    Render(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new fetch error
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Create a new model load error
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoad(msg.into())
    }

    /// Create a new decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a new inference error
    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    /// Create a new render error
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
