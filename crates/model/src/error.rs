use thiserror::Error;

/// Result type for symbol graph model operations
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while decoding or encoding a symbol graph
#[derive(Error, Debug)]
pub enum ModelError {
    /// The document is not valid JSON or does not have the graph shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A symbol record is structurally unusable
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// A registered mixin could not be decoded from its value
    #[error("Invalid mixin `{key}`: {message}")]
    InvalidMixin { key: String, message: String },
}

impl ModelError {
    /// Create an invalid symbol error
    pub fn invalid_symbol(msg: impl Into<String>) -> Self {
        Self::InvalidSymbol(msg.into())
    }

    /// Create an invalid mixin error
    pub fn invalid_mixin(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::InvalidMixin {
            key: key.into(),
            message: msg.into(),
        }
    }
}
