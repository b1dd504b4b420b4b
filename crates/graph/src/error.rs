use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// Two records merged under one identifier disagree on the identifier itself
    #[error("Identifier mismatch: expected `{expected}`, found `{found}`")]
    IdentifierMismatch { expected: String, found: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Model error: {0}")]
    Model(#[from] symgraph_model::ModelError),
}

impl GraphError {
    pub fn identifier_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::IdentifierMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
