use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("snapshot I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt snapshot: {reason}")]
    CorruptSnapshot { reason: String },

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("no article matches '{query}'")]
    NoMatchFound { query: String },

    #[error("title hydration failed: {0}")]
    Hydration(String),
}

impl GraphError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        GraphError::CorruptSnapshot {
            reason: reason.into(),
        }
    }
}
