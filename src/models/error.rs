use thiserror::Error;

#[derive(Error, Debug)]
pub enum TierScoreError {
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Store error during {operation}: {message}")]
    StoreError { operation: String, message: String },

    #[error("Stored score for member {id} changed since it was read")]
    StaleRecord { id: String },

    #[error("Member not found: {0}")]
    MemberNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, TierScoreError>;
