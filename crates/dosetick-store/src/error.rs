use thiserror::Error;

/// Errors that can occur within the medication store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite / rusqlite error.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// No medication with the given ID exists.
    #[error("Medication not found: {id}")]
    NotFound { id: String },

    /// The scheduled time is not a valid `HH:MM` value.
    #[error("Invalid time: {0}")]
    InvalidTime(String),

    /// A weekday restriction was supplied but empty.
    #[error("Day restriction must name at least one day")]
    EmptyDays,

    /// The weekday list could not be encoded/decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
