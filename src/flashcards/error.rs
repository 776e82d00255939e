use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Set not found: {0}")]
    SetNotFound(String),

    #[error("Set already exists: {0}")]
    SetExists(String),

    #[error("Card not found: {0}")]
    CardNotFound(String),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),

    #[error("Invalid rating: {0:?} (expected again, hard or good)")]
    InvalidRating(String),

    #[error("Invalid schedule state for card {card_id}: {reason}")]
    InvalidState { card_id: String, reason: String },

    #[error("Invalid study settings: {0}")]
    InvalidSettings(String),

    #[error("Scheduler is disabled in study settings")]
    SchedulerDisabled,

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
