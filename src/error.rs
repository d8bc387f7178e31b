// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TrackingError>;

#[derive(Debug, Error)]
pub enum TrackingError {
    /// The detector handed over a hand that does not follow the 21-point topology.
    #[error("expected {expected} hand landmarks, found {found}")]
    LandmarkCount { expected: usize, found: usize },

    #[error("landmark {index} has a non-finite coordinate")]
    NonFiniteLandmark { index: usize },

    #[error("invalid tracker config: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}
