use crate::models::SongId;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Seed song not found: {0}")]
    SeedNotFound(SongId),

    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not enough songs in catalog: requested {requested}, available {available}")]
    NotEnoughSongs { requested: usize, available: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error was caused by the caller rather than by the data sources
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::SeedNotFound(_)
                | AppError::SongNotFound(_)
                | AppError::InvalidInput(_)
                | AppError::NotEnoughSongs { .. }
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
