//! Read and write contracts for the song catalog and user feedback.
//!
//! The recommender depends only on these traits, so any storage backend can
//! supply the snapshots it works on.
use crate::{
    error::AppResult,
    models::{Feedback, Song, SongId, UserId},
};

/// Read-only access to the song catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SongCatalog: Send + Sync {
    /// Every song, in catalog order
    async fn all_songs(&self) -> AppResult<Vec<Song>>;

    /// Songs whose subgenre matches after case normalization, in catalog order
    async fn songs_in_subgenre(&self, subgenre: &str) -> AppResult<Vec<Song>>;

    async fn song(&self, id: SongId) -> AppResult<Option<Song>>;

    /// First song in catalog order whose title contains `query`, ignoring case
    async fn find_by_title(&self, query: &str) -> AppResult<Option<Song>>;
}

/// Read-only access to recorded feedback
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackSource: Send + Sync {
    /// All feedback rows of one user, including superseded ones
    async fn feedback_for(&self, user_id: UserId) -> AppResult<Vec<Feedback>>;
}

/// Destination for new quiz answers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, feedback: Feedback) -> AppResult<()>;
}
