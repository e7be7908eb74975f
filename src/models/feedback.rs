use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SongId, UserId};

/// One like/dislike answer given by a user.
///
/// A user may answer the same song several times; the row with the latest
/// `created_at` is authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feedback {
    pub user_id: UserId,
    pub song_id: SongId,
    pub liked: bool,
    #[serde(default = "chrono::Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Feedback {
    pub fn new(user_id: UserId, song_id: SongId, liked: bool) -> Self {
        Self {
            user_id,
            song_id,
            liked,
            created_at: Utc::now(),
        }
    }
}

/// Answer to a quiz question
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QuizAnswer {
    Like,
    Dislike,
    /// Neither liked nor disliked; never stored and never scored
    Skip,
}

impl QuizAnswer {
    /// Converts the answer into a feedback row, `None` for a skip
    pub fn into_feedback(self, user_id: UserId, song_id: SongId) -> Option<Feedback> {
        match self {
            QuizAnswer::Like => Some(Feedback::new(user_id, song_id, true)),
            QuizAnswer::Dislike => Some(Feedback::new(user_id, song_id, false)),
            QuizAnswer::Skip => None,
        }
    }
}
