use std::collections::HashSet;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{Feedback, QuizAnswer, Song, SongId, UserId},
    services::{FeedbackSink, FeedbackSource, SongCatalog},
};

/// Picks quiz questions and records the answers
pub struct QuizService {
    catalog: Arc<dyn SongCatalog>,
    feedback: Arc<dyn FeedbackSource>,
    sink: Arc<dyn FeedbackSink>,
    min_len: usize,
    max_len: usize,
    default_len: usize,
}

impl QuizService {
    pub fn new(
        catalog: Arc<dyn SongCatalog>,
        feedback: Arc<dyn FeedbackSource>,
        sink: Arc<dyn FeedbackSink>,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            feedback,
            sink,
            min_len: config.quiz_min,
            max_len: config.quiz_max,
            default_len: config.quiz_default,
        }
    }

    /// Random quiz songs, preferring songs the user has not rated yet.
    ///
    /// When fewer than `n` unrated songs remain, all of them are returned
    /// first, followed by a random sample of already rated songs.
    pub async fn quiz_songs<R: Rng + Send>(
        &self,
        user_id: UserId,
        n: Option<usize>,
        rng: &mut R,
    ) -> AppResult<Vec<Song>> {
        let n = n.unwrap_or(self.default_len);
        if n < self.min_len || n > self.max_len {
            return Err(AppError::InvalidInput(format!(
                "quiz length must be between {} and {}, got {}",
                self.min_len, self.max_len, n
            )));
        }

        let songs = self.catalog.all_songs().await?;
        if songs.len() < n {
            return Err(AppError::NotEnoughSongs {
                requested: n,
                available: songs.len(),
            });
        }

        let rated: HashSet<SongId> = self
            .feedback
            .feedback_for(user_id)
            .await?
            .into_iter()
            .map(|row| row.song_id)
            .collect();
        let (rated, unrated): (Vec<Song>, Vec<Song>) =
            songs.into_iter().partition(|song| rated.contains(&song.id));

        tracing::debug!(
            user_id = %user_id,
            rated = rated.len(),
            unrated = unrated.len(),
            "Selecting quiz songs"
        );

        if unrated.len() >= n {
            return Ok(unrated.choose_multiple(rng, n).cloned().collect());
        }

        let missing = n - unrated.len();
        let mut picked = unrated;
        picked.extend(rated.choose_multiple(rng, missing).cloned());
        Ok(picked)
    }

    /// Records one answer. A skip is accepted but leaves no trace.
    pub async fn answer(
        &self,
        user_id: UserId,
        song_id: SongId,
        answer: QuizAnswer,
    ) -> AppResult<Option<Feedback>> {
        if self.catalog.song(song_id).await?.is_none() {
            return Err(AppError::SongNotFound(song_id));
        }

        let Some(feedback) = answer.into_feedback(user_id, song_id) else {
            tracing::debug!(user_id = %user_id, song_id = %song_id, "Quiz answer skipped");
            return Ok(None);
        };

        self.sink.record(feedback.clone()).await?;
        tracing::info!(
            user_id = %user_id,
            song_id = %song_id,
            liked = feedback.liked,
            "Quiz answer recorded"
        );
        Ok(Some(feedback))
    }
}
