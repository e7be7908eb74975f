//! Content-based playlist recommendation.
//!
//! The engine is a pure function of a catalog snapshot, one user's feedback
//! rows and a generation request. It holds no state between calls and does
//! no I/O; randomness for tie-breaking is passed in by the caller.

use rand::Rng;

use crate::{
    config::ScoringWeights,
    error::{AppError, AppResult},
    models::{Feedback, GenerationRequest, Song, SongId},
};

mod profile;
mod scorer;
mod selector;

pub use profile::TasteProfile;
pub use scorer::Scorer;
pub use selector::ScoredSong;

/// Recommendation engine configured with a set of scoring weights
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    weights: ScoringWeights,
}

impl Recommender {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Ranked song ids for `request`, best first
    pub fn recommend<R: Rng>(
        &self,
        catalog: &[Song],
        feedback: &[Feedback],
        request: &GenerationRequest,
        rng: &mut R,
    ) -> AppResult<Vec<SongId>> {
        let ranked = self.rank(catalog, feedback, request, rng)?;
        Ok(ranked.into_iter().map(|scored| scored.song_id).collect())
    }

    /// Same as [`Recommender::recommend`] but keeps the scores
    ///
    /// Fails with [`AppError::SeedNotFound`] when the seed id is not in the catalog.
    pub fn rank<R: Rng>(
        &self,
        catalog: &[Song],
        feedback: &[Feedback],
        request: &GenerationRequest,
        rng: &mut R,
    ) -> AppResult<Vec<ScoredSong>> {
        let seed = match request.seed_song_id {
            Some(seed_id) => Some(
                catalog
                    .iter()
                    .find(|song| song.id == seed_id)
                    .ok_or(AppError::SeedNotFound(seed_id))?,
            ),
            None => None,
        };

        let profile = TasteProfile::build(feedback, catalog);
        if profile.is_empty() {
            tracing::debug!("No feedback yet, ranking on seed and tie-break only");
        }

        Ok(selector::rank(
            catalog,
            &profile,
            seed,
            request,
            &self.weights,
            rng,
        ))
    }
}
