use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tracing::Instrument;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    generation_id::{generation_span, GenerationId},
    models::{GenerationRequest, PlaylistPreview, Song, SongId},
    services::{FeedbackSource, Recommender, SongCatalog},
};

/// Validates generation requests, snapshots the data sources and runs the recommender
pub struct PlaylistService {
    catalog: Arc<dyn SongCatalog>,
    feedback: Arc<dyn FeedbackSource>,
    recommender: Recommender,
    min_count: usize,
    max_count: usize,
}

impl PlaylistService {
    pub fn new(
        catalog: Arc<dyn SongCatalog>,
        feedback: Arc<dyn FeedbackSource>,
        config: &Config,
    ) -> Self {
        Self {
            catalog,
            feedback,
            recommender: Recommender::new(config.weights.clone()),
            min_count: config.min_count,
            max_count: config.max_count,
        }
    }

    /// Builds a ranked preview for `request`
    pub async fn generate_preview<R: Rng + Send>(
        &self,
        request: GenerationRequest,
        rng: &mut R,
    ) -> AppResult<PlaylistPreview> {
        self.generate_preview_with_id(GenerationId::new(), request, rng)
            .await
    }

    /// Same as [`PlaylistService::generate_preview`] with a caller-chosen generation id
    pub async fn generate_preview_with_id<R: Rng + Send>(
        &self,
        generation_id: GenerationId,
        request: GenerationRequest,
        rng: &mut R,
    ) -> AppResult<PlaylistPreview> {
        let span = generation_span(generation_id, &request);
        self.generate(generation_id, request, rng)
            .instrument(span)
            .await
    }

    async fn generate<R: Rng + Send>(
        &self,
        generation_id: GenerationId,
        mut request: GenerationRequest,
        rng: &mut R,
    ) -> AppResult<PlaylistPreview> {
        self.validate(&mut request)?;

        // Report a missing seed before touching the feedback store
        if let Some(seed_id) = request.seed_song_id {
            if self.catalog.song(seed_id).await?.is_none() {
                tracing::warn!(seed = %seed_id, "Seed song not found");
                return Err(AppError::SeedNotFound(seed_id));
            }
        }

        // An unknown subgenre needs neither the full catalog nor the feedback
        if let Some(subgenre) = request.subgenre.as_deref() {
            if self.catalog.songs_in_subgenre(subgenre).await?.is_empty() {
                tracing::info!(subgenre, "No songs in subgenre");
                return Ok(PlaylistPreview {
                    generation_id,
                    user_id: request.user_id,
                    song_ids: Vec::new(),
                    songs: Vec::new(),
                });
            }
        }

        let songs = self.catalog.all_songs().await?;
        let feedback = self.feedback.feedback_for(request.user_id).await?;

        tracing::info!(
            catalog = songs.len(),
            feedback = feedback.len(),
            "Generating playlist"
        );

        let song_ids = self
            .recommender
            .recommend(&songs, &feedback, &request, rng)?;

        if song_ids.is_empty() {
            tracing::info!("No eligible songs for request");
        }

        let by_id: HashMap<SongId, &Song> = songs.iter().map(|song| (song.id, song)).collect();
        let resolved: Vec<Song> = song_ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .map(|song| (*song).clone())
                    .ok_or_else(|| AppError::Internal(format!("Ranked song {} vanished", id)))
            })
            .collect::<AppResult<_>>()?;

        tracing::info!(returned = song_ids.len(), "Playlist generated");

        Ok(PlaylistPreview {
            generation_id,
            user_id: request.user_id,
            song_ids,
            songs: resolved,
        })
    }

    fn validate(&self, request: &mut GenerationRequest) -> AppResult<()> {
        if request.count < self.min_count || request.count > self.max_count {
            return Err(AppError::InvalidInput(format!(
                "count must be between {} and {}, got {}",
                self.min_count, self.max_count, request.count
            )));
        }

        // A blank subgenre means no filter
        if request
            .subgenre
            .as_deref()
            .map_or(false, |s| s.trim().is_empty())
        {
            request.subgenre = None;
        }

        Ok(())
    }
}
