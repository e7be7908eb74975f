use std::collections::HashSet;

use rand::Rng;

use crate::config::ScoringWeights;
use crate::models::{normalize_label, GenerationRequest, Song, SongId};

use super::profile::TasteProfile;
use super::scorer::Scorer;

/// A candidate together with its final (jittered) score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredSong {
    pub song_id: SongId,
    pub score: f64,
}

/// Filters the catalog down to eligible candidates, scores and ranks them.
///
/// The result is sorted best first, holds at most `request.count` entries,
/// never repeats an id and never contains a disliked song.
pub fn rank<R: Rng>(
    catalog: &[Song],
    profile: &TasteProfile,
    seed: Option<&Song>,
    request: &GenerationRequest,
    weights: &ScoringWeights,
    rng: &mut R,
) -> Vec<ScoredSong> {
    let subgenre = request.subgenre.as_deref().map(normalize_label);
    let seed_id = seed.map(|song| song.id);
    let scorer = Scorer::new(profile, seed, weights);

    let mut seen: HashSet<SongId> = HashSet::new();
    let mut scored: Vec<ScoredSong> = catalog
        .iter()
        .filter(|song| !profile.disliked_song_ids.contains(&song.id))
        .filter(|song| Some(song.id) != seed_id)
        .filter(|song| {
            subgenre
                .as_ref()
                .map_or(true, |wanted| &song.normalized_subgenre() == wanted)
        })
        .filter(|song| seen.insert(song.id))
        .map(|song| ScoredSong {
            song_id: song.id,
            score: scorer.score(song) + jitter(weights.jitter, rng),
        })
        .collect();

    tracing::debug!(
        pool = scored.len(),
        catalog = catalog.len(),
        requested = request.count,
        "Scored candidate pool"
    );

    // Stable: exact ties keep catalog order
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(request.count);
    scored
}

fn jitter<R: Rng>(max: f64, rng: &mut R) -> f64 {
    if max > 0.0 && max.is_finite() {
        rng.gen_range(0.0..max)
    } else {
        0.0
    }
}
