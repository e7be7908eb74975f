use crate::config::ScoringWeights;
use crate::models::Song;

use super::profile::TasteProfile;

/// Scores candidates against one taste profile and an optional seed song.
///
/// Scores are deterministic; tie-break jitter is added by the selector.
pub struct Scorer<'a> {
    profile: &'a TasteProfile,
    seed: Option<&'a Song>,
    weights: &'a ScoringWeights,
}

impl<'a> Scorer<'a> {
    pub fn new(profile: &'a TasteProfile, seed: Option<&'a Song>, weights: &'a ScoringWeights) -> Self {
        Self {
            profile,
            seed,
            weights,
        }
    }

    /// Sum of every signal that applies to `song`
    pub fn score(&self, song: &Song) -> f64 {
        self.affinity(song) + self.proximity(song) + self.seed_similarity(song)
    }

    /// Liked and disliked memberships are counted independently
    fn affinity(&self, song: &Song) -> f64 {
        let w = self.weights;
        let profile = self.profile;
        let mut score = 0.0;

        if profile.liked_artists.contains(&song.artist) {
            score += w.artist_weight;
        }
        if profile.disliked_artists.contains(&song.artist) {
            score -= w.artist_weight;
        }
        if profile.liked_subgenres.contains(&song.subgenre) {
            score += w.subgenre_weight;
        }
        if profile.disliked_subgenres.contains(&song.subgenre) {
            score -= w.subgenre_weight;
        }

        // A tag carried by k liked songs counts k times
        let tag_hits: usize = song
            .tags
            .iter()
            .map(|tag| profile.liked_tags.get(tag).copied().unwrap_or(0))
            .sum();
        score + tag_hits as f64 * w.tag_weight
    }

    fn proximity(&self, song: &Song) -> f64 {
        let w = self.weights;
        let mut score = 0.0;

        if let (Some(median), Some(bpm)) = (self.profile.median_liked_bpm, song.bpm) {
            if (f64::from(bpm) - median).abs() <= w.bpm_tolerance {
                score += w.bpm_weight;
            }
        }
        if let Some(median) = self.profile.median_liked_year {
            if (f64::from(song.year) - median).abs() <= w.year_tolerance {
                score += w.era_weight;
            }
        }

        score
    }

    fn seed_similarity(&self, song: &Song) -> f64 {
        let Some(seed) = self.seed else {
            return 0.0;
        };
        let w = self.weights;
        let mut score = 0.0;

        if song.artist == seed.artist {
            score += w.seed_artist_weight;
        }
        if song.subgenre == seed.subgenre {
            score += w.seed_subgenre_weight;
        }
        score += song.shared_tags(seed) as f64 * w.seed_tag_weight;

        if let (Some(bpm), Some(seed_bpm)) = (song.bpm, seed.bpm) {
            if (f64::from(bpm) - f64::from(seed_bpm)).abs() <= w.bpm_tolerance {
                score += w.seed_bpm_weight;
            }
        }

        score
    }
}
