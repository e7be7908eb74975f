use serde::{Deserialize, Serialize};

use super::{Song, SongId, UserId};
use crate::generation_id::GenerationId;

/// Request to build a playlist preview
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    pub user_id: UserId,
    pub count: usize,
    #[serde(default)]
    pub subgenre: Option<String>,
    #[serde(default)]
    pub seed_song_id: Option<SongId>,
}

impl GenerationRequest {
    pub fn new(user_id: UserId, count: usize) -> Self {
        Self {
            user_id,
            count,
            subgenre: None,
            seed_song_id: None,
        }
    }

    pub fn with_subgenre(mut self, subgenre: impl Into<String>) -> Self {
        self.subgenre = Some(subgenre.into());
        self
    }

    pub fn with_seed(mut self, seed_song_id: SongId) -> Self {
        self.seed_song_id = Some(seed_song_id);
        self
    }
}

/// Ranked, not yet saved playlist
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlaylistPreview {
    pub generation_id: GenerationId,
    pub user_id: UserId,
    /// Song ids, best first
    pub song_ids: Vec<SongId>,
    /// Resolved songs in the same order as `song_ids`
    pub songs: Vec<Song>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_deserializes_optional_fields() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"user_id": 7, "count": 20}"#).unwrap();
        assert_eq!(request, GenerationRequest::new(UserId(7), 20));
    }

    #[test]
    fn test_request_builders() {
        let request = GenerationRequest::new(UserId(1), 10)
            .with_subgenre("deep-house")
            .with_seed(SongId(4));
        assert_eq!(request.subgenre.as_deref(), Some("deep-house"));
        assert_eq!(request.seed_song_id, Some(SongId(4)));
    }
}
