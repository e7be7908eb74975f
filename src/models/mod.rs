use serde::{Deserialize, Serialize};
use std::fmt::Display;

mod feedback;
mod playlist;
mod song;

pub use feedback::{Feedback, QuizAnswer};
pub use playlist::{GenerationRequest, PlaylistPreview};
pub use song::{normalize_label, parse_tags, Song};

/// Catalog identifier of a song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(pub u64);

impl Display for SongId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a quiz participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_song_id_display() {
        assert_eq!(format!("{}", SongId(17)), "17");
    }

    #[test]
    fn test_ids_serialize_transparently() {
        assert_eq!(serde_json::to_string(&SongId(3)).unwrap(), "3");
        let user: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(user, UserId(12));
    }
}
