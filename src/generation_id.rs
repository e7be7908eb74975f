use serde::Serialize;
use uuid::Uuid;

use crate::models::GenerationRequest;

/// Correlates the log lines and the output of one playlist generation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct GenerationId(pub Uuid);

impl GenerationId {
    /// Creates a new random generation ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuses a caller-supplied ID when it is a valid UUID
    pub fn parse_or_new(raw: Option<&str>) -> Self {
        raw.and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(GenerationId)
            .unwrap_or_else(GenerationId::new)
    }
}

impl Default for GenerationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Span wrapping one generation call
pub fn generation_span(id: GenerationId, request: &GenerationRequest) -> tracing::Span {
    tracing::info_span!(
        "generate_playlist",
        generation_id = %id,
        user_id = %request.user_id,
        count = request.count,
        subgenre = request.subgenre.as_deref().unwrap_or("any"),
        seed = ?request.seed_song_id,
    )
}
