use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{normalize_label, Feedback, Song, SongId, UserId},
    services::{FeedbackSink, FeedbackSource, SongCatalog},
};

/// In-memory catalog and feedback log.
///
/// Cloning is cheap; clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<MemoryStoreInner>>,
}

#[derive(Default)]
struct MemoryStoreInner {
    songs: Vec<Song>,
    index: HashMap<SongId, usize>,
    feedback: Vec<Feedback>,
}

impl MemoryStore {
    /// Creates a store from a catalog and existing feedback. Song ids must be unique.
    pub fn new(songs: Vec<Song>, feedback: Vec<Feedback>) -> AppResult<Self> {
        let mut index = HashMap::with_capacity(songs.len());
        for (position, song) in songs.iter().enumerate() {
            if index.insert(song.id, position).is_some() {
                return Err(AppError::InvalidInput(format!(
                    "Duplicate song id {} in catalog",
                    song.id
                )));
            }
        }

        Ok(Self {
            inner: Arc::new(RwLock::new(MemoryStoreInner {
                songs,
                index,
                feedback,
            })),
        })
    }

    /// Loads the catalog and, when the file exists, the feedback log from JSON files
    pub async fn load(catalog_path: impl AsRef<Path>, feedback_path: impl AsRef<Path>) -> AppResult<Self> {
        let catalog_path = catalog_path.as_ref();
        let feedback_path = feedback_path.as_ref();

        let raw = tokio::fs::read_to_string(catalog_path).await?;
        let songs: Vec<Song> = serde_json::from_str(&raw)?;
        tracing::info!(path = %catalog_path.display(), songs = songs.len(), "Catalog loaded");

        let feedback: Vec<Feedback> = match tokio::fs::read_to_string(feedback_path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %feedback_path.display(), "No feedback file, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::info!(rows = feedback.len(), "Feedback loaded");

        Self::new(songs, feedback)
    }

    /// Songs whose title or artist contains `query` and whose subgenre matches `subgenre`
    pub async fn search(&self, query: Option<&str>, subgenre: Option<&str>) -> Vec<Song> {
        let query = query.map(normalize_label).filter(|q| !q.is_empty());
        let subgenre = subgenre.map(normalize_label).filter(|s| !s.is_empty());
        let inner = self.inner.read().await;

        inner
            .songs
            .iter()
            .filter(|song| {
                query.as_ref().map_or(true, |q| {
                    song.title.to_lowercase().contains(q.as_str())
                        || song.artist.to_lowercase().contains(q.as_str())
                })
            })
            .filter(|song| {
                subgenre
                    .as_ref()
                    .map_or(true, |s| &song.normalized_subgenre() == s)
            })
            .cloned()
            .collect()
    }

    /// Writes the whole feedback log, superseded rows included, as JSON
    pub async fn save_feedback(&self, path: impl AsRef<Path>) -> AppResult<()> {
        let path = path.as_ref();
        let raw = {
            let inner = self.inner.read().await;
            serde_json::to_string_pretty(&inner.feedback)?
        };
        tokio::fs::write(path, raw).await?;
        tracing::info!(path = %path.display(), "Feedback saved");
        Ok(())
    }

    /// Number of recorded feedback rows, superseded ones included
    pub async fn feedback_len(&self) -> usize {
        self.inner.read().await.feedback.len()
    }
}

#[async_trait::async_trait]
impl SongCatalog for MemoryStore {
    async fn all_songs(&self) -> AppResult<Vec<Song>> {
        Ok(self.inner.read().await.songs.clone())
    }

    async fn songs_in_subgenre(&self, subgenre: &str) -> AppResult<Vec<Song>> {
        let wanted = normalize_label(subgenre);
        let inner = self.inner.read().await;
        Ok(inner
            .songs
            .iter()
            .filter(|song| song.normalized_subgenre() == wanted)
            .cloned()
            .collect())
    }

    async fn song(&self, id: SongId) -> AppResult<Option<Song>> {
        let inner = self.inner.read().await;
        Ok(inner.index.get(&id).map(|&position| inner.songs[position].clone()))
    }

    async fn find_by_title(&self, query: &str) -> AppResult<Option<Song>> {
        let query = normalize_label(query);
        if query.is_empty() {
            return Ok(None);
        }
        let inner = self.inner.read().await;
        Ok(inner
            .songs
            .iter()
            .find(|song| song.title.to_lowercase().contains(&query))
            .cloned())
    }
}

#[async_trait::async_trait]
impl FeedbackSource for MemoryStore {
    async fn feedback_for(&self, user_id: UserId) -> AppResult<Vec<Feedback>> {
        let inner = self.inner.read().await;
        Ok(inner
            .feedback
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl FeedbackSink for MemoryStore {
    /// Appends the row; readers resolve repeated answers by timestamp
    async fn record(&self, feedback: Feedback) -> AppResult<()> {
        self.inner.write().await.feedback.push(feedback);
        Ok(())
    }
}
