use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

use super::SongId;

/// A catalog entry. Songs are immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    pub subgenre: String,
    /// Release year
    pub year: i32,
    /// Free-text descriptors such as "vocal" or "piano"
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub tags: BTreeSet<String>,
    /// Tempo in beats per minute, when known
    #[serde(default)]
    pub bpm: Option<u32>,
}

impl Song {
    /// Case-normalized subgenre used for filter matching
    pub fn normalized_subgenre(&self) -> String {
        normalize_label(&self.subgenre)
    }

    /// Number of tags this song shares with `other`
    pub fn shared_tags(&self, other: &Song) -> usize {
        self.tags.intersection(&other.tags).count()
    }
}

/// Trims and lowercases a subgenre or search label
pub fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Splits the semicolon-separated tag form, e.g. `"vocal;piano;classic"`
pub fn parse_tags(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    List(Vec<String>),
    Joined(String),
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match RawTags::deserialize(deserializer)? {
        RawTags::List(list) => list
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        RawTags::Joined(raw) => parse_tags(&raw),
    };
    Ok(tags)
}
