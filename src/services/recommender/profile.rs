use std::collections::{HashMap, HashSet};

use crate::models::{Feedback, Song, SongId};

/// Aggregate of one user's feedback history.
///
/// Rebuilt on every generation call; feedback may change between calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasteProfile {
    pub liked_artists: HashSet<String>,
    pub disliked_artists: HashSet<String>,
    pub liked_subgenres: HashSet<String>,
    pub disliked_subgenres: HashSet<String>,
    /// Tag -> number of liked songs carrying it
    pub liked_tags: HashMap<String, usize>,
    pub median_liked_bpm: Option<f64>,
    pub median_liked_year: Option<f64>,
    pub liked_song_ids: HashSet<SongId>,
    /// Never recommended, whatever their score
    pub disliked_song_ids: HashSet<SongId>,
}

impl TasteProfile {
    /// Builds the profile from raw feedback rows and the catalog used to look up attributes
    pub fn build(feedback: &[Feedback], catalog: &[Song]) -> Self {
        let songs: HashMap<SongId, &Song> = catalog.iter().map(|song| (song.id, song)).collect();
        let mut profile = TasteProfile::default();
        let mut bpms = Vec::new();
        let mut years = Vec::new();

        for row in latest_per_song(feedback) {
            let song = songs.get(&row.song_id);

            if row.liked {
                profile.liked_song_ids.insert(row.song_id);
                let Some(song) = song else { continue };

                profile.liked_artists.insert(song.artist.clone());
                profile.liked_subgenres.insert(song.subgenre.clone());
                for tag in &song.tags {
                    *profile.liked_tags.entry(tag.clone()).or_insert(0) += 1;
                }
                if let Some(bpm) = song.bpm {
                    bpms.push(f64::from(bpm));
                }
                years.push(f64::from(song.year));
            } else {
                profile.disliked_song_ids.insert(row.song_id);
                let Some(song) = song else { continue };

                profile.disliked_artists.insert(song.artist.clone());
                profile.disliked_subgenres.insert(song.subgenre.clone());
            }
        }

        profile.median_liked_bpm = median(&mut bpms);
        profile.median_liked_year = median(&mut years);
        profile
    }

    pub fn is_empty(&self) -> bool {
        self.liked_song_ids.is_empty() && self.disliked_song_ids.is_empty()
    }
}

/// Keeps the newest row per song. Equal timestamps resolve to the later row.
fn latest_per_song(feedback: &[Feedback]) -> Vec<&Feedback> {
    let mut latest: HashMap<SongId, (usize, &Feedback)> = HashMap::new();

    for (index, row) in feedback.iter().enumerate() {
        let supersedes = latest
            .get(&row.song_id)
            .map_or(true, |(_, current)| row.created_at >= current.created_at);
        if supersedes {
            latest.insert(row.song_id, (index, row));
        }
    }

    let mut rows: Vec<(usize, &Feedback)> = latest.into_values().collect();
    rows.sort_by_key(|(index, _)| *index);
    rows.into_iter().map(|(_, row)| row).collect()
}

/// Median of `values`; the mean of the two middle values for even lengths
pub(crate) fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::{Duration, Utc};

    fn song(id: u64, artist: &str, subgenre: &str, year: i32, tags: &[&str], bpm: Option<u32>) -> Song {
        Song {
            id: SongId(id),
            title: format!("Song {}", id),
            artist: artist.to_string(),
            subgenre: subgenre.to_string(),
            year,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            bpm,
        }
    }

    fn catalog() -> Vec<Song> {
        vec![
            song(1, "Artist A", "house", 2000, &["vocal", "piano"], Some(120)),
            song(2, "Artist A", "deep-house", 2001, &["deep", "vocal"], Some(122)),
            song(3, "Artist B", "house", 2002, &["piano", "classic"], Some(124)),
            song(4, "Artist B", "tech-house", 2003, &["club"], None),
            song(5, "Artist C", "french-house", 2004, &["filter", "classic"], Some(123)),
        ]
    }

    fn feedback(song_id: u64, liked: bool) -> Feedback {
        Feedback::new(UserId(1), SongId(song_id), liked)
    }

    #[test]
    fn test_empty_feedback_gives_empty_profile() {
        let profile = TasteProfile::build(&[], &catalog());
        assert!(profile.is_empty());
        assert_eq!(profile, TasteProfile::default());
        assert_eq!(profile.median_liked_bpm, None);
        assert_eq!(profile.median_liked_year, None);
    }

    #[test]
    fn test_liked_and_disliked_collections() {
        let rows = vec![feedback(1, true), feedback(3, true), feedback(4, false)];
        let profile = TasteProfile::build(&rows, &catalog());

        assert!(profile.liked_artists.contains("Artist A"));
        assert!(profile.liked_artists.contains("Artist B"));
        assert!(profile.disliked_artists.contains("Artist B"));
        assert!(profile.liked_subgenres.contains("house"));
        assert!(profile.disliked_subgenres.contains("tech-house"));
        assert_eq!(profile.liked_tags.get("piano"), Some(&2));
        assert_eq!(profile.liked_tags.get("vocal"), Some(&1));
        assert!(profile.disliked_song_ids.contains(&SongId(4)));
        assert_eq!(profile.median_liked_bpm, Some(122.0));
        assert_eq!(profile.median_liked_year, Some(2001.0));
    }

    #[test]
    fn test_latest_feedback_wins() {
        let now = Utc::now();
        let mut old = feedback(2, false);
        old.created_at = now - Duration::hours(1);
        let mut new = feedback(2, true);
        new.created_at = now;

        // Order in the input must not matter, only the timestamps
        let profile = TasteProfile::build(&[new.clone(), old.clone()], &catalog());
        assert!(profile.liked_song_ids.contains(&SongId(2)));
        assert!(!profile.disliked_song_ids.contains(&SongId(2)));
        assert!(profile.disliked_artists.is_empty());

        let profile = TasteProfile::build(&[old, new], &catalog());
        assert!(profile.liked_song_ids.contains(&SongId(2)));
    }

    #[test]
    fn test_equal_timestamps_keep_later_row() {
        let now = Utc::now();
        let mut first = feedback(1, true);
        first.created_at = now;
        let mut second = feedback(1, false);
        second.created_at = now;

        let profile = TasteProfile::build(&[first, second], &catalog());
        assert!(profile.disliked_song_ids.contains(&SongId(1)));
        assert!(profile.liked_song_ids.is_empty());
    }

    #[test]
    fn test_bpm_median_ignores_unknown_bpm() {
        let rows = vec![feedback(4, true)];
        let profile = TasteProfile::build(&rows, &catalog());
        assert_eq!(profile.median_liked_bpm, None);
        assert_eq!(profile.median_liked_year, Some(2003.0));
    }

    #[test]
    fn test_feedback_for_unknown_song_still_excludes_it() {
        let rows = vec![feedback(99, false)];
        let profile = TasteProfile::build(&rows, &catalog());
        assert!(profile.disliked_song_ids.contains(&SongId(99)));
        assert!(profile.disliked_artists.is_empty());
    }

    #[test]
    fn test_median_even_and_odd() {
        let mut empty: Vec<f64> = Vec::new();
        assert_eq!(median(&mut empty), None);
        assert_eq!(median(&mut [124.0, 120.0, 122.0]), Some(122.0));
        assert_eq!(median(&mut [120.0, 126.0, 122.0, 124.0]), Some(123.0));
    }
}
