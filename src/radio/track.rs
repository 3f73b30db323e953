use serde::{Deserialize, Serialize};

use super::duration::format_mmss;
use super::error::{RadioError, RadioResult};

pub type TrackId = i64;

pub const MIN_TITLE_CHARS: usize = 2;

/// Fields of a track before it gets an id from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrack {
    pub title: String,
    pub artist: String,
    pub bpm: u32,
    pub duration: u32,
    pub mmss: String,
}

impl NewTrack {
    /// Trims text fields and derives `mmss` from the duration.
    pub fn new(title: &str, artist: &str, bpm: u32, duration: u32) -> RadioResult<Self> {
        let title = title.trim();
        if title.chars().count() < MIN_TITLE_CHARS {
            return Err(RadioError::validation(format!(
                "Title required (min {} characters)",
                MIN_TITLE_CHARS
            )));
        }
        if duration < 1 {
            return Err(RadioError::validation("Duration must be at least one second"));
        }
        Ok(Self {
            title: title.to_string(),
            artist: artist.trim().to_string(),
            bpm,
            duration,
            mmss: format_mmss(duration),
        })
    }
}

/// A catalog track. Never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    pub bpm: u32,
    pub duration: u32,
    pub mmss: String,
    pub created_at: i64,
}

impl Track {
    pub fn label(&self) -> String {
        let artist = if self.artist.is_empty() {
            String::new()
        } else {
            format!(" – {}", self.artist)
        };
        let bpm = if self.bpm > 0 {
            format!(", {} BPM", self.bpm)
        } else {
            String::new()
        };
        format!("{}{} [{}{}]", self.title, artist, self.mmss, bpm)
    }
}
