//! Producer operations profile: rotation bins, playlists, bookings and
//! run-of-show. Stats here are computed on read, never stored.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{RadioError, RadioResult};
use super::ordered_list::OrderedList;
use super::track::TrackId;

pub const DEFAULT_PRODUCER_NAME: &str = "McKenzie";
pub const DEFAULT_STATION: &str = "GMU Radio";
pub const DEFAULT_ROLE: &str = "Producer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bin {
    A,
    B,
    C,
}

impl FromStr for Bin {
    type Err = RadioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Bin::A),
            "B" => Ok(Bin::B),
            "C" => Ok(Bin::C),
            _ => Err(RadioError::validation("Invalid bin value")),
        }
    }
}

impl fmt::Display for Bin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationItem {
    pub track_id: TrackId,
    pub bin: Bin,
    pub notes: String,
    pub explicit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
    pub date: NaiveDate,
    /// Slug of the show this playlist belongs to.
    pub show: Option<String>,
    pub tracks: OrderedList<TrackId>,
}

impl Playlist {
    pub fn new(name: &str, date: &str, show: Option<String>) -> RadioResult<Self> {
        let name = name.trim();
        if name.chars().count() < 2 {
            return Err(RadioError::validation(
                "Playlist name required (min 2 characters)",
            ));
        }
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| RadioError::validation(format!("Invalid playlist date: {}", date)))?;
        Ok(Self {
            name: name.to_string(),
            date,
            show: show.filter(|s| !s.trim().is_empty()),
            tracks: OrderedList::new(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub guest_or_segment: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

fn parse_booking_time(label: &str, value: &str) -> RadioResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| RadioError::validation(format!("Invalid {} time: {}", label, value)))
}

impl Booking {
    /// Times are `H:MM` or `HH:MM` and are stored as `HH:MM`.
    pub fn new(guest_or_segment: &str, day: &str, start_time: &str, end_time: &str) -> RadioResult<Self> {
        if guest_or_segment.trim().is_empty()
            || day.trim().is_empty()
            || start_time.trim().is_empty()
            || end_time.trim().is_empty()
        {
            return Err(RadioError::validation("All fields are required"));
        }
        let start = parse_booking_time("start", start_time)?.format("%H:%M").to_string();
        let end = parse_booking_time("end", end_time)?.format("%H:%M").to_string();
        if end <= start {
            return Err(RadioError::InvalidTimeRange { start, end });
        }
        Ok(Self {
            guest_or_segment: guest_or_segment.trim().to_string(),
            day: day.trim().to_string(),
            start_time: start,
            end_time: end,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOfShowItem {
    pub start_label: String,
    pub description: String,
    pub duration: String,
}

impl RunOfShowItem {
    pub fn new(start_label: &str, description: &str, duration: &str) -> RadioResult<Self> {
        if start_label.trim().is_empty() || description.trim().is_empty() || duration.trim().is_empty() {
            return Err(RadioError::validation(
                "Start, description and duration are required",
            ));
        }
        Ok(Self {
            start_label: start_label.trim().to_string(),
            description: description.trim().to_string(),
            duration: duration.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCounts {
    #[serde(rename = "A")]
    pub a: usize,
    #[serde(rename = "B")]
    pub b: usize,
    #[serde(rename = "C")]
    pub c: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProducerStats {
    pub total_shows: usize,
    pub rotation_items: usize,
    pub playlists: usize,
    pub bookings: usize,
    pub ros_items: usize,
    pub rotation_bins: BinCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerProfile {
    pub session_id: String,
    pub user_id: Option<String>,
    pub name: String,
    pub station: String,
    pub role: String,
    pub genre: Option<i64>,
    shows: Vec<String>,
    rotation: OrderedList<RotationItem>,
    playlists: OrderedList<Playlist>,
    bookings: OrderedList<Booking>,
    run_of_show: OrderedList<RunOfShowItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProducerProfile {
    pub fn new(session_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.to_string(),
            user_id: None,
            name: DEFAULT_PRODUCER_NAME.to_string(),
            station: DEFAULT_STATION.to_string(),
            role: DEFAULT_ROLE.to_string(),
            genre: None,
            shows: Vec::new(),
            rotation: OrderedList::new(),
            playlists: OrderedList::new(),
            bookings: OrderedList::new(),
            run_of_show: OrderedList::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn shows(&self) -> &[String] {
        &self.shows
    }

    pub fn rotation(&self) -> &[RotationItem] {
        self.rotation.as_slice()
    }

    pub fn playlists(&self) -> &[Playlist] {
        self.playlists.as_slice()
    }

    pub fn bookings(&self) -> &[Booking] {
        self.bookings.as_slice()
    }

    pub fn run_of_show(&self) -> &[RunOfShowItem] {
        self.run_of_show.as_slice()
    }

    // Shows

    /// Returns false when the show was already owned.
    pub fn add_show(&mut self, slug: &str) -> bool {
        if self.shows.iter().any(|s| s == slug) {
            return false;
        }
        self.shows.push(slug.to_string());
        true
    }

    pub fn remove_show(&mut self, slug: &str) -> bool {
        let before = self.shows.len();
        self.shows.retain(|s| s != slug);
        self.shows.len() != before
    }

    // Rotation

    pub fn add_rotation_item(&mut self, item: RotationItem) {
        self.rotation.push(item);
    }

    pub fn remove_rotation_item(&mut self, index: usize) -> RadioResult<RotationItem> {
        self.rotation.remove_at(index)
    }

    pub fn clear_rotation(&mut self) {
        self.rotation.clear();
    }

    pub fn bin_counts(&self) -> BinCounts {
        self.rotation
            .iter()
            .fold(BinCounts::default(), |mut counts, item| {
                match item.bin {
                    Bin::A => counts.a += 1,
                    Bin::B => counts.b += 1,
                    Bin::C => counts.c += 1,
                }
                counts
            })
    }

    // Playlists

    pub fn add_playlist(&mut self, playlist: Playlist) {
        self.playlists.push(playlist);
    }

    pub fn remove_playlist(&mut self, index: usize) -> RadioResult<Playlist> {
        self.playlists.remove_at(index)
    }

    /// Duplicates are allowed.
    pub fn add_track_to_playlist(&mut self, playlist_index: usize, track_id: TrackId) -> RadioResult<()> {
        self.playlists.get_mut(playlist_index)?.tracks.push(track_id);
        Ok(())
    }

    pub fn remove_track_from_playlist(
        &mut self,
        playlist_index: usize,
        track_index: usize,
    ) -> RadioResult<TrackId> {
        self.playlists
            .get_mut(playlist_index)?
            .tracks
            .remove_at(track_index)
    }

    // Bookings

    pub fn add_booking(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    pub fn remove_booking(&mut self, index: usize) -> RadioResult<Booking> {
        self.bookings.remove_at(index)
    }

    // Run of show

    pub fn add_ros_item(&mut self, item: RunOfShowItem) {
        self.run_of_show.push(item);
    }

    pub fn remove_ros_item(&mut self, index: usize) -> RadioResult<RunOfShowItem> {
        self.run_of_show.remove_at(index)
    }

    pub fn clear_run_of_show(&mut self) {
        self.run_of_show.clear();
    }

    pub fn stats(&self) -> ProducerStats {
        ProducerStats {
            total_shows: self.shows.len(),
            rotation_items: self.rotation.len(),
            playlists: self.playlists.len(),
            bookings: self.bookings.len(),
            ros_items: self.run_of_show.len(),
            rotation_bins: self.bin_counts(),
        }
    }
}
