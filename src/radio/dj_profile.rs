//! DJ queue profile.
//!
//! The queue keeps two invariants after every mutation: positions are
//! `1..=len` in list order, and the stored stats match the list contents.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::duration::parse_queue_duration;
use super::error::{RadioError, RadioResult};
use super::ordered_list::{OrderedList, Positioned};
use super::track::{NewTrack, Track, TrackId, MIN_TITLE_CHARS};

pub const DEFAULT_DJ_NAME: &str = "DJ User";

/// Copy of a track's fields as it sits in the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub track_id: Option<TrackId>,
    pub title: String,
    pub artist: String,
    pub bpm: u32,
    pub duration: u32,
    pub mmss: String,
    pub position: usize,
    pub added_at: DateTime<Utc>,
}

impl Positioned for QueueEntry {
    fn set_position(&mut self, position: usize) {
        self.position = position;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueStats {
    pub gigs: u32,
    pub total_seconds: u64,
    pub tracks_queued: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentSlot {
    pub date: String,
    pub time: String,
}

/// Manually entered track, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManualTrack {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub bpm: u32,
    /// `mm:ss`
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DjProfile {
    pub session_id: String,
    pub user_id: Option<String>,
    pub name: String,
    queue: OrderedList<QueueEntry>,
    pub current_show: String,
    pub current_slot: CurrentSlot,
    stats: QueueStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

impl DjProfile {
    pub fn new(session_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.to_string(),
            user_id: None,
            name: DEFAULT_DJ_NAME.to_string(),
            queue: OrderedList::new(),
            current_show: String::new(),
            current_slot: CurrentSlot::default(),
            stats: QueueStats::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn queue(&self) -> &[QueueEntry] {
        self.queue.as_slice()
    }

    pub fn stats(&self) -> &QueueStats {
        &self.stats
    }

    /// A TTL reaching past the representable range never expires.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.created_at
            .checked_add_signed(ttl)
            .is_some_and(|expires_at| expires_at <= now)
    }

    /// Rejects a title equal to a queued title, ignoring case and surrounding whitespace.
    pub fn ensure_not_queued(&self, title: &str) -> RadioResult<()> {
        let wanted = normalize_title(title);
        if self
            .queue
            .iter()
            .any(|entry| normalize_title(&entry.title) == wanted)
        {
            return Err(RadioError::DuplicateTrack(title.trim().to_string()));
        }
        Ok(())
    }

    /// Looser guard for manual entries: rejects a title contained in any queued title.
    pub fn ensure_not_contained(&self, title: &str) -> RadioResult<()> {
        let wanted = normalize_title(title);
        if self
            .queue
            .iter()
            .any(|entry| entry.title.to_lowercase().contains(&wanted))
        {
            return Err(RadioError::DuplicateTrack(title.trim().to_string()));
        }
        Ok(())
    }

    fn append(&mut self, track: NewTrack, track_id: Option<TrackId>, now: DateTime<Utc>) -> RadioResult<&QueueEntry> {
        self.ensure_not_queued(&track.title)?;
        let entry = QueueEntry {
            track_id,
            title: track.title,
            artist: track.artist,
            bpm: track.bpm,
            duration: track.duration,
            mmss: track.mmss,
            position: 0,
            added_at: now,
        };
        self.queue.push_positioned(entry);
        self.update_stats();
        self.queue.get(self.queue.len() - 1)
    }

    pub fn add_catalog_track(&mut self, track: &Track, now: DateTime<Utc>) -> RadioResult<&QueueEntry> {
        let data = NewTrack {
            title: track.title.clone(),
            artist: track.artist.clone(),
            bpm: track.bpm,
            duration: track.duration,
            mmss: track.mmss.clone(),
        };
        self.append(data, Some(track.id), now)
    }

    pub fn add_manual_track(&mut self, manual: &ManualTrack, now: DateTime<Utc>) -> RadioResult<&QueueEntry> {
        if manual.title.trim().chars().count() < MIN_TITLE_CHARS {
            return Err(RadioError::validation(format!(
                "Title required (min {} characters)",
                MIN_TITLE_CHARS
            )));
        }
        let seconds = parse_queue_duration(&manual.duration)?;
        self.ensure_not_contained(&manual.title)?;
        let data = NewTrack::new(&manual.title, &manual.artist, manual.bpm, seconds)?;
        self.append(data, None, now)
    }

    pub fn remove_track(&mut self, index: usize) -> RadioResult<QueueEntry> {
        let removed = self.queue.remove_at(index)?;
        self.queue.renumber();
        self.update_stats();
        Ok(removed)
    }

    pub fn move_track(&mut self, from_index: usize, to_index: usize) -> RadioResult<()> {
        self.queue.move_to(from_index, to_index)?;
        self.queue.renumber();
        self.update_stats();
        Ok(())
    }

    pub fn save_show(&mut self, show_slug: &str, slot: CurrentSlot, now: DateTime<Utc>) {
        self.current_show = show_slug.to_string();
        self.current_slot = slot;
        self.stats.gigs += 1;
        self.updated_at = now;
    }

    pub fn search_queue(&self, term: &str) -> Vec<&QueueEntry> {
        let query = term.to_lowercase();
        self.queue
            .iter()
            .filter(|entry| {
                entry.title.to_lowercase().contains(&query)
                    || entry.artist.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn clear_session(&mut self) {
        self.queue.clear();
        self.current_show = String::new();
        self.current_slot = CurrentSlot::default();
        self.stats = QueueStats::default();
    }

    fn update_stats(&mut self) {
        self.stats.tracks_queued = self.queue.len();
        self.stats.total_seconds = self.queue.iter().map(|e| e.duration as u64).sum();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manual(title: &str, duration: &str) -> ManualTrack {
        ManualTrack {
            title: title.to_string(),
            artist: "Someone".to_string(),
            bpm: 120,
            duration: duration.to_string(),
        }
    }

    fn profile_with(titles: &[&str]) -> DjProfile {
        let mut profile = DjProfile::new("sess", Utc::now());
        for title in titles {
            profile
                .add_manual_track(&manual(title, "03:00"), Utc::now())
                .unwrap();
        }
        profile
    }

    fn titles(profile: &DjProfile) -> Vec<&str> {
        profile.queue().iter().map(|e| e.title.as_str()).collect()
    }

    fn assert_consistent(profile: &DjProfile) {
        for (index, entry) in profile.queue().iter().enumerate() {
            assert_eq!(entry.position, index + 1);
        }
        let total: u64 = profile.queue().iter().map(|e| e.duration as u64).sum();
        assert_eq!(profile.stats().total_seconds, total);
        assert_eq!(profile.stats().tracks_queued, profile.queue().len());
    }

    #[test]
    fn case_and_whitespace_variant_is_duplicate() {
        let mut profile = profile_with(&["Sunrise"]);
        let result = profile.add_manual_track(&manual("sunrise ", "02:00"), Utc::now());
        assert!(matches!(result, Err(RadioError::DuplicateTrack(_))));
        assert_eq!(profile.queue().len(), 1);
    }

    #[test]
    fn substring_guard_applies_to_manual_entries() {
        let mut profile = profile_with(&["Campus Sunrise"]);
        let result = profile.add_manual_track(&manual("sunrise", "02:00"), Utc::now());
        assert!(matches!(result, Err(RadioError::DuplicateTrack(_))));
    }

    #[test]
    fn catalog_tracks_only_use_exact_guard() {
        let mut profile = profile_with(&["Campus Sunrise"]);
        let track = Track {
            id: 9,
            title: "Sunrise".to_string(),
            artist: String::new(),
            bpm: 0,
            duration: 100,
            mmss: "01:40".to_string(),
            created_at: 0,
        };
        let entry = profile.add_catalog_track(&track, Utc::now()).unwrap();
        assert_eq!(entry.track_id, Some(9));
        assert_eq!(entry.position, 2);
        assert!(matches!(
            profile.add_catalog_track(&track, Utc::now()),
            Err(RadioError::DuplicateTrack(_))
        ));
    }

    #[test]
    fn manual_entry_validation() {
        let mut profile = DjProfile::new("sess", Utc::now());
        assert!(matches!(
            profile.add_manual_track(&manual("x", "03:00"), Utc::now()),
            Err(RadioError::Validation(_))
        ));
        assert!(matches!(
            profile.add_manual_track(&manual("Long one", "10:30"), Utc::now()),
            Err(RadioError::InvalidDuration(_))
        ));
        assert!(matches!(
            profile.add_manual_track(&manual("Bad secs", "4:65"), Utc::now()),
            Err(RadioError::InvalidDuration(_))
        ));
        assert!(profile.queue().is_empty());
    }

    #[test]
    fn move_reorders_and_renumbers() {
        let mut profile = profile_with(&["Alpha", "Bravo", "Charlie"]);
        profile.move_track(0, 2).unwrap();
        assert_eq!(titles(&profile), vec!["Bravo", "Charlie", "Alpha"]);
        assert_consistent(&profile);
    }

    #[test]
    fn failed_operations_leave_queue_unchanged() {
        let mut profile = profile_with(&["Alpha", "Bravo"]);
        let before = profile.clone();
        assert!(matches!(
            profile.remove_track(2),
            Err(RadioError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(matches!(
            profile.move_track(0, 5),
            Err(RadioError::IndexOutOfRange { .. })
        ));
        assert_eq!(profile, before);
    }

    #[test]
    fn stats_follow_every_mutation() {
        let mut profile = DjProfile::new("sess", Utc::now());
        profile
            .add_manual_track(&manual("Alpha", "01:00"), Utc::now())
            .unwrap();
        assert_consistent(&profile);
        profile
            .add_manual_track(&manual("Bravo", "02:30"), Utc::now())
            .unwrap();
        profile
            .add_manual_track(&manual("Charlie", "00:45"), Utc::now())
            .unwrap();
        assert_eq!(profile.stats().total_seconds, 60 + 150 + 45);
        assert_consistent(&profile);

        profile.move_track(2, 0).unwrap();
        assert_consistent(&profile);
        profile.remove_track(1).unwrap();
        assert_consistent(&profile);
        assert_eq!(profile.stats().total_seconds, 45 + 150);
        profile.remove_track(0).unwrap();
        profile.remove_track(0).unwrap();
        assert_consistent(&profile);
        assert_eq!(profile.stats().total_seconds, 0);
    }

    #[test]
    fn search_matches_title_or_artist() {
        let mut profile = profile_with(&["Library Lo-Fi", "Stadium Anthem"]);
        profile
            .add_manual_track(
                &ManualTrack {
                    title: "Quiet".to_string(),
                    artist: "Study Group".to_string(),
                    bpm: 0,
                    duration: "01:00".to_string(),
                },
                Utc::now(),
            )
            .unwrap();
        let hits: Vec<&str> = profile
            .search_queue("STUDY")
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(hits, vec!["Quiet"]);
        assert_eq!(profile.search_queue("").len(), 3);
    }

    #[test]
    fn save_show_counts_gigs_and_clear_resets() {
        let mut profile = profile_with(&["Alpha"]);
        let slot = CurrentSlot {
            date: "2030-05-01".to_string(),
            time: "08:00".to_string(),
        };
        profile.save_show("morning", slot.clone(), Utc::now());
        profile.save_show("night", slot, Utc::now());
        assert_eq!(profile.stats().gigs, 2);
        assert_eq!(profile.current_show, "night");

        profile.clear_session();
        assert!(profile.queue().is_empty());
        assert_eq!(profile.stats(), &QueueStats::default());
        assert_eq!(profile.current_show, "");
    }

    #[test]
    fn expiry_is_measured_from_creation() {
        let created = Utc::now() - Duration::hours(25);
        let profile = DjProfile::new("sess", created);
        assert!(profile.is_expired(Utc::now(), Duration::hours(24)));
        assert!(!profile.is_expired(created + Duration::hours(1), Duration::hours(24)));
    }

    #[test]
    fn huge_ttl_never_expires() {
        let profile = DjProfile::new("sess", Utc::now());
        let ttl = Duration::seconds(9_000_000_000_000);
        assert!(!profile.is_expired(Utc::now(), ttl));
    }
}
