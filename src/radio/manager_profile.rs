//! Manager schedule profile.
//!
//! At most one schedule slot is featured at any time. Song reports are an
//! append-only log.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::{RadioError, RadioResult};
use super::ordered_list::OrderedList;

/// Session id of the read-only template shown to sessions with an empty schedule.
pub const DEFAULT_MANAGER_SESSION: &str = "default-manager-session";

pub const UPCOMING_DJS_SHOWN: usize = 3;

const TBA: &str = "TBA";

lazy_static! {
    static ref DJ_NAME_PATTERN: Regex = Regex::new(r"^[A-Za-z\s]+$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSlot {
    pub date: String,
    pub time: String,
    pub time_slot: String,
    pub dj_name: String,
    pub genre: String,
    pub is_featured: bool,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewScheduleSlot {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub dj_name: String,
    #[serde(default)]
    pub genre: String,
}

/// Partial update merged over an existing slot.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleSlotUpdate {
    pub date: Option<String>,
    pub time: Option<String>,
    pub dj_name: Option<String>,
    pub genre: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongReport {
    pub assigned_song: String,
    pub dj_name: String,
    pub status: String,
    pub icon: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSongReport {
    #[serde(default)]
    pub assigned_song: String,
    #[serde(default)]
    pub dj_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DjHighlight {
    pub name: String,
    pub genre: String,
    pub time_slot: String,
}

impl DjHighlight {
    fn from_slot(slot: &ScheduleSlot) -> Self {
        Self {
            name: slot.dj_name.clone(),
            genre: slot.genre.clone(),
            time_slot: slot.time_slot.clone(),
        }
    }

    fn nobody() -> Self {
        Self {
            name: "No DJ scheduled".to_string(),
            genre: "N/A".to_string(),
            time_slot: "N/A".to_string(),
        }
    }

    fn tba() -> Self {
        Self {
            name: TBA.to_string(),
            genre: TBA.to_string(),
            time_slot: TBA.to_string(),
        }
    }

    pub fn is_tba(&self) -> bool {
        self.name == TBA
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManagerStats {
    pub djs_scheduled: usize,
    pub active_shows: usize,
    pub song_reports: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleOverview {
    pub featured_dj: DjHighlight,
    pub upcoming_djs: Vec<DjHighlight>,
    pub stats: ManagerStats,
}

/// Featured DJ is the flagged slot, or the first slot when none is flagged.
/// Upcoming DJs are the remaining slots in order, padded with `TBA`.
pub fn schedule_overview(schedule: &[ScheduleSlot], song_reports: usize) -> ScheduleOverview {
    let featured_index = schedule
        .iter()
        .position(|slot| slot.is_featured)
        .or(if schedule.is_empty() { None } else { Some(0) });

    let featured_dj = featured_index
        .map(|index| DjHighlight::from_slot(&schedule[index]))
        .unwrap_or_else(DjHighlight::nobody);

    let mut upcoming_djs: Vec<DjHighlight> = schedule
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != featured_index)
        .take(UPCOMING_DJS_SHOWN)
        .map(|(_, slot)| DjHighlight::from_slot(slot))
        .collect();
    while upcoming_djs.len() < UPCOMING_DJS_SHOWN {
        upcoming_djs.push(DjHighlight::tba());
    }

    let stats = ManagerStats {
        djs_scheduled: schedule.len(),
        active_shows: upcoming_djs.iter().filter(|dj| !dj.is_tba()).count(),
        song_reports,
    };

    ScheduleOverview {
        featured_dj,
        upcoming_djs,
        stats,
    }
}

/// `"{hour}:00 - {hour+1}:00"` for an `HH:MM` start time.
pub fn time_slot_label(time: &str) -> RadioResult<String> {
    let hour = time
        .split(':')
        .next()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .ok_or_else(|| RadioError::validation(format!("Invalid time: {}", time)))?;
    Ok(format!("{}:00 - {}:00", hour, hour + 1))
}

fn parse_start(date: &str, time: &str) -> RadioResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| RadioError::validation(format!("Invalid date: {}", date)))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| RadioError::validation(format!("Invalid time: {}", time)))?;
    Ok(date.and_time(time))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerProfile {
    pub session_id: String,
    pub user_id: Option<String>,
    schedule: OrderedList<ScheduleSlot>,
    song_reports: Vec<SongReport>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ManagerProfile {
    pub fn new(session_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            session_id: session_id.to_string(),
            user_id: None,
            schedule: OrderedList::new(),
            song_reports: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn schedule(&self) -> &[ScheduleSlot] {
        self.schedule.as_slice()
    }

    pub fn song_reports(&self) -> &[SongReport] {
        &self.song_reports
    }

    pub fn featured_index(&self) -> Option<usize> {
        self.schedule.iter().position(|slot| slot.is_featured)
    }

    pub fn stats(&self) -> ManagerStats {
        self.overview().stats
    }

    pub fn overview(&self) -> ScheduleOverview {
        schedule_overview(self.schedule.as_slice(), self.song_reports.len())
    }

    /// Validates a slot against the schedule, ignoring the entry at `skip`.
    /// The start is checked against `now` only when `check_past` is set.
    fn validate_slot(
        &self,
        slot: &NewScheduleSlot,
        skip: Option<usize>,
        now: NaiveDateTime,
        check_past: bool,
    ) -> RadioResult<String> {
        if slot.date.trim().is_empty()
            || slot.time.trim().is_empty()
            || slot.dj_name.trim().is_empty()
            || slot.genre.trim().is_empty()
        {
            return Err(RadioError::validation("All fields required"));
        }
        if !DJ_NAME_PATTERN.is_match(&slot.dj_name) {
            return Err(RadioError::validation(
                "DJ name can only contain letters and spaces",
            ));
        }
        let start = parse_start(&slot.date, &slot.time)?;
        if check_past && start < now {
            return Err(RadioError::validation("Cannot select a time in the past"));
        }

        let wanted = slot.dj_name.trim().to_lowercase();
        let is_duplicate = self
            .schedule
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != skip)
            .any(|(_, existing)| existing.dj_name.trim().to_lowercase() == wanted);
        if is_duplicate {
            return Err(RadioError::DuplicateDj(slot.dj_name.trim().to_string()));
        }

        time_slot_label(&slot.time)
    }

    /// `now` is the local wall-clock time the slot must not precede.
    pub fn add_to_schedule(
        &mut self,
        slot: NewScheduleSlot,
        now: NaiveDateTime,
        added_at: DateTime<Utc>,
    ) -> RadioResult<&ScheduleSlot> {
        let time_slot = self.validate_slot(&slot, None, now, true)?;
        self.schedule.push(ScheduleSlot {
            date: slot.date,
            time: slot.time,
            time_slot,
            dj_name: slot.dj_name.trim().to_string(),
            genre: slot.genre,
            is_featured: false,
            added_at,
        });
        self.schedule.get(self.schedule.len() - 1)
    }

    pub fn update_schedule(
        &mut self,
        index: usize,
        update: ScheduleSlotUpdate,
        now: NaiveDateTime,
    ) -> RadioResult<&ScheduleSlot> {
        let current = self.schedule.get(index)?;
        // A slot already on air can still be edited as long as it is not moved.
        let reschedules = update.date.is_some() || update.time.is_some();
        let merged = NewScheduleSlot {
            date: update.date.unwrap_or_else(|| current.date.clone()),
            time: update.time.unwrap_or_else(|| current.time.clone()),
            dj_name: update.dj_name.unwrap_or_else(|| current.dj_name.clone()),
            genre: update.genre.unwrap_or_else(|| current.genre.clone()),
        };
        let time_slot = self.validate_slot(&merged, Some(index), now, reschedules)?;

        let slot = self.schedule.get_mut(index)?;
        slot.date = merged.date;
        slot.time = merged.time;
        slot.time_slot = time_slot;
        slot.dj_name = merged.dj_name.trim().to_string();
        slot.genre = merged.genre;
        Ok(&*slot)
    }

    pub fn remove_from_schedule(&mut self, index: usize) -> RadioResult<ScheduleSlot> {
        self.schedule.remove_at(index)
    }

    /// Validates first, then clears every flag and sets the target.
    pub fn set_featured(&mut self, index: usize) -> RadioResult<()> {
        self.schedule.check_index(index)?;
        for position in 0..self.schedule.len() {
            self.schedule.get_mut(position)?.is_featured = position == index;
        }
        Ok(())
    }

    pub fn add_song_report(&mut self, report: NewSongReport, now: DateTime<Utc>) -> RadioResult<&SongReport> {
        if report.assigned_song.trim().is_empty()
            || report.dj_name.trim().is_empty()
            || report.status.trim().is_empty()
        {
            return Err(RadioError::validation(
                "Song, DJ name and status are required",
            ));
        }
        self.song_reports.push(SongReport {
            assigned_song: report.assigned_song.trim().to_string(),
            dj_name: report.dj_name.trim().to_string(),
            status: report.status.trim().to_string(),
            icon: report.icon.trim().to_string(),
            date: now,
        });
        Ok(&self.song_reports[self.song_reports.len() - 1])
    }
}
