//! Station domain: catalog entities and the per-session role profiles.

pub mod dj_profile;
pub mod duration;
pub mod error;
pub mod manager_profile;
pub mod ordered_list;
pub mod producer_profile;
pub mod show;
pub mod track;

pub use dj_profile::{CurrentSlot, DjProfile, ManualTrack, QueueEntry, QueueStats};
pub use duration::{format_mmss, parse_mmss, parse_queue_duration};
pub use error::{RadioError, RadioResult};
pub use manager_profile::{
    schedule_overview, DjHighlight, ManagerProfile, ManagerStats, NewScheduleSlot, NewSongReport,
    ScheduleOverview, ScheduleSlot, ScheduleSlotUpdate, SongReport, DEFAULT_MANAGER_SESSION,
};
pub use ordered_list::{OrderedList, Positioned};
pub use producer_profile::{
    Bin, BinCounts, Booking, Playlist, ProducerProfile, ProducerStats, RotationItem,
    RunOfShowItem,
};
pub use show::{Genre, Show, ShowSlot};
pub use track::{NewTrack, Track, TrackId};
