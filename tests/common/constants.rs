//! Shared constants for end-to-end tests
//!
//! When seed data changes, update only this file.

#![allow(dead_code)]

// ============================================================================
// Seeded catalog
// ============================================================================

/// Number of tracks written by the startup seed
pub const SEEDED_TRACK_COUNT: usize = 4;

/// Seeded track titles, sorted the way the catalog lists them
pub const SEEDED_TRACK_TITLES: &[&str] = &[
    "Campus Sunrise",
    "Late Lab Night",
    "Library Lo-Fi",
    "Stadium Anthem",
];

/// Seeded genre names, sorted by name
pub const SEEDED_GENRES: &[&str] = &["EDM", "House", "Lo-Fi", "Synthwave"];

pub const SHOW_MORNING: &str = "morning";
pub const SHOW_DRIVE: &str = "drive";
pub const SHOW_NIGHT: &str = "night";

/// Number of schedule slots in the seeded manager template
pub const TEMPLATE_SLOT_COUNT: usize = 4;

/// A date safely in the future for manager schedule slots
pub const FUTURE_DATE: &str = "2099-06-01";

// ============================================================================
// Timeouts
// ============================================================================

pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
