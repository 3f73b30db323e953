//! SQLite schema for the station catalog: tracks, shows and genres.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema, DEFAULT_TIMESTAMP};

pub const TRACKS_TABLE: Table = Table {
    name: "tracks",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "artist",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!(
            "bpm",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("duration", &SqlType::Integer, non_null = true), // seconds
        sqlite_column!("mmss", &SqlType::Text, non_null = true),
        sqlite_column!(
            "created_at",
            &SqlType::Integer,
            non_null = true,
            default_value = Some(DEFAULT_TIMESTAMP)
        ),
    ],
    indices: &[("idx_tracks_title", "title")],
    unique_constraints: &[],
};

/// Shows carry exactly one slot, stored inline.
pub const SHOWS_TABLE: Table = Table {
    name: "shows",
    columns: &[
        sqlite_column!("slug", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!(
            "description",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!(
            "genre",
            &SqlType::Text,
            non_null = true,
            default_value = Some("''")
        ),
        sqlite_column!(
            "display_order",
            &SqlType::Integer,
            non_null = true,
            default_value = Some("0")
        ),
        sqlite_column!("slot_date", &SqlType::Text, non_null = true),
        sqlite_column!("slot_time", &SqlType::Text, non_null = true),
        sqlite_column!("slot_dj_name", &SqlType::Text, non_null = true),
        sqlite_column!("slot_note", &SqlType::Text, non_null = true),
    ],
    indices: &[("idx_shows_display_order", "display_order")],
    unique_constraints: &[],
};

pub const GENRES_TABLE: Table = Table {
    name: "genres",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
    ],
    indices: &[],
    unique_constraints: &[&["name"]],
};

pub const CATALOG_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[TRACKS_TABLE, SHOWS_TABLE, GENRES_TABLE],
    migration: None,
}];
