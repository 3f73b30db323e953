use super::schema::{CATALOG_VERSIONED_SCHEMAS, GENRES_TABLE, SHOWS_TABLE, TRACKS_TABLE};
use super::trait_def::CatalogStore;
use crate::radio::{Genre, NewTrack, Show, ShowSlot, Track, TrackId};
use crate::sqlite_persistence::open_versioned;
use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

const TRACK_COLUMNS: &str = "id, title, artist, bpm, duration, mmss, created_at";
const SHOW_COLUMNS: &str =
    "slug, title, description, genre, display_order, slot_date, slot_time, slot_dj_name, slot_note";

#[derive(Clone)]
pub struct SqliteCatalogStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path.as_ref(), CATALOG_VERSIONED_SCHEMAS)
            .with_context(|| format!("Failed to open catalog db {:?}", db_path.as_ref()))?;
        Ok(SqliteCatalogStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Catalog connection mutex poisoned"))
    }

    fn parse_track_row(row: &Row) -> rusqlite::Result<Track> {
        Ok(Track {
            id: row.get(0)?,
            title: row.get(1)?,
            artist: row.get(2)?,
            bpm: row.get(3)?,
            duration: row.get(4)?,
            mmss: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn parse_show_row(row: &Row) -> rusqlite::Result<Show> {
        let slot = ShowSlot {
            date: row.get(5)?,
            time: row.get(6)?,
            dj_name: row.get(7)?,
            note: row.get(8)?,
        };
        Ok(Show {
            slug: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            genre: row.get(3)?,
            display_order: row.get(4)?,
            slots: vec![slot],
        })
    }

    fn get_track_inner(conn: &Connection, id: TrackId) -> Result<Option<Track>> {
        conn.query_row(
            &format!(
                "SELECT {} FROM {} WHERE id = ?1",
                TRACK_COLUMNS, TRACKS_TABLE.name
            ),
            params![id],
            Self::parse_track_row,
        )
        .optional()
        .with_context(|| format!("Failed to read track {}", id))
    }
}

impl CatalogStore for SqliteCatalogStore {
    fn create_track(&self, track: &NewTrack) -> Result<Track> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (title, artist, bpm, duration, mmss) VALUES (?1, ?2, ?3, ?4, ?5)",
                TRACKS_TABLE.name
            ),
            params![track.title, track.artist, track.bpm, track.duration, track.mmss],
        )
        .with_context(|| format!("Failed to insert track {}", track.title))?;
        let id = conn.last_insert_rowid();
        debug!("Created track {} ({})", id, track.title);
        Self::get_track_inner(&conn, id)?.context("Inserted track vanished")
    }

    fn get_track(&self, id: TrackId) -> Result<Option<Track>> {
        let conn = self.lock()?;
        Self::get_track_inner(&conn, id)
    }

    fn list_tracks(&self) -> Result<Vec<Track>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY title COLLATE NOCASE, id",
            TRACK_COLUMNS, TRACKS_TABLE.name
        ))?;
        let tracks = stmt
            .query_map([], Self::parse_track_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list tracks")?;
        Ok(tracks)
    }

    fn count_tracks(&self) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", TRACKS_TABLE.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn delete_track(&self, id: TrackId) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?1", TRACKS_TABLE.name),
                params![id],
            )
            .with_context(|| format!("Failed to delete track {}", id))?;
        Ok(deleted > 0)
    }

    fn save_show(&self, show: &Show) -> Result<()> {
        let slot = show.slot().cloned().unwrap_or_default();
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO {} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                SHOWS_TABLE.name, SHOW_COLUMNS
            ),
            params![
                show.slug,
                show.title,
                show.description,
                show.genre,
                show.display_order,
                slot.date,
                slot.time,
                slot.dj_name,
                slot.note
            ],
        )
        .with_context(|| format!("Failed to save show {}", show.slug))?;
        Ok(())
    }

    fn get_show(&self, slug: &str) -> Result<Option<Show>> {
        let conn = self.lock()?;
        conn.query_row(
            &format!(
                "SELECT {} FROM {} WHERE slug = ?1",
                SHOW_COLUMNS, SHOWS_TABLE.name
            ),
            params![slug],
            Self::parse_show_row,
        )
        .optional()
        .with_context(|| format!("Failed to read show {}", slug))
    }

    fn list_shows(&self) -> Result<Vec<Show>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM {} ORDER BY display_order, slug",
            SHOW_COLUMNS, SHOWS_TABLE.name
        ))?;
        let shows = stmt
            .query_map([], Self::parse_show_row)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list shows")?;
        Ok(shows)
    }

    fn add_genre(&self, name: &str) -> Result<Genre> {
        let conn = self.lock()?;
        conn.execute(
            &format!("INSERT INTO {} (name) VALUES (?1)", GENRES_TABLE.name),
            params![name],
        )
        .with_context(|| format!("Failed to add genre {}", name))?;
        Ok(Genre {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    fn list_genres(&self) -> Result<Vec<Genre>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT id, name FROM {} ORDER BY name",
            GENRES_TABLE.name
        ))?;
        let genres = stmt
            .query_map([], |row| {
                Ok(Genre {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to list genres")?;
        Ok(genres)
    }
}
