use super::profile_store::ProfileStore;
use super::session_record::SessionRecord;
use crate::radio::{DjProfile, ManagerProfile, ProducerProfile};
use crate::sqlite_column;
use crate::sqlite_persistence::{open_versioned, Column, SqlType, Table, VersionedSchema};
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// Profile documents are stored as JSON, one row per session.
macro_rules! profile_table {
    ($name:expr, $index:expr) => {
        Table {
            name: $name,
            columns: &[
                sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
                sqlite_column!("session_id", &SqlType::Text, non_null = true),
                sqlite_column!("document", &SqlType::Text, non_null = true),
                sqlite_column!("created_at", &SqlType::Integer, non_null = true),
                sqlite_column!("updated_at", &SqlType::Integer, non_null = true),
            ],
            indices: &[($index, "created_at")],
            unique_constraints: &[&["session_id"]],
        }
    };
}

/// V 0
const DJ_PROFILES_TABLE_V_0: Table = profile_table!("dj_profiles", "idx_dj_profiles_created_at");
const MANAGER_PROFILES_TABLE_V_0: Table =
    profile_table!("manager_profiles", "idx_manager_profiles_created_at");
const PRODUCER_PROFILES_TABLE_V_0: Table =
    profile_table!("producer_profiles", "idx_producer_profiles_created_at");

const SESSIONS_TABLE_V_0: Table = Table {
    name: "sessions",
    columns: &[
        sqlite_column!("session_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("last_role", &SqlType::Text),
        sqlite_column!("last_role_file", &SqlType::Text),
        sqlite_column!("last_visited_at", &SqlType::Integer),
        sqlite_column!("created_at", &SqlType::Integer, non_null = true),
        sqlite_column!("last_seen_at", &SqlType::Integer, non_null = true),
    ],
    indices: &[("idx_sessions_last_seen_at", "last_seen_at")],
    unique_constraints: &[],
};

pub const PROFILES_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        DJ_PROFILES_TABLE_V_0,
        MANAGER_PROFILES_TABLE_V_0,
        PRODUCER_PROFILES_TABLE_V_0,
        SESSIONS_TABLE_V_0,
    ],
    migration: None,
}];

fn from_timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0).with_context(|| format!("Invalid timestamp {}", secs))
}

fn read_document<T: DeserializeOwned>(
    conn: &Connection,
    table: &Table,
    session_id: &str,
) -> Result<Option<T>> {
    let document: Option<String> = conn
        .query_row(
            &format!("SELECT document FROM {} WHERE session_id = ?1", table.name),
            params![session_id],
            |row| row.get(0),
        )
        .optional()
        .with_context(|| format!("Failed to read {} for session {}", table.name, session_id))?;

    document
        .map(|json| {
            serde_json::from_str(&json)
                .with_context(|| format!("Corrupted {} document for session {}", table.name, session_id))
        })
        .transpose()
}

/// Inserts the document unless the session already has one, then returns
/// whichever document the table holds.
fn insert_document<T: Serialize + DeserializeOwned>(
    conn: &Connection,
    table: &Table,
    session_id: &str,
    document: &T,
    created_at: DateTime<Utc>,
) -> Result<T> {
    let json = serde_json::to_string(document)?;
    conn.execute(
        &format!(
            "INSERT OR IGNORE INTO {} (session_id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            table.name
        ),
        params![session_id, json, created_at.timestamp()],
    )
    .with_context(|| format!("Failed to create {} for session {}", table.name, session_id))?;
    read_document(conn, table, session_id)?
        .with_context(|| format!("Missing {} for session {} after insert", table.name, session_id))
}

fn write_document<T: Serialize>(
    conn: &Connection,
    table: &Table,
    session_id: &str,
    document: &T,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> Result<()> {
    let json = serde_json::to_string(document)?;
    conn.execute(
        &format!(
            "INSERT INTO {} (session_id, document, created_at, updated_at) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(session_id) DO UPDATE SET document = excluded.document, updated_at = excluded.updated_at",
            table.name
        ),
        params![session_id, json, created_at.timestamp(), updated_at.timestamp()],
    )
    .with_context(|| format!("Failed to save {} for session {}", table.name, session_id))?;
    Ok(())
}

#[derive(Clone)]
pub struct SqliteProfileStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProfileStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = open_versioned(db_path.as_ref(), PROFILES_VERSIONED_SCHEMAS)
            .with_context(|| format!("Failed to open profiles db {:?}", db_path.as_ref()))?;
        Ok(SqliteProfileStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Profiles connection mutex poisoned"))
    }
}

impl ProfileStore for SqliteProfileStore {
    fn get_or_create_dj_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<DjProfile> {
        let conn = self.lock()?;
        if let Some(profile) = read_document::<DjProfile>(&conn, &DJ_PROFILES_TABLE_V_0, session_id)? {
            if !profile.is_expired(now, ttl) {
                return Ok(profile);
            }
            info!("DJ profile of session {} expired, starting a new one", session_id);
            conn.execute(
                &format!(
                    "DELETE FROM {} WHERE session_id = ?1",
                    DJ_PROFILES_TABLE_V_0.name
                ),
                params![session_id],
            )?;
        }

        let profile = insert_document(
            &conn,
            &DJ_PROFILES_TABLE_V_0,
            session_id,
            &DjProfile::new(session_id, now),
            now,
        )?;
        debug!("Created DJ profile for session {}", session_id);
        Ok(profile)
    }

    fn save_dj_profile(&self, profile: &DjProfile) -> Result<()> {
        let conn = self.lock()?;
        write_document(
            &conn,
            &DJ_PROFILES_TABLE_V_0,
            &profile.session_id,
            profile,
            profile.created_at,
            profile.updated_at,
        )
    }

    fn prune_expired_dj_profiles(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize> {
        let Some(cutoff) = now.checked_sub_signed(ttl) else {
            return Ok(0);
        };
        let conn = self.lock()?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE created_at <= ?1",
                DJ_PROFILES_TABLE_V_0.name
            ),
            params![cutoff.timestamp()],
        )?;
        Ok(deleted)
    }

    fn get_or_create_manager_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ManagerProfile> {
        let conn = self.lock()?;
        if let Some(profile) = read_document(&conn, &MANAGER_PROFILES_TABLE_V_0, session_id)? {
            return Ok(profile);
        }
        let profile = insert_document(
            &conn,
            &MANAGER_PROFILES_TABLE_V_0,
            session_id,
            &ManagerProfile::new(session_id, now),
            now,
        )?;
        debug!("Created manager profile for session {}", session_id);
        Ok(profile)
    }

    fn get_manager_profile(&self, session_id: &str) -> Result<Option<ManagerProfile>> {
        let conn = self.lock()?;
        read_document(&conn, &MANAGER_PROFILES_TABLE_V_0, session_id)
    }

    fn save_manager_profile(&self, profile: &ManagerProfile) -> Result<()> {
        let conn = self.lock()?;
        write_document(
            &conn,
            &MANAGER_PROFILES_TABLE_V_0,
            &profile.session_id,
            profile,
            profile.created_at,
            profile.updated_at,
        )
    }

    fn get_or_create_producer_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ProducerProfile> {
        let conn = self.lock()?;
        if let Some(profile) = read_document(&conn, &PRODUCER_PROFILES_TABLE_V_0, session_id)? {
            return Ok(profile);
        }
        let profile = insert_document(
            &conn,
            &PRODUCER_PROFILES_TABLE_V_0,
            session_id,
            &ProducerProfile::new(session_id, now),
            now,
        )?;
        debug!("Created producer profile for session {}", session_id);
        Ok(profile)
    }

    fn save_producer_profile(&self, profile: &ProducerProfile) -> Result<()> {
        let conn = self.lock()?;
        write_document(
            &conn,
            &PRODUCER_PROFILES_TABLE_V_0,
            &profile.session_id,
            profile,
            profile.created_at,
            profile.updated_at,
        )
    }

    fn touch_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (session_id, created_at, last_seen_at) VALUES (?1, ?2, ?2) \
                 ON CONFLICT(session_id) DO UPDATE SET last_seen_at = excluded.last_seen_at",
                SESSIONS_TABLE_V_0.name
            ),
            params![session_id, now.timestamp()],
        )
        .with_context(|| format!("Failed to touch session {}", session_id))?;
        Ok(())
    }

    fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                &format!(
                    "SELECT last_role, last_role_file, last_visited_at, created_at, last_seen_at FROM {} WHERE session_id = ?1",
                    SESSIONS_TABLE_V_0.name
                ),
                params![session_id],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                        row.get::<_, Option<i64>>(2)?,
                        row.get::<_, i64>(3)?,
                        row.get::<_, i64>(4)?,
                    ))
                },
            )
            .optional()?;

        let Some((last_role, last_role_file, last_visited_at, created_at, last_seen_at)) = row
        else {
            return Ok(None);
        };
        Ok(Some(SessionRecord {
            session_id: session_id.to_string(),
            last_role,
            last_role_file,
            last_visited_at: last_visited_at.map(from_timestamp).transpose()?,
            created_at: from_timestamp(created_at)?,
            last_seen_at: from_timestamp(last_seen_at)?,
        }))
    }

    fn set_last_page(
        &self,
        session_id: &str,
        role: &str,
        file: &str,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO {} (session_id, last_role, last_role_file, last_visited_at, created_at, last_seen_at) \
                 VALUES (?1, ?2, ?3, ?4, ?4, ?4) \
                 ON CONFLICT(session_id) DO UPDATE SET last_role = excluded.last_role, \
                 last_role_file = excluded.last_role_file, last_visited_at = excluded.last_visited_at, \
                 last_seen_at = excluded.last_seen_at",
                SESSIONS_TABLE_V_0.name
            ),
            params![session_id, role, file, now.timestamp()],
        )
        .with_context(|| format!("Failed to set last page of session {}", session_id))?;
        Ok(())
    }

    fn delete_session(&self, session_id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE session_id = ?1",
                SESSIONS_TABLE_V_0.name
            ),
            params![session_id],
        )?;
        Ok(deleted > 0)
    }

    fn prune_stale_sessions(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let conn = self.lock()?;
        let deleted = conn.execute(
            &format!(
                "DELETE FROM {} WHERE last_seen_at < ?1",
                SESSIONS_TABLE_V_0.name
            ),
            params![cutoff.timestamp()],
        )?;
        Ok(deleted)
    }
}
