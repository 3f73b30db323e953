use chrono::{DateTime, Utc};
use serde::Serialize;

/// Server-side state of an anonymous browser session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub session_id: String,
    pub last_role: Option<String>,
    pub last_role_file: Option<String>,
    pub last_visited_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}
