use super::session_record::SessionRecord;
use crate::radio::{DjProfile, ManagerProfile, ProducerProfile};
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};

pub trait ProfileStore: Send + Sync {
    /// Returns the session's DJ profile, creating it when absent.
    /// A profile created more than `ttl` ago is discarded and replaced.
    fn get_or_create_dj_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<DjProfile>;

    fn save_dj_profile(&self, profile: &DjProfile) -> Result<()>;

    /// Deletes DJ profiles created more than `ttl` before `now`.
    /// Returns the number of deleted profiles.
    fn prune_expired_dj_profiles(&self, now: DateTime<Utc>, ttl: Duration) -> Result<usize>;

    fn get_or_create_manager_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ManagerProfile>;

    /// Returns Ok(None) if the session has no manager profile.
    fn get_manager_profile(&self, session_id: &str) -> Result<Option<ManagerProfile>>;

    fn save_manager_profile(&self, profile: &ManagerProfile) -> Result<()>;

    fn get_or_create_producer_profile(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<ProducerProfile>;

    fn save_producer_profile(&self, profile: &ProducerProfile) -> Result<()>;

    /// Records that the session was seen, creating its record if needed.
    fn touch_session(&self, session_id: &str, now: DateTime<Utc>) -> Result<()>;

    /// Returns Ok(None) if the session is unknown.
    fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    fn set_last_page(
        &self,
        session_id: &str,
        role: &str,
        file: &str,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Removes the session record. Profile documents are left in place.
    /// Returns false if there was nothing to delete.
    fn delete_session(&self, session_id: &str) -> Result<bool>;

    /// Deletes session records not seen since `cutoff`.
    fn prune_stale_sessions(&self, cutoff: DateTime<Utc>) -> Result<usize>;
}
