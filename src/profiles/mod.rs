mod profile_store;
mod session_record;
mod sqlite_profile_store;

pub use profile_store::ProfileStore;
pub use session_record::SessionRecord;
pub use sqlite_profile_store::{SqliteProfileStore, PROFILES_VERSIONED_SCHEMAS};
