use super::RequestsLoggingLevel;
use crate::config::bounded_duration;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub frontend_dir_path: Option<String>,
    /// DJ profiles older than this are discarded.
    pub dj_profile_ttl_sec: u64,
    pub session_max_age_sec: u64,
}

impl ServerConfig {
    pub fn dj_profile_ttl(&self) -> chrono::Duration {
        bounded_duration(self.dj_profile_ttl_sec)
    }

    pub fn session_max_age(&self) -> chrono::Duration {
        bounded_duration(self.session_max_age_sec)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3000,
            frontend_dir_path: None,
            dj_profile_ttl_sec: 86400,
            session_max_age_sec: 86400,
        }
    }
}
