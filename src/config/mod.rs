mod file_config;

pub use file_config::FileConfig;

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// Upper bound for every configured duration: ten years.
pub const MAX_DURATION_SEC: u64 = 10 * 365 * 24 * 60 * 60;

/// Converts configured seconds to a `chrono::Duration`, capped at `MAX_DURATION_SEC`.
pub fn bounded_duration(seconds: u64) -> chrono::Duration {
    let seconds = seconds.min(MAX_DURATION_SEC) as i64;
    chrono::Duration::try_seconds(seconds).unwrap_or_else(|| chrono::Duration::days(3650))
}

fn check_duration(name: &str, seconds: u64) -> Result<()> {
    if seconds == 0 {
        bail!("{} must be greater than zero", name);
    }
    if seconds > MAX_DURATION_SEC {
        bail!(
            "{} must be at most {} seconds (ten years)",
            name,
            MAX_DURATION_SEC
        );
    }
    Ok(())
}

/// CLI arguments that can be overridden by the TOML config.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub db_dir: Option<PathBuf>,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub dj_profile_ttl_sec: u64,
    pub session_max_age_sec: u64,
    pub prune_interval_hours: u64,
    pub no_seed: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_dir: PathBuf,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub frontend_dir_path: Option<String>,
    pub dj_profile_ttl_sec: u64,
    pub session_max_age_sec: u64,
    pub prune_interval_hours: u64,
    pub seed: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_dir = file
            .db_dir
            .map(PathBuf::from)
            .or_else(|| cli.db_dir.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_dir must be specified via --db-dir or in config file")
            })?;

        if !db_dir.exists() {
            bail!("Database directory does not exist: {:?}", db_dir);
        }
        if !db_dir.is_dir() {
            bail!("db_dir is not a directory: {:?}", db_dir);
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        let dj_profile_ttl_sec = file.dj_profile_ttl_sec.unwrap_or(cli.dj_profile_ttl_sec);
        check_duration("dj_profile_ttl_sec", dj_profile_ttl_sec)?;
        let session_max_age_sec = file.session_max_age_sec.unwrap_or(cli.session_max_age_sec);
        check_duration("session_max_age_sec", session_max_age_sec)?;
        let prune_interval_hours = file
            .prune_interval_hours
            .unwrap_or(cli.prune_interval_hours);
        check_duration(
            "prune_interval_hours",
            prune_interval_hours.saturating_mul(60 * 60),
        )?;

        Ok(Self {
            db_dir,
            port: file.port.unwrap_or(cli.port),
            logging_level,
            frontend_dir_path: file
                .frontend_dir_path
                .or_else(|| cli.frontend_dir_path.clone()),
            dj_profile_ttl_sec,
            session_max_age_sec,
            prune_interval_hours,
            seed: file.seed.unwrap_or(!cli.no_seed),
        })
    }

    pub fn catalog_db_path(&self) -> PathBuf {
        self.db_dir.join("catalog.db")
    }

    pub fn profiles_db_path(&self) -> PathBuf {
        self.db_dir.join("profiles.db")
    }

    pub fn dj_profile_ttl(&self) -> chrono::Duration {
        bounded_duration(self.dj_profile_ttl_sec)
    }

    pub fn session_max_age(&self) -> chrono::Duration {
        bounded_duration(self.session_max_age_sec)
    }

    pub fn prune_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.prune_interval_hours
                .saturating_mul(60 * 60)
                .min(MAX_DURATION_SEC),
        )
    }
}

fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
