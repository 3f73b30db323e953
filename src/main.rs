use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use std::path::PathBuf;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use campus_radio_server::config;
use campus_radio_server::profiles::{ProfileStore, SqliteProfileStore};
use campus_radio_server::seed::{seed_catalog, seed_manager_template};
use campus_radio_server::server::{run_server, RequestsLoggingLevel, ServerConfig};
use campus_radio_server::SqliteCatalogStore;

fn parse_path(s: &str) -> Result<PathBuf, String> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(format!("Error resolving path '{}': {}", s, msg));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir().map_err(|e| format!("Failed to get current dir: {}", e))?;
    Ok(cwd.join(original_path))
}

fn parse_dir(s: &str) -> Result<PathBuf, String> {
    let path = parse_path(s)?;
    if !path.exists() {
        return Err(format!("Directory does not exist: {}", s));
    }
    if !path.is_dir() {
        return Err(format!("Path is not a directory: {}", s));
    }
    Ok(path)
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to TOML configuration file. Values in the file override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Directory containing the database files (catalog.db, profiles.db).
    /// Can also be specified in config file.
    #[clap(long, value_parser = parse_dir)]
    pub db_dir: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Path to the frontend directory to be statically served.
    #[clap(long)]
    pub frontend_dir_path: Option<String>,

    /// DJ profiles are discarded this many seconds after creation.
    #[clap(long, default_value_t = 86400)]
    pub dj_profile_ttl_sec: u64,

    /// Max age of the session cookie, and of idle session records.
    #[clap(long, default_value_t = 86400)]
    pub session_max_age_sec: u64,

    /// Interval in hours between pruning runs.
    #[clap(long, default_value_t = 1)]
    pub prune_interval_hours: u64,

    /// Skip seeding sample tracks, shows and the manager template.
    #[clap(long)]
    pub no_seed: bool,
}

impl From<&CliArgs> for config::CliConfig {
    fn from(args: &CliArgs) -> Self {
        config::CliConfig {
            db_dir: args.db_dir.clone(),
            port: args.port,
            logging_level: args.logging_level.clone(),
            frontend_dir_path: args.frontend_dir_path.clone(),
            dj_profile_ttl_sec: args.dj_profile_ttl_sec,
            session_max_age_sec: args.session_max_age_sec,
            prune_interval_hours: args.prune_interval_hours,
            no_seed: args.no_seed,
        }
    }
}

fn spawn_pruning(profile_store: Arc<SqliteProfileStore>, app_config: &config::AppConfig) {
    let interval_hours = app_config.prune_interval_hours;
    let interval = app_config.prune_interval();
    let dj_profile_ttl = app_config.dj_profile_ttl();
    let session_max_age = app_config.session_max_age();

    info!(
        "Profile pruning enabled: DJ profiles expire after {}s, pruning every {} hours",
        app_config.dj_profile_ttl_sec, interval_hours
    );

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);

        // Skip the first immediate tick, wait for the first interval
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let now = Utc::now();

            match profile_store.prune_expired_dj_profiles(now, dj_profile_ttl) {
                Ok(count) if count > 0 => info!("Pruned {} expired DJ profiles", count),
                Ok(_) => {}
                Err(e) => error!("Failed to prune DJ profiles: {:#}", e),
            }
            match profile_store.prune_stale_sessions(now - session_max_age) {
                Ok(count) if count > 0 => info!("Pruned {} stale sessions", count),
                Ok(_) => {}
                Err(e) => error!("Failed to prune sessions: {:#}", e),
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    // Load TOML config if provided
    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            Some(config::FileConfig::load(path)?)
        }
        None => None,
    };

    // Resolve final configuration (TOML overrides CLI)
    let cli_config: config::CliConfig = (&cli_args).into();
    let app_config = config::AppConfig::resolve(&cli_config, file_config)?;

    info!("Configuration loaded:");
    info!("  db_dir: {:?}", app_config.db_dir);
    info!("  port: {}", app_config.port);

    info!(
        "Opening SQLite catalog database at {:?}...",
        app_config.catalog_db_path()
    );
    let catalog_store = Arc::new(SqliteCatalogStore::new(app_config.catalog_db_path())?);

    info!(
        "Opening SQLite profiles database at {:?}...",
        app_config.profiles_db_path()
    );
    let profile_store = Arc::new(SqliteProfileStore::new(app_config.profiles_db_path())?);

    if app_config.seed {
        seed_catalog(catalog_store.as_ref())?;
        seed_manager_template(profile_store.as_ref())?;
    } else {
        info!("Seeding disabled");
    }

    spawn_pruning(profile_store.clone(), &app_config);

    let server_config = ServerConfig {
        requests_logging_level: app_config.logging_level.clone(),
        port: app_config.port,
        frontend_dir_path: app_config.frontend_dir_path.clone(),
        dj_profile_ttl_sec: app_config.dj_profile_ttl_sec,
        session_max_age_sec: app_config.session_max_age_sec,
    };

    info!("Ready to serve at port {}!", app_config.port);
    run_server(server_config, catalog_store, profile_store, shutdown_signal()).await
}
