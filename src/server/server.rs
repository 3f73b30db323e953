use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;

use axum::{
    extract::State,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::info;

use super::dj_routes::make_dj_routes;
use super::error::{ApiError, ApiJson, ApiResult};
use super::manager_routes::make_manager_routes;
use super::producer_routes::make_producer_routes;
use super::session::{expired_session_cookie, track_session, SessionEnded, SessionId};
use super::{log_requests, state::*, ServerConfig};
use crate::profiles::ProfileStore;
use crate::radio::DEFAULT_MANAGER_SESSION;
use std::sync::Arc;

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Serialize)]
struct HomeResponse {
    uptime: String,
    last_role: Option<String>,
    last_role_file: Option<String>,
    last_visited_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct SessionDataResponse {
    session_id: String,
    last_role: Option<String>,
    last_role_file: Option<String>,
    last_visited_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct AuthStatusResponse {
    authenticated: bool,
    session_id: String,
    last_role: Option<String>,
    user_id: Option<String>,
    expires_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
struct SetLastPageBody {
    #[serde(default)]
    role: String,
    #[serde(default)]
    file: String,
}

#[derive(Serialize)]
struct SetLastPageResponse {
    success: bool,
    last_role: Option<String>,
    last_visited_at: Option<DateTime<Utc>>,
}

/// Records the role dashboard a session last opened.
pub(super) fn record_role_visit(state: &ServerState, session: &SessionId, role: &str, file: &str) -> Result<()> {
    state
        .profile_store
        .set_last_page(session.as_str(), role, file, Utc::now())
}

async fn home(State(state): State<ServerState>, session: SessionId) -> ApiResult<Json<HomeResponse>> {
    // First visit starts the DJ profile and its expiry clock.
    state.profile_store.get_or_create_dj_profile(
        session.as_str(),
        Utc::now(),
        state.config.dj_profile_ttl(),
    )?;
    let record = state.profile_store.get_session(session.as_str())?;
    Ok(Json(HomeResponse {
        uptime: format_uptime(state.start_time.elapsed()),
        last_role: record.as_ref().and_then(|r| r.last_role.clone()),
        last_role_file: record.as_ref().and_then(|r| r.last_role_file.clone()),
        last_visited_at: record.and_then(|r| r.last_visited_at),
    }))
}

async fn session_data(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<SessionDataResponse>> {
    let record = state.profile_store.get_session(session.as_str())?;
    Ok(Json(SessionDataResponse {
        session_id: session.0.clone(),
        last_role: record.as_ref().and_then(|r| r.last_role.clone()),
        last_role_file: record.as_ref().and_then(|r| r.last_role_file.clone()),
        last_visited_at: record.and_then(|r| r.last_visited_at),
    }))
}

async fn set_last_page(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<SetLastPageBody>,
) -> ApiResult<Json<SetLastPageResponse>> {
    if body.role.trim().is_empty() || body.file.trim().is_empty() {
        return Err(ApiError::BadRequest("Missing role or file".to_string()));
    }
    if !body.file.eq_ignore_ascii_case("index.html") {
        record_role_visit(&state, &session, &body.role, &body.file)?;
    }

    let record = state.profile_store.get_session(session.as_str())?;
    Ok(Json(SetLastPageResponse {
        success: true,
        last_role: record.as_ref().and_then(|r| r.last_role.clone()),
        last_visited_at: record.and_then(|r| r.last_visited_at),
    }))
}

async fn auth_status(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<AuthStatusResponse>> {
    let record = state.profile_store.get_session(session.as_str())?;
    let last_seen = record.as_ref().map(|r| r.last_seen_at).unwrap_or_else(Utc::now);
    let expires_at = last_seen
        .checked_add_signed(state.config.session_max_age())
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    Ok(Json(AuthStatusResponse {
        authenticated: true,
        session_id: session.0.clone(),
        last_role: record.and_then(|r| r.last_role),
        user_id: None,
        expires_at,
    }))
}

/// Ends the browser session. Profile documents stay in the database.
async fn logout(State(state): State<ServerState>, session: SessionId) -> ApiResult<Response> {
    state.profile_store.delete_session(session.as_str())?;
    info!("Session {} logged out", session.as_str());

    let mut response = (
        [(
            axum::http::header::SET_COOKIE,
            expired_session_cookie().to_string(),
        )],
        Json(serde_json::json!({ "success": true })),
    )
        .into_response();
    response.extensions_mut().insert(SessionEnded);
    Ok(response)
}

/// Loads the read-only manager template, if one was seeded.
pub fn load_manager_template(profile_store: &dyn ProfileStore) -> Result<ManagerTemplate> {
    Ok(profile_store
        .get_manager_profile(DEFAULT_MANAGER_SESSION)
        .context("Failed to load manager template")?
        .map(Arc::new))
}

pub fn make_app(state: ServerState) -> Router {
    let session_routes: Router = Router::new()
        .route("/", get(home))
        .route("/session-data", get(session_data))
        .route("/set-last-page", post(set_last_page))
        .route("/auth/status", get(auth_status))
        .route("/auth/logout", get(logout).post(logout))
        .with_state(state.clone());

    let mut app: Router = session_routes
        .nest("/dj", make_dj_routes(state.clone()))
        .nest("/manager", make_manager_routes(state.clone()))
        .nest("/producer", make_producer_routes(state.clone()));

    if let Some(frontend_path) = &state.config.frontend_dir_path {
        let static_files_service =
            ServeDir::new(frontend_path).append_index_html_on_directories(true);
        app = app.fallback_service(static_files_service);
    }

    app.layer(middleware::from_fn_with_state(state.clone(), track_session))
        .layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server<F>(
    config: ServerConfig,
    catalog_store: GuardedCatalogStore,
    profile_store: GuardedProfileStore,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let manager_template = load_manager_template(profile_store.as_ref())?;
    let port = config.port;
    let state = ServerState::new(config, catalog_store, profile_store, manager_template);
    let app = make_app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
