//! Manager schedule endpoints, mounted under `/manager`.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::{ApiJson, ApiResult};
use super::server::record_role_visit;
use super::session::SessionId;
use super::state::ServerState;
use crate::radio::{
    schedule_overview, DjHighlight, ManagerProfile, ManagerStats, NewScheduleSlot, NewSongReport,
    ScheduleSlot, ScheduleSlotUpdate, SongReport,
};

const FALLBACK_GENRES: &[&str] = &["EDM", "House", "Synthwave", "Lo-Fi"];

fn load_profile(state: &ServerState, session: &SessionId) -> ApiResult<ManagerProfile> {
    Ok(state
        .profile_store
        .get_or_create_manager_profile(session.as_str(), Utc::now())?)
}

fn save_profile(state: &ServerState, profile: &mut ManagerProfile) -> ApiResult<()> {
    profile.updated_at = Utc::now();
    state.profile_store.save_manager_profile(profile)?;
    Ok(())
}

fn schedule_response(message: &str, profile: &ManagerProfile) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "schedule": profile.schedule(),
        "stats": profile.stats(),
    }))
}

#[derive(Serialize)]
struct DashboardResponse {
    profile: ManagerProfile,
    schedule: Vec<ScheduleSlot>,
    song_reports: Vec<SongReport>,
    featured_dj: DjHighlight,
    upcoming_djs: Vec<DjHighlight>,
    stats: ManagerStats,
    genres: Vec<String>,
    using_template: bool,
}

#[derive(Serialize)]
struct ScheduleDataResponse<'a> {
    schedule: &'a [ScheduleSlot],
    stats: ManagerStats,
    song_reports: &'a [SongReport],
}

#[derive(Deserialize, Debug)]
struct IndexBody {
    index: usize,
}

#[derive(Deserialize, Debug)]
struct UpdateScheduleBody {
    index: usize,
    #[serde(flatten)]
    update: ScheduleSlotUpdate,
}

async fn dashboard(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<DashboardResponse>> {
    record_role_visit(&state, &session, "Manager", "manager")?;
    let profile = load_profile(&state, &session)?;

    // An empty schedule displays the template without copying it into the session.
    let template = state
        .manager_template
        .as_deref()
        .filter(|_| profile.schedule().is_empty());
    let (schedule, song_reports) = match template {
        Some(template) => {
            debug!("Showing manager template to session {}", session.as_str());
            (template.schedule().to_vec(), template.song_reports().to_vec())
        }
        None => (profile.schedule().to_vec(), profile.song_reports().to_vec()),
    };
    let overview = schedule_overview(&schedule, song_reports.len());

    let genres = state.catalog_store.list_genres()?;
    let genres = if genres.is_empty() {
        FALLBACK_GENRES.iter().map(|g| g.to_string()).collect()
    } else {
        genres.into_iter().map(|g| g.name).collect()
    };

    Ok(Json(DashboardResponse {
        profile,
        schedule,
        song_reports,
        featured_dj: overview.featured_dj,
        upcoming_djs: overview.upcoming_djs,
        stats: overview.stats,
        genres,
        using_template: template.is_some(),
    }))
}

async fn schedule_data(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<Value>> {
    let profile = load_profile(&state, &session)?;
    Ok(Json(json!(ScheduleDataResponse {
        schedule: profile.schedule(),
        stats: profile.stats(),
        song_reports: profile.song_reports(),
    })))
}

async fn add_schedule(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<NewScheduleSlot>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    let slot = profile.add_to_schedule(body, Local::now().naive_local(), Utc::now())?;
    info!("Scheduled {} at {} {}", slot.dj_name, slot.date, slot.time);
    save_profile(&state, &mut profile)?;
    Ok(schedule_response("DJ assigned successfully", &profile))
}

async fn update_schedule(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<UpdateScheduleBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.update_schedule(body.index, body.update, Local::now().naive_local())?;
    save_profile(&state, &mut profile)?;
    Ok(schedule_response("Schedule updated", &profile))
}

async fn remove_schedule(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_from_schedule(body.index)?;
    save_profile(&state, &mut profile)?;
    Ok(schedule_response("DJ removed from schedule", &profile))
}

async fn set_featured(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.set_featured(body.index)?;
    save_profile(&state, &mut profile)?;
    Ok(schedule_response("Featured DJ updated", &profile))
}

async fn song_report(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<NewSongReport>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.add_song_report(body, Utc::now())?;
    save_profile(&state, &mut profile)?;
    Ok(Json(json!({
        "success": true,
        "message": "Song report added",
        "song_reports": profile.song_reports(),
        "stats": profile.stats(),
    })))
}

pub fn make_manager_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/schedule-data", get(schedule_data))
        .route("/add-schedule", post(add_schedule))
        .route("/update-schedule", post(update_schedule))
        .route("/remove-schedule", post(remove_schedule))
        .route("/set-featured", post(set_featured))
        .route("/song-report", post(song_report))
        .with_state(state)
}
