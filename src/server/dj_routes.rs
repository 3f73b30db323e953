//! DJ dashboard and queue endpoints, mounted under `/dj`.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::error::{ApiJson, ApiResult};
use super::server::record_role_visit;
use super::session::SessionId;
use super::state::ServerState;
use crate::radio::{
    CurrentSlot, DjProfile, ManualTrack, QueueEntry, RadioError, Show, Track, TrackId,
};

fn load_profile(state: &ServerState, session: &SessionId) -> ApiResult<DjProfile> {
    Ok(state.profile_store.get_or_create_dj_profile(
        session.as_str(),
        Utc::now(),
        state.config.dj_profile_ttl(),
    )?)
}

fn save_profile(state: &ServerState, profile: &mut DjProfile) -> ApiResult<()> {
    profile.updated_at = Utc::now();
    state.profile_store.save_dj_profile(profile)?;
    Ok(())
}

fn queue_response(message: &str, profile: &DjProfile) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "queue": profile.queue(),
        "stats": profile.stats(),
    }))
}

#[derive(Serialize)]
struct DashboardResponse {
    profile: DjProfile,
    shows: Vec<Show>,
    tracks: Vec<Track>,
}

#[derive(Deserialize, Debug)]
struct AddTrackBody {
    track_id: Option<TrackId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    bpm: u32,
    #[serde(default)]
    duration: String,
}

#[derive(Deserialize, Debug)]
struct IndexBody {
    index: usize,
}

#[derive(Deserialize, Debug)]
struct MoveTrackBody {
    from_index: usize,
    to_index: usize,
}

#[derive(Deserialize, Debug)]
struct SaveShowBody {
    #[serde(default)]
    show: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    time: String,
}

#[derive(Deserialize, Debug)]
struct SearchBody {
    #[serde(default)]
    term: String,
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    results: Vec<&'a QueueEntry>,
    count: usize,
}

async fn dashboard(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<DashboardResponse>> {
    record_role_visit(&state, &session, "DJ", "dj")?;
    let profile = load_profile(&state, &session)?;
    Ok(Json(DashboardResponse {
        profile,
        shows: state.catalog_store.list_shows()?,
        tracks: state.catalog_store.list_tracks()?,
    }))
}

async fn get_profile(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<DjProfile>> {
    Ok(Json(load_profile(&state, &session)?))
}

async fn add_track(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<AddTrackBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    let now = Utc::now();

    match body.track_id {
        Some(track_id) => {
            let track = state
                .catalog_store
                .get_track(track_id)?
                .ok_or_else(|| RadioError::not_found("Track", track_id))?;
            profile.add_catalog_track(&track, now)?;
        }
        None => {
            let manual = ManualTrack {
                title: body.title,
                artist: body.artist,
                bpm: body.bpm,
                duration: body.duration,
            };
            profile.add_manual_track(&manual, now)?;
        }
    }
    save_profile(&state, &mut profile)?;
    debug!(
        "Session {} queued track, {} in queue",
        session.as_str(),
        profile.queue().len()
    );
    Ok(queue_response("Track added to queue", &profile))
}

async fn remove_track(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_track(body.index)?;
    save_profile(&state, &mut profile)?;
    Ok(queue_response("Track removed from queue", &profile))
}

async fn move_track(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<MoveTrackBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.move_track(body.from_index, body.to_index)?;
    save_profile(&state, &mut profile)?;
    Ok(queue_response("Track moved", &profile))
}

async fn save_show(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<SaveShowBody>,
) -> ApiResult<Json<Value>> {
    let slug = body.show.trim();
    if slug.is_empty() {
        return Err(RadioError::validation("Show is required").into());
    }
    if state.catalog_store.get_show(slug)?.is_none() {
        return Err(RadioError::not_found("Show", slug).into());
    }

    let mut profile = load_profile(&state, &session)?;
    let slot = CurrentSlot {
        date: body.date,
        time: body.time,
    };
    profile.save_show(slug, slot, Utc::now());
    save_profile(&state, &mut profile)?;
    Ok(Json(json!({
        "success": true,
        "message": "Show saved",
        "current_show": profile.current_show,
        "current_slot": profile.current_slot,
        "stats": profile.stats(),
    })))
}

async fn search_queue(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResult<Json<Value>> {
    let profile = load_profile(&state, &session)?;
    let results = profile.search_queue(body.term.trim());
    let count = results.len();
    Ok(Json(json!(SearchResponse { results, count })))
}

async fn clear(State(state): State<ServerState>, session: SessionId) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.clear_session();
    save_profile(&state, &mut profile)?;
    Ok(queue_response("Session cleared", &profile))
}

pub fn make_dj_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/profile", get(get_profile))
        .route("/add-track", post(add_track))
        .route("/remove-track", post(remove_track))
        .route("/move-track", post(move_track))
        .route("/save-show", post(save_show))
        .route("/search-queue", post(search_queue))
        .route("/clear", post(clear))
        .with_state(state)
}
