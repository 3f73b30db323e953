//! Producer endpoints, mounted under `/producer`.
//!
//! The profile stores catalog track ids; responses hydrate them into full
//! tracks so the client never has to resolve references itself.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::error::{ApiJson, ApiResult};
use super::server::record_role_visit;
use super::session::SessionId;
use super::state::ServerState;
use crate::radio::{
    parse_mmss, Bin, Booking, Genre, NewTrack, Playlist, ProducerProfile, ProducerStats,
    RadioError, RotationItem, RunOfShowItem, Show, ShowSlot, Track, TrackId,
};

fn load_profile(state: &ServerState, session: &SessionId) -> ApiResult<ProducerProfile> {
    Ok(state
        .profile_store
        .get_or_create_producer_profile(session.as_str(), Utc::now())?)
}

fn save_profile(state: &ServerState, profile: &mut ProducerProfile) -> ApiResult<()> {
    profile.updated_at = Utc::now();
    state.profile_store.save_producer_profile(profile)?;
    Ok(())
}

fn require_show(state: &ServerState, slug: &str) -> ApiResult<Show> {
    let slug = slug.trim();
    if slug.is_empty() {
        return Err(RadioError::validation("Show is required").into());
    }
    Ok(state
        .catalog_store
        .get_show(slug)?
        .ok_or_else(|| RadioError::not_found("Show", slug))?)
}

#[derive(Serialize)]
struct HydratedRotationItem {
    track: Option<Track>,
    track_id: TrackId,
    bin: Bin,
    notes: String,
    explicit: bool,
}

#[derive(Serialize)]
struct HydratedPlaylist {
    name: String,
    date: NaiveDate,
    show: Option<String>,
    tracks: Vec<Track>,
}

fn lookup_track(state: &ServerState, track_id: TrackId) -> ApiResult<Option<Track>> {
    let track = state.catalog_store.get_track(track_id)?;
    if track.is_none() {
        warn!("Producer profile references missing track {}", track_id);
    }
    Ok(track)
}

fn hydrate_rotation(
    state: &ServerState,
    profile: &ProducerProfile,
) -> ApiResult<Vec<HydratedRotationItem>> {
    profile
        .rotation()
        .iter()
        .map(|item| {
            Ok(HydratedRotationItem {
                track: lookup_track(state, item.track_id)?,
                track_id: item.track_id,
                bin: item.bin,
                notes: item.notes.clone(),
                explicit: item.explicit,
            })
        })
        .collect()
}

fn hydrate_playlists(
    state: &ServerState,
    profile: &ProducerProfile,
) -> ApiResult<Vec<HydratedPlaylist>> {
    let mut playlists = Vec::with_capacity(profile.playlists().len());
    for playlist in profile.playlists() {
        let mut tracks = Vec::with_capacity(playlist.tracks.len());
        for track_id in playlist.tracks.iter() {
            if let Some(track) = lookup_track(state, *track_id)? {
                tracks.push(track);
            }
        }
        playlists.push(HydratedPlaylist {
            name: playlist.name.clone(),
            date: playlist.date,
            show: playlist.show.clone(),
            tracks,
        });
    }
    Ok(playlists)
}

#[derive(Serialize)]
struct DashboardResponse {
    profile: ProducerProfile,
    stats: ProducerStats,
    genres: Vec<Genre>,
    shows: Vec<Show>,
}

#[derive(Serialize)]
struct ProducerDataResponse {
    rotation: Vec<HydratedRotationItem>,
    playlists: Vec<HydratedPlaylist>,
    bookings: Vec<Booking>,
    run_of_show: Vec<RunOfShowItem>,
    stats: ProducerStats,
}

#[derive(Deserialize, Debug)]
struct IndexBody {
    index: usize,
}

#[derive(Deserialize, Debug)]
struct AddRotationBody {
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    mmss: String,
    #[serde(default)]
    bin: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    explicit: bool,
}

#[derive(Deserialize, Debug)]
struct AddBookingBody {
    #[serde(default)]
    guest_or_segment: String,
    #[serde(default)]
    day: String,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
}

#[derive(Deserialize, Debug)]
struct AddRosBody {
    #[serde(default)]
    start_label: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration: String,
}

#[derive(Deserialize, Debug)]
struct AddPlaylistBody {
    #[serde(default)]
    name: String,
    #[serde(default)]
    date: String,
    show: Option<String>,
}

#[derive(Deserialize, Debug)]
struct PlaylistTrackBody {
    playlist_index: usize,
    track_id: TrackId,
}

#[derive(Deserialize, Debug)]
struct PlaylistTrackIndexBody {
    playlist_index: usize,
    track_index: usize,
}

#[derive(Deserialize, Debug)]
struct ShowBody {
    #[serde(default)]
    show: String,
}

#[derive(Deserialize, Debug)]
struct AssignShowSlotBody {
    #[serde(default)]
    show: String,
    #[serde(flatten)]
    slot: ShowSlot,
}

async fn dashboard(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<DashboardResponse>> {
    record_role_visit(&state, &session, "Producer", "producer")?;
    let profile = load_profile(&state, &session)?;
    Ok(Json(DashboardResponse {
        stats: profile.stats(),
        profile,
        genres: state.catalog_store.list_genres()?,
        shows: state.catalog_store.list_shows()?,
    }))
}

async fn producer_data(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<ProducerDataResponse>> {
    let profile = load_profile(&state, &session)?;
    Ok(Json(ProducerDataResponse {
        rotation: hydrate_rotation(&state, &profile)?,
        playlists: hydrate_playlists(&state, &profile)?,
        bookings: profile.bookings().to_vec(),
        run_of_show: profile.run_of_show().to_vec(),
        stats: profile.stats(),
    }))
}

fn rotation_response(
    state: &ServerState,
    message: &str,
    profile: &ProducerProfile,
) -> ApiResult<Json<Value>> {
    Ok(Json(json!({
        "success": true,
        "message": message,
        "rotation": hydrate_rotation(state, profile)?,
        "stats": profile.stats(),
    })))
}

async fn add_rotation(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<AddRotationBody>,
) -> ApiResult<Json<Value>> {
    if body.title.trim().is_empty() || body.mmss.trim().is_empty() || body.bin.trim().is_empty() {
        return Err(RadioError::validation("Title, duration, and bin are required").into());
    }
    let bin: Bin = body.bin.trim().parse()?;
    let seconds = parse_mmss(body.mmss.trim())?;
    let new_track = NewTrack::new(&body.title, &body.artist, 0, seconds)?;

    // Nothing is written to the catalog until the item is valid.
    let mut profile = load_profile(&state, &session)?;
    let track = state.catalog_store.create_track(&new_track)?;
    info!("Created rotation track {} ({})", track.id, track.label());

    profile.add_rotation_item(RotationItem {
        track_id: track.id,
        bin,
        notes: body.notes.trim().to_string(),
        explicit: body.explicit,
    });
    if let Err(err) = save_profile(&state, &mut profile) {
        // The track only exists for this rotation entry.
        if let Err(delete_err) = state.catalog_store.delete_track(track.id) {
            warn!("Failed to drop rotation track {}: {:#}", track.id, delete_err);
        }
        return Err(err);
    }
    rotation_response(&state, "Track added to rotation", &profile)
}

async fn remove_rotation(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_rotation_item(body.index)?;
    save_profile(&state, &mut profile)?;
    rotation_response(&state, "Track removed from rotation", &profile)
}

async fn clear_rotation(
    State(state): State<ServerState>,
    session: SessionId,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.clear_rotation();
    save_profile(&state, &mut profile)?;
    rotation_response(&state, "Rotation cleared", &profile)
}

fn bookings_response(message: &str, profile: &ProducerProfile) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "bookings": profile.bookings(),
        "stats": profile.stats(),
    }))
}

async fn add_booking(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<AddBookingBody>,
) -> ApiResult<Json<Value>> {
    let booking = Booking::new(
        &body.guest_or_segment,
        &body.day,
        &body.start_time,
        &body.end_time,
    )?;
    let mut profile = load_profile(&state, &session)?;
    profile.add_booking(booking);
    save_profile(&state, &mut profile)?;
    Ok(bookings_response("Booking added", &profile))
}

async fn remove_booking(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_booking(body.index)?;
    save_profile(&state, &mut profile)?;
    Ok(bookings_response("Booking removed", &profile))
}

fn ros_response(message: &str, profile: &ProducerProfile) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "run_of_show": profile.run_of_show(),
        "stats": profile.stats(),
    }))
}

async fn add_ros(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<AddRosBody>,
) -> ApiResult<Json<Value>> {
    let item = RunOfShowItem::new(&body.start_label, &body.description, &body.duration)?;
    let mut profile = load_profile(&state, &session)?;
    profile.add_ros_item(item);
    save_profile(&state, &mut profile)?;
    Ok(ros_response("Run-of-show item added", &profile))
}

async fn remove_ros(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_ros_item(body.index)?;
    save_profile(&state, &mut profile)?;
    Ok(ros_response("Run-of-show item removed", &profile))
}

async fn clear_ros(State(state): State<ServerState>, session: SessionId) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.clear_run_of_show();
    save_profile(&state, &mut profile)?;
    Ok(ros_response("Run-of-show cleared", &profile))
}

fn playlists_response(
    state: &ServerState,
    message: &str,
    profile: &ProducerProfile,
) -> ApiResult<Json<Value>> {
    Ok(Json(json!({
        "success": true,
        "message": message,
        "playlists": hydrate_playlists(state, profile)?,
        "stats": profile.stats(),
    })))
}

async fn add_playlist(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<AddPlaylistBody>,
) -> ApiResult<Json<Value>> {
    let show = match body.show.as_deref().map(str::trim) {
        Some(slug) if !slug.is_empty() => Some(require_show(&state, slug)?.slug),
        _ => None,
    };
    let playlist = Playlist::new(&body.name, &body.date, show)?;

    let mut profile = load_profile(&state, &session)?;
    profile.add_playlist(playlist);
    save_profile(&state, &mut profile)?;
    playlists_response(&state, "Playlist created", &profile)
}

async fn remove_playlist(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<IndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_playlist(body.index)?;
    save_profile(&state, &mut profile)?;
    playlists_response(&state, "Playlist removed", &profile)
}

async fn add_playlist_track(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<PlaylistTrackBody>,
) -> ApiResult<Json<Value>> {
    if state.catalog_store.get_track(body.track_id)?.is_none() {
        return Err(RadioError::not_found("Track", body.track_id).into());
    }
    let mut profile = load_profile(&state, &session)?;
    profile.add_track_to_playlist(body.playlist_index, body.track_id)?;
    save_profile(&state, &mut profile)?;
    playlists_response(&state, "Track added to playlist", &profile)
}

async fn remove_playlist_track(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<PlaylistTrackIndexBody>,
) -> ApiResult<Json<Value>> {
    let mut profile = load_profile(&state, &session)?;
    profile.remove_track_from_playlist(body.playlist_index, body.track_index)?;
    save_profile(&state, &mut profile)?;
    playlists_response(&state, "Track removed from playlist", &profile)
}

fn shows_response(message: &str, profile: &ProducerProfile) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": message,
        "shows": profile.shows(),
        "stats": profile.stats(),
    }))
}

async fn add_show(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<ShowBody>,
) -> ApiResult<Json<Value>> {
    let show = require_show(&state, &body.show)?;
    let mut profile = load_profile(&state, &session)?;
    let message = if profile.add_show(&show.slug) {
        save_profile(&state, &mut profile)?;
        "Show added"
    } else {
        "Show already added"
    };
    Ok(shows_response(message, &profile))
}

async fn remove_show(
    State(state): State<ServerState>,
    session: SessionId,
    ApiJson(body): ApiJson<ShowBody>,
) -> ApiResult<Json<Value>> {
    let slug = body.show.trim();
    let mut profile = load_profile(&state, &session)?;
    if !profile.remove_show(slug) {
        return Err(RadioError::not_found("Show", slug).into());
    }
    save_profile(&state, &mut profile)?;
    Ok(shows_response("Show removed", &profile))
}

async fn assign_show_slot(
    State(state): State<ServerState>,
    ApiJson(body): ApiJson<AssignShowSlotBody>,
) -> ApiResult<Json<Value>> {
    let mut show = require_show(&state, &body.show)?;
    if body.slot.dj_name.trim().is_empty() {
        return Err(RadioError::validation("DJ name is required").into());
    }
    show.assign_slot(body.slot);
    state.catalog_store.save_show(&show)?;
    info!("Assigned slot of show {}", show.slug);
    Ok(Json(json!({
        "success": true,
        "message": "Show slot assigned",
        "show": show,
    })))
}

pub fn make_producer_routes(state: ServerState) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/producer-data", get(producer_data))
        .route("/add-rotation", post(add_rotation))
        .route("/remove-rotation", post(remove_rotation))
        .route("/clear-rotation", post(clear_rotation))
        .route("/add-booking", post(add_booking))
        .route("/remove-booking", post(remove_booking))
        .route("/add-ros", post(add_ros))
        .route("/remove-ros", post(remove_ros))
        .route("/clear-ros", post(clear_ros))
        .route("/add-playlist", post(add_playlist))
        .route("/remove-playlist", post(remove_playlist))
        .route("/playlist/add-track", post(add_playlist_track))
        .route("/playlist/remove-track", post(remove_playlist_track))
        .route("/add-show", post(add_show))
        .route("/remove-show", post(remove_show))
        .route("/assign-show-slot", post(assign_show_slot))
        .with_state(state)
}
