//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with one method per endpoint. When API routes or request
//! formats change, update only this file.

#![allow(dead_code)]

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client with a cookie store, so every client is one browser session
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .unwrap_or_else(|e| panic!("GET {} failed: {}", path, e))
    }

    async fn post(&self, path: &str, body: Value) -> Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .unwrap_or_else(|e| panic!("POST {} failed: {}", path, e))
    }

    // ========================================================================
    // Session Endpoints
    // ========================================================================

    /// GET /
    pub async fn home(&self) -> Response {
        self.get("/").await
    }

    /// GET /session-data
    pub async fn session_data(&self) -> Response {
        self.get("/session-data").await
    }

    /// POST /set-last-page
    pub async fn set_last_page(&self, role: &str, file: &str) -> Response {
        self.post("/set-last-page", json!({ "role": role, "file": file }))
            .await
    }

    /// GET /auth/status
    pub async fn auth_status(&self) -> Response {
        self.get("/auth/status").await
    }

    /// POST /auth/logout
    pub async fn logout(&self) -> Response {
        self.post("/auth/logout", json!({})).await
    }

    // ========================================================================
    // DJ Endpoints
    // ========================================================================

    /// GET /dj
    pub async fn dj_dashboard(&self) -> Response {
        self.get("/dj").await
    }

    /// GET /dj/profile
    pub async fn dj_profile(&self) -> Response {
        self.get("/dj/profile").await
    }

    /// POST /dj/add-track with a catalog track id
    pub async fn dj_add_catalog_track(&self, track_id: i64) -> Response {
        self.post("/dj/add-track", json!({ "track_id": track_id }))
            .await
    }

    /// POST /dj/add-track with manually entered fields
    pub async fn dj_add_manual_track(&self, title: &str, artist: &str, duration: &str) -> Response {
        self.post(
            "/dj/add-track",
            json!({ "title": title, "artist": artist, "bpm": 120, "duration": duration }),
        )
        .await
    }

    /// POST /dj/remove-track
    pub async fn dj_remove_track(&self, index: usize) -> Response {
        self.post("/dj/remove-track", json!({ "index": index })).await
    }

    /// POST /dj/move-track
    pub async fn dj_move_track(&self, from_index: usize, to_index: usize) -> Response {
        self.post(
            "/dj/move-track",
            json!({ "from_index": from_index, "to_index": to_index }),
        )
        .await
    }

    /// POST /dj/save-show
    pub async fn dj_save_show(&self, show: &str, date: &str, time: &str) -> Response {
        self.post(
            "/dj/save-show",
            json!({ "show": show, "date": date, "time": time }),
        )
        .await
    }

    /// POST /dj/search-queue
    pub async fn dj_search_queue(&self, term: &str) -> Response {
        self.post("/dj/search-queue", json!({ "term": term })).await
    }

    /// POST /dj/clear
    pub async fn dj_clear(&self) -> Response {
        self.post("/dj/clear", json!({})).await
    }

    // ========================================================================
    // Manager Endpoints
    // ========================================================================

    /// GET /manager
    pub async fn manager_dashboard(&self) -> Response {
        self.get("/manager").await
    }

    /// GET /manager/schedule-data
    pub async fn manager_schedule_data(&self) -> Response {
        self.get("/manager/schedule-data").await
    }

    /// POST /manager/add-schedule
    pub async fn manager_add_schedule(&self, date: &str, time: &str, dj_name: &str, genre: &str) -> Response {
        self.post(
            "/manager/add-schedule",
            json!({ "date": date, "time": time, "dj_name": dj_name, "genre": genre }),
        )
        .await
    }

    /// POST /manager/update-schedule
    pub async fn manager_update_schedule(&self, index: usize, changes: Value) -> Response {
        let mut body = changes;
        body["index"] = json!(index);
        self.post("/manager/update-schedule", body).await
    }

    /// POST /manager/remove-schedule
    pub async fn manager_remove_schedule(&self, index: usize) -> Response {
        self.post("/manager/remove-schedule", json!({ "index": index }))
            .await
    }

    /// POST /manager/set-featured
    pub async fn manager_set_featured(&self, index: usize) -> Response {
        self.post("/manager/set-featured", json!({ "index": index }))
            .await
    }

    /// POST /manager/song-report
    pub async fn manager_song_report(&self, song: &str, dj_name: &str, status: &str) -> Response {
        self.post(
            "/manager/song-report",
            json!({ "assigned_song": song, "dj_name": dj_name, "status": status, "icon": "check" }),
        )
        .await
    }

    // ========================================================================
    // Producer Endpoints
    // ========================================================================

    /// GET /producer
    pub async fn producer_dashboard(&self) -> Response {
        self.get("/producer").await
    }

    /// GET /producer/producer-data
    pub async fn producer_data(&self) -> Response {
        self.get("/producer/producer-data").await
    }

    /// POST /producer/add-rotation
    pub async fn producer_add_rotation(&self, title: &str, mmss: &str, bin: &str) -> Response {
        self.post(
            "/producer/add-rotation",
            json!({ "title": title, "artist": "Test Artist", "mmss": mmss, "bin": bin, "notes": "", "explicit": false }),
        )
        .await
    }

    /// POST /producer/remove-rotation
    pub async fn producer_remove_rotation(&self, index: usize) -> Response {
        self.post("/producer/remove-rotation", json!({ "index": index }))
            .await
    }

    /// POST /producer/clear-rotation
    pub async fn producer_clear_rotation(&self) -> Response {
        self.post("/producer/clear-rotation", json!({})).await
    }

    /// POST /producer/add-booking
    pub async fn producer_add_booking(&self, guest: &str, day: &str, start: &str, end: &str) -> Response {
        self.post(
            "/producer/add-booking",
            json!({ "guest_or_segment": guest, "day": day, "start_time": start, "end_time": end }),
        )
        .await
    }

    /// POST /producer/remove-booking
    pub async fn producer_remove_booking(&self, index: usize) -> Response {
        self.post("/producer/remove-booking", json!({ "index": index }))
            .await
    }

    /// POST /producer/add-ros
    pub async fn producer_add_ros(&self, start_label: &str, description: &str, duration: &str) -> Response {
        self.post(
            "/producer/add-ros",
            json!({ "start_label": start_label, "description": description, "duration": duration }),
        )
        .await
    }

    /// POST /producer/remove-ros
    pub async fn producer_remove_ros(&self, index: usize) -> Response {
        self.post("/producer/remove-ros", json!({ "index": index }))
            .await
    }

    /// POST /producer/clear-ros
    pub async fn producer_clear_ros(&self) -> Response {
        self.post("/producer/clear-ros", json!({})).await
    }

    /// POST /producer/add-playlist
    pub async fn producer_add_playlist(&self, name: &str, date: &str, show: Option<&str>) -> Response {
        self.post(
            "/producer/add-playlist",
            json!({ "name": name, "date": date, "show": show }),
        )
        .await
    }

    /// POST /producer/remove-playlist
    pub async fn producer_remove_playlist(&self, index: usize) -> Response {
        self.post("/producer/remove-playlist", json!({ "index": index }))
            .await
    }

    /// POST /producer/playlist/add-track
    pub async fn producer_playlist_add_track(&self, playlist_index: usize, track_id: i64) -> Response {
        self.post(
            "/producer/playlist/add-track",
            json!({ "playlist_index": playlist_index, "track_id": track_id }),
        )
        .await
    }

    /// POST /producer/playlist/remove-track
    pub async fn producer_playlist_remove_track(&self, playlist_index: usize, track_index: usize) -> Response {
        self.post(
            "/producer/playlist/remove-track",
            json!({ "playlist_index": playlist_index, "track_index": track_index }),
        )
        .await
    }

    /// POST /producer/add-show
    pub async fn producer_add_show(&self, show: &str) -> Response {
        self.post("/producer/add-show", json!({ "show": show })).await
    }

    /// POST /producer/remove-show
    pub async fn producer_remove_show(&self, show: &str) -> Response {
        self.post("/producer/remove-show", json!({ "show": show })).await
    }

    /// POST /producer/assign-show-slot
    pub async fn producer_assign_show_slot(&self, show: &str, date: &str, time: &str, dj_name: &str) -> Response {
        self.post(
            "/producer/assign-show-slot",
            json!({ "show": show, "date": date, "time": time, "dj_name": dj_name, "note": "" }),
        )
        .await
    }
}
