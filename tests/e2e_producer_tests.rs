//! End-to-end tests for the producer endpoints

mod common;

use campus_radio_server::CatalogStore;
use common::{TestClient, TestServer, SHOW_DRIVE, SHOW_MORNING, SHOW_NIGHT};
use reqwest::StatusCode;
use serde_json::{json, Value};

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_dashboard_has_default_identity() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.producer_dashboard().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["profile"]["name"], "McKenzie");
    assert_eq!(body["profile"]["station"], "GMU Radio");
    assert_eq!(body["profile"]["role"], "Producer");
    assert_eq!(body["shows"].as_array().unwrap().len(), 3);
    assert_eq!(body["stats"]["rotation_items"], 0);
}

// =============================================================================
// Rotation
// =============================================================================

#[tokio::test]
async fn test_rotation_counts_bins() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    for (title, bin) in [("First Cut", "A"), ("Second Cut", "A"), ("Third Cut", "B")] {
        let response = client.producer_add_rotation(title, "03:10", bin).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body: Value = client.producer_data().await.json().await.unwrap();
    assert_eq!(body["stats"]["rotation_bins"], json!({ "A": 2, "B": 1, "C": 0 }));
    assert_eq!(body["rotation"][0]["track"]["title"], "First Cut");
    assert_eq!(body["rotation"][0]["track"]["mmss"], "03:10");
}

#[tokio::test]
async fn test_rotation_creates_catalog_track() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let before = server.catalog_store.count_tracks().unwrap();

    client.producer_add_rotation("Fresh Single", "02:30", "C").await;

    assert_eq!(server.catalog_store.count_tracks().unwrap(), before + 1);
}

#[tokio::test]
async fn test_rotation_rejects_bad_input_without_catalog_writes() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let before = server.catalog_store.count_tracks().unwrap();

    let response = client.producer_add_rotation("Fresh Single", "02:30", "D").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid bin value");

    let response = client.producer_add_rotation("Fresh Single", "2:75", "A").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.producer_add_rotation("", "02:30", "A").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(server.catalog_store.count_tracks().unwrap(), before);
}

#[tokio::test]
async fn test_remove_and_clear_rotation() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    client.producer_add_rotation("First Cut", "03:10", "A").await;
    client.producer_add_rotation("Second Cut", "03:10", "B").await;

    let response = client.producer_remove_rotation(0).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["rotation"].as_array().unwrap().len(), 1);
    assert_eq!(body["rotation"][0]["bin"], "B");

    let response = client.producer_remove_rotation(4).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.producer_clear_rotation().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["rotation"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["rotation_bins"], json!({ "A": 0, "B": 0, "C": 0 }));
}

// =============================================================================
// Bookings and run-of-show
// =============================================================================

#[tokio::test]
async fn test_booking_time_range() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .producer_add_booking("Guest Band", "Friday", "20:00", "19:00")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .producer_add_booking("Guest Band", "Friday", "19:00", "20:00")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["bookings"][0]["guest_or_segment"], "Guest Band");
    assert_eq!(body["stats"]["bookings"], 1);

    let response = client.producer_remove_booking(0).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_run_of_show_add_remove_clear() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    client.producer_add_ros("00:00", "Intro", "2 min").await;
    client.producer_add_ros("00:02", "News", "5 min").await;
    let response = client.producer_add_ros("00:07", "Interview", "10 min").await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.producer_remove_ros(1).await;
    let body: Value = response.json().await.unwrap();
    let descriptions: Vec<&str> = body["run_of_show"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Intro", "Interview"]);

    let response = client.producer_clear_ros().await;
    let body: Value = response.json().await.unwrap();
    assert!(body["run_of_show"].as_array().unwrap().is_empty());
    assert_eq!(body["stats"]["ros_items"], 0);
}

// =============================================================================
// Playlists
// =============================================================================

#[tokio::test]
async fn test_playlist_tracks_are_hydrated() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());
    let sunrise = server.track_id("Campus Sunrise");
    let anthem = server.track_id("Stadium Anthem");

    let response = client
        .producer_add_playlist("Friday Night", "2030-05-10", Some(SHOW_NIGHT))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    for track_id in [sunrise, anthem, sunrise] {
        let response = client.producer_playlist_add_track(0, track_id).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let body: Value = client.producer_data().await.json().await.unwrap();
    let playlist = &body["playlists"][0];
    assert_eq!(playlist["show"], SHOW_NIGHT);
    assert_eq!(playlist["date"], "2030-05-10");
    let titles: Vec<&str> = playlist["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|track| track["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Campus Sunrise", "Stadium Anthem", "Campus Sunrise"]);

    let response = client.producer_playlist_remove_track(0, 1).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["playlists"][0]["tracks"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_playlist_validation() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.producer_add_playlist("X", "2030-05-10", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.producer_add_playlist("Weekend", "10/05/2030", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .producer_add_playlist("Weekend", "2030-05-10", Some("no-such-show"))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.producer_add_playlist("Weekend", "2030-05-10", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.producer_playlist_add_track(0, 9999).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .producer_playlist_add_track(3, server.track_id("Campus Sunrise"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client.producer_remove_playlist(0).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["stats"]["playlists"], 0);
}

// =============================================================================
// Shows
// =============================================================================

#[tokio::test]
async fn test_owned_shows_are_deduplicated() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    client.producer_add_show(SHOW_MORNING).await;
    client.producer_add_show(SHOW_DRIVE).await;
    let response = client.producer_add_show(SHOW_MORNING).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["shows"], json!([SHOW_MORNING, SHOW_DRIVE]));
    assert_eq!(body["stats"]["total_shows"], 2);

    let response = client.producer_add_show("no-such-show").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.producer_remove_show(SHOW_MORNING).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["shows"], json!([SHOW_DRIVE]));

    let response = client.producer_remove_show(SHOW_MORNING).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assign_show_slot_overwrites() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .producer_assign_show_slot(SHOW_NIGHT, "2030-01-01", "22:00", "Nova")
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = client
        .producer_assign_show_slot(SHOW_NIGHT, "2030-01-02", "23:00", "Echo")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let show = server.catalog_store.get_show(SHOW_NIGHT).unwrap().unwrap();
    assert_eq!(show.slots.len(), 1);
    assert_eq!(show.slots[0].dj_name, "Echo");
    assert_eq!(show.slots[0].time, "23:00");

    let response = client
        .producer_assign_show_slot("no-such-show", "2030-01-01", "22:00", "Nova")
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
