use crate::{app, geocode::GeocodeClient, state::SharedState};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use http_body_util::BodyExt;
use liblocus::RecordStore;
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;
use test_log::test;
use tower::Service;

/// App wired to a store in a throwaway directory. The geocoder points at a
/// closed port so nothing accidentally goes over the network.
fn test_app() -> (Router, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = RecordStore::new(dir.path().join("data.csv"));
    store.init().expect("failed to initialize store");
    let geocoder = GeocodeClient::new("http://127.0.0.1:9").expect("failed to build geocoder");
    (app(Arc::new(SharedState::new(store, geocoder))), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .expect("failed to build request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

async fn json_body(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body was not valid json")
}

#[test(tokio::test)]
async fn health_is_always_ok() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(get("/api/health"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[test(tokio::test)]
async fn submit_appends_one_row() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(post_json(
            "/api/submit",
            json!({"name": "A", "address": "X", "latitude": "1.0", "longitude": "2.0"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["name"], "A");
    assert_eq!(body["data"]["radius"], json!(3.0));
    assert_ne!(body["data"]["timestamp"], "");
    // the echo carries only the submitted fields plus the timestamp
    assert!(body["data"].get("circleCenterLng").is_none());
    assert!(body["data"].get("circleCenterLat").is_none());

    let response = app
        .as_service()
        .call(get("/api/data"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["count"], 1);
    let record = &body["data"][0];
    assert_eq!(record["name"], "A");
    assert_eq!(record["address"], "X");
    assert_eq!(record["latitude"], "1.0");
    assert_eq!(record["longitude"], "2.0");
    assert_eq!(record["radius"], json!(3.0));
    // the submit path never sets the circle-center fields
    assert_eq!(record["circleCenterLng"], "");
    assert_eq!(record["circleCenterLat"], "");
}

#[test(tokio::test)]
async fn submit_without_name_is_rejected() {
    let (mut app, _dir) = test_app();
    for body in [json!({}), json!({"name": "", "address": "X"})] {
        let response = app
            .as_service()
            .call(post_json("/api/submit", body))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().expect("error message").contains("name"));
    }

    // no rows may have been written
    let response = app
        .as_service()
        .call(get("/api/data"))
        .await
        .expect("request failed");
    assert_eq!(json_body(response).await["count"], 0);
}

#[test(tokio::test)]
async fn submit_accepts_numeric_coordinates() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(post_json(
            "/api/submit",
            json!({"name": "A", "latitude": 39.9, "longitude": 116.4, "radius": "2.5"}),
        ))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["latitude"], "39.9");
    assert_eq!(body["data"]["longitude"], "116.4");
    assert_eq!(body["data"]["radius"], json!(2.5));
}

#[test(tokio::test)]
async fn save_replaces_the_store() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(post_json("/api/submit", json!({"name": "old"})))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .as_service()
        .call(post_json(
            "/api/save",
            json!({"data": [
                {"name": "A", "address": "X", "circleCenterLng": "116.39", "circleCenterLat": "39.91"},
                {"name": "B", "timestamp": "2024-01-01 00:00:00"},
            ]}),
        ))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["count"], 2);

    let response = app
        .as_service()
        .call(get("/api/data"))
        .await
        .expect("request failed");
    let body = json_body(response).await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "A");
    // bulk save threads the client-owned circle-center fields through
    assert_eq!(body["data"][0]["circleCenterLng"], "116.39");
    assert_eq!(body["data"][0]["circleCenterLat"], "39.91");
    // a missing timestamp is synthesized, a given one is kept
    assert_ne!(body["data"][0]["timestamp"], "");
    assert_eq!(body["data"][1]["timestamp"], "2024-01-01 00:00:00");
}

#[test(tokio::test)]
async fn save_with_empty_list_truncates_the_store() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(post_json("/api/submit", json!({"name": "A"})))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .as_service()
        .call(post_json("/api/save", json!({"data": []})))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["count"], 0);

    let response = app
        .as_service()
        .call(get("/api/data"))
        .await
        .expect("request failed");
    let body = json_body(response).await;
    assert_eq!(body["count"], 0);
    assert_eq!(body["data"], json!([]));
}

#[test(tokio::test)]
async fn geocode_without_address_is_rejected() {
    let (mut app, _dir) = test_app();
    for uri in ["/api/geocode", "/api/geocode?address="] {
        let response = app
            .as_service()
            .call(get(uri))
            .await
            .expect("request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(
            body["error"]
                .as_str()
                .expect("error message")
                .contains("address")
        );
    }
}

#[test(tokio::test)]
async fn unreachable_geocoder_maps_to_internal_error() {
    let (mut app, _dir) = test_app();
    let response = app
        .as_service()
        .call(get("/api/geocode?address=London"))
        .await
        .expect("request failed");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Geocoding failed");
}
