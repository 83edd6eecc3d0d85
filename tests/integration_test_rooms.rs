mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::TestApp;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn post_json(app: &TestApp, uri: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("POST").uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

async fn put_json(app: &TestApp, uri: &str, payload: Value) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("PUT").uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(payload.to_string())).unwrap()
    ).await.unwrap()
}

async fn get(app: &TestApp, uri: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
    ).await.unwrap()
}

async fn delete(app: &TestApp, uri: &str) -> axum::response::Response {
    app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(uri).body(Body::empty()).unwrap()
    ).await.unwrap()
}

#[tokio::test]
async fn test_room_crud() {
    let app = TestApp::new().await;

    let res = post_json(&app, "/rooms", json!({ "room_name": "Dorm A", "capacity": 4 })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let room = parse_body(res).await["room"].clone();
    let room_id = room["room_id"].as_i64().unwrap();
    assert_eq!(room["room_name"].as_str().unwrap(), "Dorm A");
    assert_eq!(room["capacity"].as_i64().unwrap(), 4);

    let res = put_json(&app, &format!("/rooms/{}", room_id), json!({ "room_name": "Dorm A1" })).await;
    assert_eq!(parse_body(res).await["room_name"].as_str().unwrap(), "Dorm A1");

    let res = get(&app, "/rooms").await;
    let rooms = parse_body(res).await;
    assert_eq!(rooms["rooms"].as_array().unwrap().len(), 1);

    let res = delete(&app, &format!("/rooms/{}", room_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = get(&app, &format!("/rooms/{}", room_id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_room_create_requires_name() {
    let app = TestApp::new().await;
    let res = post_json(&app, "/rooms", json!({ "room_name": "  " })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_room_removes_its_beds() {
    let app = TestApp::new().await;

    let res = post_json(&app, "/rooms", json!({ "room_name": "Dorm A" })).await;
    let room_id = parse_body(res).await["room"]["room_id"].as_i64().unwrap();

    for i in 1..=2 {
        post_json(&app, "/beds", json!({ "room_id": room_id, "bed_name": format!("Bed {}", i) })).await;
    }

    let res = delete(&app, &format!("/rooms/{}", room_id)).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&app, "/beds").await;
    assert!(parse_body(res).await["beds"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_capacity_resync_counts_beds() {
    let app = TestApp::new().await;

    let res = post_json(&app, "/rooms", json!({ "room_name": "Dorm A" })).await;
    let room_id = parse_body(res).await["room"]["room_id"].as_i64().unwrap();

    for i in 1..=3 {
        post_json(&app, "/beds", json!({ "room_id": room_id, "bed_name": format!("Bed {}", i) })).await;
    }

    let res = put_json(&app, &format!("/rooms/{}/capacity", room_id), json!({})).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["capacity"].as_i64().unwrap(), 3);

    let res = get(&app, &format!("/rooms/{}", room_id)).await;
    let room = parse_body(res).await;
    assert_eq!(room["capacity"].as_i64().unwrap(), 3);
    assert_eq!(room["beds"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_bed_crud() {
    let app = TestApp::new().await;

    let res = post_json(&app, "/rooms", json!({ "room_name": "Dorm A" })).await;
    let room_id = parse_body(res).await["room"]["room_id"].as_i64().unwrap();

    let res = post_json(&app, "/beds", json!({ "room_id": room_id, "bed_name": "Bed 1" })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let bed = parse_body(res).await["bed"].clone();
    let bed_id = bed["bed_id"].as_i64().unwrap();
    assert_eq!(bed["status"].as_str().unwrap(), "Available");

    let res = put_json(&app, &format!("/beds/{}", bed_id), json!({ "status": "Maintenance" })).await;
    assert_eq!(parse_body(res).await["status"].as_str().unwrap(), "Maintenance");

    let res = delete(&app, &format!("/beds/{}", bed_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let res = get(&app, &format!("/beds/{}", bed_id)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bed_requires_existing_room() {
    let app = TestApp::new().await;
    let res = post_json(&app, "/beds", json!({ "room_id": 42, "bed_name": "Bed 1" })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bed_status_does_not_affect_availability() {
    // Availability derives from assignment overlap, not the status flag.
    let app = TestApp::new().await;

    let res = post_json(&app, "/rooms", json!({ "room_name": "Dorm A" })).await;
    let room_id = parse_body(res).await["room"]["room_id"].as_i64().unwrap();
    let res = post_json(&app, "/beds", json!({ "room_id": room_id, "bed_name": "Bed 1", "status": "Maintenance" })).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-02", room_id)).await;
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 1);
}
