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

async fn create_room_with_beds(app: &TestApp, name: &str, bed_count: usize) -> (i64, Vec<i64>) {
    let res = post_json(app, "/rooms", json!({ "room_name": name })).await;
    let room_id = parse_body(res).await["room"]["room_id"].as_i64().unwrap();

    let mut bed_ids = Vec::new();
    for i in 1..=bed_count {
        let res = post_json(app, "/beds", json!({
            "room_id": room_id,
            "bed_name": format!("{} Bed {}", name, i)
        })).await;
        bed_ids.push(parse_body(res).await["bed"]["bed_id"].as_i64().unwrap());
    }
    (room_id, bed_ids)
}

async fn create_booking(app: &TestApp, room_id: i64, guests: i64, check_in: &str, check_out: &str) -> i64 {
    let res = post_json(app, "/bookings", json!({
        "booking_name": "Asha Mehta",
        "ota_name": "Direct",
        "check_in": check_in,
        "check_out": check_out,
        "number_of_adults": guests,
        "base_amount": 800,
        "guests_per_room": { room_id.to_string(): guests }
    })).await;
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await["booking_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_available_bed_count() {
    let app = TestApp::new().await;
    let (room_id, _) = create_room_with_beds(&app, "Dorm A", 3).await;

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-03", room_id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 3);

    create_booking(&app, room_id, 2, "2025-01-01", "2025-01-03").await;

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-03", room_id)).await;
    let body = parse_body(res).await;
    assert_eq!(body["available_beds"].as_i64().unwrap(), 1);

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-03&beds_required=2", room_id)).await;
    let body = parse_body(res).await;
    assert_eq!(body["is_available"].as_bool().unwrap(), false);

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-03&beds_required=1", room_id)).await;
    assert_eq!(parse_body(res).await["is_available"].as_bool().unwrap(), true);
}

#[tokio::test]
async fn test_availability_boundary_is_half_open() {
    let app = TestApp::new().await;
    let (room_id, _) = create_room_with_beds(&app, "Dorm A", 2).await;
    create_booking(&app, room_id, 2, "2025-01-01", "2025-01-03").await;

    // A window starting on the checkout day sees the full inventory.
    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-03&check_out=2025-01-05", room_id)).await;
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 2);
}

#[tokio::test]
async fn test_availability_excludes_own_booking() {
    let app = TestApp::new().await;
    let (room_id, _) = create_room_with_beds(&app, "Dorm A", 1).await;
    let booking_id = create_booking(&app, room_id, 1, "2025-01-01", "2025-01-05").await;

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-02&check_out=2025-01-06", room_id)).await;
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 0);

    // With the booking's own rows excluded, the bed counts as free.
    let res = get(&app, &format!(
        "/rooms/{}/availability?check_in=2025-01-02&check_out=2025-01-06&exclude_booking_id={}",
        room_id, booking_id
    )).await;
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 1);
}

#[tokio::test]
async fn test_availability_requires_dates() {
    let app = TestApp::new().await;
    let (room_id, _) = create_room_with_beds(&app, "Dorm A", 1).await;

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01", room_id)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-05&check_out=2025-01-01", room_id)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = get(&app, "/rooms/9999/availability?check_in=2025-01-01&check_out=2025-01-02").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_calendar_occupancy_map() {
    let app = TestApp::new().await;
    let (room_id, bed_ids) = create_room_with_beds(&app, "Dorm A", 1).await;
    let booking_id = create_booking(&app, room_id, 1, "2025-01-01", "2025-01-03").await;

    let res = get(&app, "/bookings/calendar?startDate=2025-01-01&endDate=2025-01-31").await;
    assert_eq!(res.status(), StatusCode::OK);
    let map = parse_body(res).await;

    let bed_key = bed_ids[0].to_string();
    let nights = map[&bed_key].as_object().unwrap();
    assert_eq!(nights.len(), 2, "two nights occupied");
    assert_eq!(nights["2025-01-01"]["booking_id"].as_i64().unwrap(), booking_id);
    assert_eq!(nights["2025-01-02"]["booking_name"].as_str().unwrap(), "Asha Mehta");
    assert!(nights.get("2025-01-03").is_none(), "checkout day is free");
}

#[tokio::test]
async fn test_calendar_requires_range() {
    let app = TestApp::new().await;
    let res = get(&app, "/bookings/calendar?startDate=2025-01-01").await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_manual_bed_reassignment_checks_overlap() {
    let app = TestApp::new().await;
    let (room_id, bed_ids) = create_room_with_beds(&app, "Dorm A", 3).await;

    let first = create_booking(&app, room_id, 1, "2025-01-01", "2025-01-03").await;
    let second = create_booking(&app, room_id, 1, "2025-01-01", "2025-01-03").await;

    // Deterministic order: first booking sits on bed 0, second on bed 1.
    let res = get(&app, &format!("/bookings/{}/beds", first)).await;
    let first_assignment = parse_body(res).await[0]["booking_bed_id"].as_i64().unwrap();
    let res = get(&app, &format!("/bookings/{}/beds", second)).await;
    assert_eq!(parse_body(res).await[0]["bed_id"].as_i64().unwrap(), bed_ids[1]);

    // Moving the first booking onto the second's bed is a conflict.
    let res = put_json(&app, &format!("/booking-beds/{}", first_assignment), json!({ "bed_id": bed_ids[1] })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    // Moving it to the free third bed works.
    let res = put_json(&app, &format!("/booking-beds/{}", first_assignment), json!({ "bed_id": bed_ids[2] })).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(parse_body(res).await["bed_id"].as_i64().unwrap(), bed_ids[2]);
}

#[tokio::test]
async fn test_unassign_single_bed() {
    let app = TestApp::new().await;
    let (room_id, _) = create_room_with_beds(&app, "Dorm A", 2).await;
    let booking_id = create_booking(&app, room_id, 2, "2025-01-01", "2025-01-03").await;

    let res = get(&app, &format!("/bookings/{}/beds", booking_id)).await;
    let assignment_id = parse_body(res).await[0]["booking_bed_id"].as_i64().unwrap();

    let res = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(format!("/booking-beds/{}", assignment_id))
            .body(Body::empty()).unwrap()
    ).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = get(&app, &format!("/rooms/{}/availability?check_in=2025-01-01&check_out=2025-01-03", room_id)).await;
    assert_eq!(parse_body(res).await["available_beds"].as_i64().unwrap(), 1);
}
