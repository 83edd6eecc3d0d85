use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;

use crate::api::handlers::{bed, booking, booking_bed, booking_room, health, room};
use crate::state::AppState;
use tower_http::{
    classify::ServerErrorsFailureClass,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, Span};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Bookings
        .route("/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/bookings/calendar", get(booking::get_calendar))
        .route("/bookings/{booking_id}", get(booking::get_booking).put(booking::update_booking).delete(booking::delete_booking))
        .route("/bookings/{booking_id}/details", get(booking::get_booking_details))
        .route("/bookings/{booking_id}/rooms", get(booking_room::list_rooms_for_booking))
        .route("/bookings/{booking_id}/beds", get(booking_bed::list_beds_for_booking))

        // Room and bed assignment rows
        .route("/booking-rooms/{booking_room_id}", delete(booking_room::remove_room_from_booking))
        .route("/booking-beds/{booking_bed_id}", put(booking_bed::reassign_bed).delete(booking_bed::unassign_bed))

        // Rooms
        .route("/rooms", post(room::create_room).get(room::list_rooms))
        .route("/rooms/{room_id}", get(room::get_room).put(room::update_room).delete(room::delete_room))
        .route("/rooms/{room_id}/capacity", put(room::sync_room_capacity))
        .route("/rooms/{room_id}/availability", get(room::get_room_availability))

        // Beds
        .route("/beds", post(bed::create_bed).get(bed::list_beds))
        .route("/beds/{bed_id}", get(bed::get_bed).put(bed::update_bed).delete(bed::delete_bed))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
