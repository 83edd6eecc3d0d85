//! Top-level booking use cases: orchestrated create, update with financial
//! recomputation and reassignment, cascade delete, room-leg removal, manual
//! bed moves and the calendar occupancy map.
//!
//! The persistence gateway offers no cross-table transactions, so the
//! multi-step flows here validate everything up front and compensate
//! explicitly (child-before-parent deletes) when a later step fails.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;
use tracing::{error, info, warn};

use crate::domain::models::booking::{
    Booking, BookingBed, BookingRoom, NewBedAssignment, NewBooking, NewBookingParams,
};
use crate::domain::models::room::Room;
use crate::domain::services::allocation::allocate_beds;
use crate::domain::services::availability::available_beds;
use crate::domain::services::financials::Financials;
use crate::error::AppError;
use crate::state::AppState;

// Incoming fields are optional at the wire level so validation can name the
// missing field instead of surfacing a deserialization error.
#[derive(Deserialize)]
pub struct CreateBookingData {
    pub booking_name: Option<String>,
    pub ota_name: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub number_of_adults: Option<i64>,
    pub base_amount: Option<i64>,
    pub payment_received: Option<i64>,
    /// Room id (as JSON object key) -> number of guests for that room.
    pub guests_per_room: Option<HashMap<String, i64>>,
}

#[derive(Deserialize)]
pub struct UpdateBookingData {
    pub booking_name: Option<String>,
    pub ota_name: Option<String>,
    pub check_in: Option<String>,
    pub check_out: Option<String>,
    pub number_of_adults: Option<i64>,
    pub base_amount: Option<i64>,
    pub payment_received: Option<i64>,
    pub guests_per_room: Option<HashMap<String, i64>>,
}

#[derive(Serialize)]
pub struct CalendarEntry {
    pub booking_id: i64,
    pub booking_name: String,
}

#[derive(Serialize)]
pub struct BookingRoomWithBeds {
    #[serde(flatten)]
    pub room: BookingRoom,
    pub beds: Vec<BookingBed>,
}

#[derive(Serialize)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub rooms: Vec<BookingRoomWithBeds>,
}

pub struct CreateBookingInput {
    pub booking_name: String,
    pub ota_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_adults: i64,
    pub base_amount: i64,
    pub payment_received: i64,
    /// (room_id, number_of_guests), ascending by room id. The stable order
    /// doubles as the lock-acquisition order.
    pub guests_per_room: Vec<(i64, i64)>,
}

fn parse_date(value: &str, field: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("{field} must be an ISO-8601 date (YYYY-MM-DD)")))
}

fn parse_guests_per_room(map: &HashMap<String, i64>) -> Result<Vec<(i64, i64)>, AppError> {
    let mut parsed = Vec::with_capacity(map.len());
    for (key, guests) in map {
        let room_id: i64 = key.parse().map_err(|_| {
            AppError::Validation(format!("guests_per_room key '{key}' is not a valid room id"))
        })?;
        if *guests <= 0 {
            return Err(AppError::Validation(format!(
                "guests_per_room[{key}] must be a positive number"
            )));
        }
        parsed.push((room_id, *guests));
    }
    parsed.sort_unstable_by_key(|(room_id, _)| *room_id);
    Ok(parsed)
}

/// Shape-and-value validation of a create request. Runs before anything is
/// read or written; failures name the offending field.
pub fn validate_booking_data(payload: &CreateBookingData) -> Result<CreateBookingInput, AppError> {
    let booking_name = payload
        .booking_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::Validation("Missing required field: booking_name".into()))?;
    let check_in_raw = payload
        .check_in
        .as_deref()
        .ok_or(AppError::Validation("Missing required field: check_in".into()))?;
    let check_out_raw = payload
        .check_out
        .as_deref()
        .ok_or(AppError::Validation("Missing required field: check_out".into()))?;
    let ota_name = payload
        .ota_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(AppError::Validation("Missing required field: ota_name".into()))?;
    let base_amount = payload
        .base_amount
        .ok_or(AppError::Validation("Missing required field: base_amount".into()))?;

    let check_in = parse_date(check_in_raw, "check_in")?;
    let check_out = parse_date(check_out_raw, "check_out")?;
    if check_out <= check_in {
        return Err(AppError::Validation("Check-out date must be after check-in date".into()));
    }

    let payment_received = payload.payment_received.unwrap_or(0);
    if base_amount < 0 || payment_received < 0 {
        return Err(AppError::Validation("Amounts must be non-negative numbers".into()));
    }

    let number_of_adults = payload.number_of_adults.unwrap_or(0);
    if number_of_adults <= 0 {
        return Err(AppError::Validation("Number of adults must be a positive number".into()));
    }

    let guests_per_room = payload
        .guests_per_room
        .as_ref()
        .filter(|m| !m.is_empty())
        .ok_or(AppError::Validation("Guests must be assigned to at least one room".into()))?;

    Ok(CreateBookingInput {
        booking_name: booking_name.to_string(),
        ota_name: ota_name.to_string(),
        check_in,
        check_out,
        number_of_adults,
        base_amount,
        payment_received,
        guests_per_room: parse_guests_per_room(guests_per_room)?,
    })
}

async fn resolve_rooms(
    state: &AppState,
    guests_per_room: &[(i64, i64)],
) -> Result<Vec<(Room, i64)>, AppError> {
    let mut rooms = Vec::with_capacity(guests_per_room.len());
    for (room_id, guests) in guests_per_room {
        let room = state
            .room_repo
            .find_by_id(*room_id)
            .await?
            .ok_or(AppError::NotFound(format!("Room {room_id} not found")))?;
        rooms.push((room, *guests));
    }
    Ok(rooms)
}

/// Locks every room of the request, ascending by room id so concurrent
/// multi-room bookings cannot deadlock. Guards live until the caller drops
/// them, covering the whole check-and-assign sequence.
async fn lock_rooms(state: &AppState, rooms: &[(Room, i64)]) -> Vec<OwnedMutexGuard<()>> {
    let mut guards = Vec::with_capacity(rooms.len());
    for (room, _) in rooms {
        guards.push(state.room_locks.acquire(room.room_id).await);
    }
    guards
}

/// All-or-nothing capacity pass: every requested room must be able to hold
/// its guests for the window before anything is written.
async fn precheck_capacity(
    state: &AppState,
    rooms: &[(Room, i64)],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<i64>,
) -> Result<(), AppError> {
    for (room, guests) in rooms {
        let free = available_beds(
            state.bed_repo.as_ref(),
            state.assignment_repo.as_ref(),
            room.room_id,
            check_in,
            check_out,
            exclude_booking_id,
        )
        .await?;
        if (free.len() as i64) < *guests {
            return Err(AppError::InsufficientCapacity {
                room_id: room.room_id,
                room_name: room.room_name.clone(),
                needed: *guests,
                available: free.len() as i64,
            });
        }
    }
    Ok(())
}

/// Persists one BookingRoom per room leg and the allocated BookingBeds under
/// it. Any failure is returned to the caller for compensation.
async fn persist_assignments(
    state: &AppState,
    booking: &Booking,
    rooms: &[(Room, i64)],
    exclude_booking_id: Option<i64>,
) -> Result<(), AppError> {
    for (room, guests) in rooms {
        let booking_room = state
            .assignment_repo
            .insert_room(booking.booking_id, room.room_id, *guests)
            .await?;

        let bed_ids = allocate_beds(
            state.bed_repo.as_ref(),
            state.assignment_repo.as_ref(),
            room,
            *guests,
            booking.check_in,
            booking.check_out,
            exclude_booking_id,
        )
        .await?;

        let assignments: Vec<NewBedAssignment> = bed_ids
            .into_iter()
            .map(|bed_id| NewBedAssignment {
                booking_id: booking.booking_id,
                booking_room_id: booking_room.booking_room_id,
                bed_id,
                check_in: booking.check_in,
                check_out: booking.check_out,
            })
            .collect();

        state.assignment_repo.insert_beds(&assignments).await?;
    }
    Ok(())
}

/// Compensating cascade after a partial write: booking_beds, then
/// booking_rooms, then the booking row itself. A cleanup failure is
/// reported alongside the original failure, never in place of it.
async fn compensate_failed_create(state: &AppState, booking_id: i64, original: AppError) -> AppError {
    warn!("Rolling back partially created booking {}", booking_id);
    let cleanup = async {
        state.assignment_repo.delete_for_booking(booking_id).await?;
        state.booking_repo.delete(booking_id).await
    };
    match cleanup.await {
        Ok(()) => AppError::Consistency(format!(
            "Booking creation failed after partial writes (rolled back): {original}"
        )),
        Err(cleanup_err) => {
            error!(
                "Cleanup of partially created booking {} failed: {}",
                booking_id, cleanup_err
            );
            AppError::Consistency(format!(
                "Booking creation failed after partial writes: {original}; cleanup also failed: {cleanup_err}"
            ))
        }
    }
}

pub async fn create_booking(state: &Arc<AppState>, input: CreateBookingInput) -> Result<Booking, AppError> {
    let rooms = resolve_rooms(state, &input.guests_per_room).await?;

    let _guards = lock_rooms(state, &rooms).await;

    precheck_capacity(state, &rooms, input.check_in, input.check_out, None).await?;

    let draft = NewBooking::new(NewBookingParams {
        booking_name: input.booking_name,
        ota_name: input.ota_name,
        check_in: input.check_in,
        check_out: input.check_out,
        number_of_adults: input.number_of_adults,
        base_amount: input.base_amount,
        payment_received: input.payment_received,
    });

    let booking = state.booking_repo.create(&draft).await?;
    info!("Booking {} created, assigning rooms and beds", booking.booking_id);

    if let Err(e) = persist_assignments(state, &booking, &rooms, None).await {
        return Err(compensate_failed_create(state, booking.booking_id, e).await);
    }

    info!("Booking confirmed: {}", booking.booking_id);
    Ok(booking)
}

pub async fn update_booking(
    state: &Arc<AppState>,
    booking_id: i64,
    payload: UpdateBookingData,
) -> Result<Booking, AppError> {
    let mut booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    if let Some(name) = payload.booking_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("booking_name must not be empty".into()));
        }
        booking.booking_name = name;
    }
    if let Some(adults) = payload.number_of_adults {
        if adults <= 0 {
            return Err(AppError::Validation("Number of adults must be a positive number".into()));
        }
        booking.number_of_adults = adults;
    }

    let mut dates_changed = false;
    if let Some(raw) = payload.check_in.as_deref() {
        let check_in = parse_date(raw, "check_in")?;
        dates_changed |= check_in != booking.check_in;
        booking.check_in = check_in;
    }
    if let Some(raw) = payload.check_out.as_deref() {
        let check_out = parse_date(raw, "check_out")?;
        dates_changed |= check_out != booking.check_out;
        booking.check_out = check_out;
    }
    if booking.check_out <= booking.check_in {
        return Err(AppError::Validation("Check-out date must be after check-in date".into()));
    }
    booking.number_of_nights = (booking.check_out - booking.check_in).num_days();

    let financials_changed =
        payload.ota_name.is_some() || payload.base_amount.is_some() || payload.payment_received.is_some();
    if let Some(ota_name) = payload.ota_name {
        booking.ota_name = ota_name;
    }
    if let Some(base_amount) = payload.base_amount {
        booking.base_amount = base_amount;
    }
    if let Some(payment_received) = payload.payment_received {
        booking.payment_received = payment_received;
    }
    if booking.base_amount < 0 || booking.payment_received < 0 {
        return Err(AppError::Validation("Amounts must be non-negative numbers".into()));
    }

    if financials_changed {
        // All five derived fields move together with their inputs; the
        // single UPDATE below makes them visible atomically.
        let f = Financials::compute(&booking.ota_name, booking.base_amount, booking.payment_received);
        booking.commission = f.commission;
        booking.gst = f.gst;
        booking.pending_amount = f.pending_amount;
        booking.payment_status = f.payment_status;
        booking.bank = f.bank;
    }

    let reassign = dates_changed || payload.guests_per_room.is_some();
    if reassign {
        let guests_per_room = match payload.guests_per_room.as_ref() {
            Some(map) if map.is_empty() => {
                return Err(AppError::Validation("Guests must be assigned to at least one room".into()))
            }
            Some(map) => parse_guests_per_room(map)?,
            None => {
                // Same room composition, new dates: rebuild the map from the
                // booking's current room legs.
                let mut existing: Vec<(i64, i64)> = state
                    .assignment_repo
                    .rooms_for_booking(booking_id)
                    .await?
                    .into_iter()
                    .map(|r| (r.room_id, r.number_of_guests))
                    .collect();
                existing.sort_unstable_by_key(|(room_id, _)| *room_id);
                existing
            }
        };

        let rooms = resolve_rooms(state, &guests_per_room).await?;
        let _guards = lock_rooms(state, &rooms).await;

        // Validate the new window before tearing anything down. The booking
        // id is excluded so its own current assignments don't count as
        // conflicts.
        precheck_capacity(state, &rooms, booking.check_in, booking.check_out, Some(booking_id)).await?;

        state.assignment_repo.delete_for_booking(booking_id).await?;

        if let Err(e) = persist_assignments(state, &booking, &rooms, Some(booking_id)).await {
            let msg = match state.assignment_repo.delete_for_booking(booking_id).await {
                Ok(()) => format!(
                    "Reassignment of booking {booking_id} failed after its previous assignments were removed: {e}"
                ),
                Err(cleanup_err) => {
                    error!(
                        "Cleanup after failed reassignment of booking {} failed: {}",
                        booking_id, cleanup_err
                    );
                    format!(
                        "Reassignment of booking {booking_id} failed: {e}; cleanup also failed: {cleanup_err}"
                    )
                }
            };
            return Err(AppError::Consistency(msg));
        }

        let updated = state.booking_repo.update(&booking).await?;
        info!("Booking {} updated with reassignment", booking_id);
        return Ok(updated);
    }

    let updated = state.booking_repo.update(&booking).await?;
    info!("Booking {} updated", booking_id);
    Ok(updated)
}

/// Cascade delete: booking_beds, then booking_rooms, then the booking row.
pub async fn delete_booking(state: &Arc<AppState>, booking_id: i64) -> Result<(), AppError> {
    state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    state.assignment_repo.delete_for_booking(booking_id).await?;
    state.booking_repo.delete(booking_id).await?;
    info!("Booking cancelled: {}", booking_id);
    Ok(())
}

/// Removes one room leg from a booking along with its bed assignments.
pub async fn remove_room_from_booking(state: &Arc<AppState>, booking_room_id: i64) -> Result<(), AppError> {
    state
        .assignment_repo
        .find_room(booking_room_id)
        .await?
        .ok_or(AppError::NotFound("Booking room not found".into()))?;

    state.assignment_repo.delete_room_assignment(booking_room_id).await
}

/// Manual single-bed move (calendar drag & drop). The target bed must be
/// free for the assignment's window; the owning booking's other rows are
/// excluded from the check.
pub async fn reassign_bed(
    state: &Arc<AppState>,
    booking_bed_id: i64,
    new_bed_id: i64,
) -> Result<BookingBed, AppError> {
    let assignment = state
        .assignment_repo
        .find_bed(booking_bed_id)
        .await?
        .ok_or(AppError::NotFound("Bed assignment not found".into()))?;

    let bed = state
        .bed_repo
        .find_by_id(new_bed_id)
        .await?
        .ok_or(AppError::NotFound(format!("Bed {new_bed_id} not found")))?;

    let _guard = state.room_locks.acquire(bed.room_id).await;

    let occupied = state
        .assignment_repo
        .occupied_beds(
            &[new_bed_id],
            assignment.check_in,
            assignment.check_out,
            Some(assignment.booking_id),
        )
        .await?;
    if !occupied.is_empty() {
        return Err(AppError::Conflict(format!(
            "Bed {new_bed_id} is already booked for the selected dates"
        )));
    }

    state
        .assignment_repo
        .update_bed_assignment(booking_bed_id, new_bed_id)
        .await
}

pub async fn booking_details(state: &Arc<AppState>, booking_id: i64) -> Result<BookingDetails, AppError> {
    let booking = state
        .booking_repo
        .find_by_id(booking_id)
        .await?
        .ok_or(AppError::NotFound("Booking not found".into()))?;

    let rooms = state.assignment_repo.rooms_for_booking(booking_id).await?;
    let beds = state.assignment_repo.beds_for_booking(booking_id).await?;

    let rooms = rooms
        .into_iter()
        .map(|room| {
            let beds = beds
                .iter()
                .filter(|b| b.booking_room_id == room.booking_room_id)
                .cloned()
                .collect();
            BookingRoomWithBeds { room, beds }
        })
        .collect();

    Ok(BookingDetails { booking, rooms })
}

/// Bed x date occupancy map over [start, end): for every night of every
/// assignment in range, which booking holds the bed.
pub async fn calendar_occupancy(
    state: &Arc<AppState>,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<i64, HashMap<String, CalendarEntry>>, AppError> {
    let rows = state.assignment_repo.beds_in_range(start, end).await?;

    let mut map: HashMap<i64, HashMap<String, CalendarEntry>> = HashMap::new();
    for (assignment, booking_name) in rows {
        let mut day = assignment.check_in;
        while day < assignment.check_out {
            map.entry(assignment.bed_id).or_default().insert(
                day.format("%Y-%m-%d").to_string(),
                CalendarEntry {
                    booking_id: assignment.booking_id,
                    booking_name: booking_name.clone(),
                },
            );
            day = day.succ_opt().ok_or(AppError::Internal)?;
        }
    }
    Ok(map)
}
