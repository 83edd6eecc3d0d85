//! Deterministic bed selection for one room leg of a booking, and the
//! per-room serialization guard around check-and-assign.

use std::sync::Arc;

use chrono::NaiveDate;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::models::room::Room;
use crate::domain::ports::{AssignmentRepository, BedRepository};
use crate::domain::services::availability::available_beds;
use crate::error::AppError;

/// Async mutex registry keyed by room id. The overlap read and the
/// assignment write are separate persistence calls, so concurrent requests
/// for the same room must be serialized across the whole check-and-assign
/// sequence. Callers locking several rooms must acquire in ascending
/// room-id order.
#[derive(Default)]
pub struct RoomLocks {
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl RoomLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, room_id: i64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(room_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

/// Picks the first `number_of_guests` free beds of the room for
/// [check_in, check_out), ascending by bed id. Fails hard with
/// `InsufficientCapacity` when the room cannot hold them all; beds are
/// never partially assigned.
pub async fn allocate_beds(
    bed_repo: &dyn BedRepository,
    assignment_repo: &dyn AssignmentRepository,
    room: &Room,
    number_of_guests: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<i64>,
) -> Result<Vec<i64>, AppError> {
    let free = available_beds(
        bed_repo,
        assignment_repo,
        room.room_id,
        check_in,
        check_out,
        exclude_booking_id,
    )
    .await?;

    if (free.len() as i64) < number_of_guests {
        return Err(AppError::InsufficientCapacity {
            room_id: room.room_id,
            room_name: room.room_name.clone(),
            needed: number_of_guests,
            available: free.len() as i64,
        });
    }

    Ok(free.into_iter().take(number_of_guests as usize).collect())
}
