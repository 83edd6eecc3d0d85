use crate::domain::models::{
    booking::{Booking, BookingBed, BookingRoom, NewBedAssignment, NewBooking},
    room::{Bed, Room},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn create(&self, room_name: &str, capacity: i64) -> Result<Room, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError>;
    async fn list(&self) -> Result<Vec<Room>, AppError>;
    async fn update(&self, room: &Room) -> Result<Room, AppError>;
    async fn set_capacity(&self, id: i64, capacity: i64) -> Result<(), AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait BedRepository: Send + Sync {
    async fn create(&self, room_id: i64, bed_name: &str, status: &str) -> Result<Bed, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Bed>, AppError>;
    async fn list(&self) -> Result<Vec<Bed>, AppError>;
    async fn list_by_room(&self, room_id: i64) -> Result<Vec<Bed>, AppError>;
    async fn update(&self, bed: &Bed) -> Result<Bed, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
    async fn delete_by_room(&self, room_id: i64) -> Result<(), AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, booking: &NewBooking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError>;
    async fn list(&self, check_in: Option<NaiveDate>) -> Result<Vec<Booking>, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

/// Room and bed assignment rows of a booking. `occupied_beds` is the
/// interval-overlap query everything else builds on; `insert_beds` is the
/// write-time guard of that invariant.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Which of `bed_ids` already hold an assignment overlapping
    /// [check_in, check_out), half-open. Rows belonging to
    /// `exclude_booking_id` are ignored so a booking never conflicts with
    /// itself during reassignment.
    async fn occupied_beds(
        &self,
        bed_ids: &[i64],
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<i64>,
    ) -> Result<Vec<i64>, AppError>;

    async fn insert_room(
        &self,
        booking_id: i64,
        room_id: i64,
        number_of_guests: i64,
    ) -> Result<BookingRoom, AppError>;

    /// Inserts all assignments in one transaction, re-verifying the overlap
    /// invariant inside it. A concurrent claim of any of these beds rolls
    /// the whole insert back with `AppError::Conflict`.
    async fn insert_beds(&self, assignments: &[NewBedAssignment]) -> Result<(), AppError>;

    async fn rooms_for_booking(&self, booking_id: i64) -> Result<Vec<BookingRoom>, AppError>;
    async fn beds_for_booking(&self, booking_id: i64) -> Result<Vec<BookingBed>, AppError>;
    async fn find_room(&self, booking_room_id: i64) -> Result<Option<BookingRoom>, AppError>;
    async fn find_bed(&self, booking_bed_id: i64) -> Result<Option<BookingBed>, AppError>;

    /// All assignments intersecting [start, end), joined with the owning
    /// booking's name. Feeds the calendar occupancy map.
    async fn beds_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(BookingBed, String)>, AppError>;

    async fn update_bed_assignment(
        &self,
        booking_bed_id: i64,
        bed_id: i64,
    ) -> Result<BookingBed, AppError>;

    async fn delete_bed_assignment(&self, booking_bed_id: i64) -> Result<(), AppError>;

    /// Removes one room leg: its booking_beds first, then the booking_room.
    async fn delete_room_assignment(&self, booking_room_id: i64) -> Result<(), AppError>;

    /// Cascade for a whole booking: booking_beds first, then booking_rooms.
    async fn delete_for_booking(&self, booking_id: i64) -> Result<(), AppError>;
}
