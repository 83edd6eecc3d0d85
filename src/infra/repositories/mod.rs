pub mod sqlite_assignment_repo;
pub mod sqlite_bed_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_room_repo;
