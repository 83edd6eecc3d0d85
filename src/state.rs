use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    AssignmentRepository, BedRepository, BookingRepository, RoomRepository,
};
use crate::domain::services::allocation::RoomLocks;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub room_repo: Arc<dyn RoomRepository>,
    pub bed_repo: Arc<dyn BedRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub assignment_repo: Arc<dyn AssignmentRepository>,
    pub room_locks: Arc<RoomLocks>,
}
