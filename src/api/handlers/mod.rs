pub mod bed;
pub mod booking;
pub mod booking_bed;
pub mod booking_room;
pub mod health;
pub mod room;
