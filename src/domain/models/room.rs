use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub room_id: i64,
    pub room_name: String,
    pub capacity: i64,
    pub created_at: DateTime<Utc>,
}

/// Bed status is informational only. Availability is derived from
/// assignment overlap, never from this flag.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Bed {
    pub bed_id: i64,
    pub room_id: i64,
    pub bed_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct RoomWithBeds {
    #[serde(flatten)]
    pub room: Room,
    pub beds: Vec<Bed>,
}
