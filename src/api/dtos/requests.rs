use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateRoomRequest {
    pub room_name: String,
    #[serde(default)]
    pub capacity: i64,
}

#[derive(Deserialize)]
pub struct UpdateRoomRequest {
    pub room_name: Option<String>,
    pub capacity: Option<i64>,
}

#[derive(Deserialize)]
pub struct CreateBedRequest {
    pub room_id: i64,
    pub bed_name: String,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBedRequest {
    pub bed_name: Option<String>,
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ReassignBedRequest {
    pub bed_id: i64,
}
