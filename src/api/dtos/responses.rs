use serde::Serialize;

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub room_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub available_beds: i64,
    /// Present when the caller asked for a specific bed count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_available: Option<bool>,
}
