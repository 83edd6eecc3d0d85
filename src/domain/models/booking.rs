use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::services::financials::Financials;

/// A reservation. The financial columns (commission, gst, pending_amount,
/// payment_status, bank) are derived from ota_name, base_amount and
/// payment_received and are always written together with them.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub booking_id: i64,
    pub booking_name: String,
    pub ota_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_adults: i64,
    pub number_of_nights: i64,
    pub base_amount: i64,
    pub payment_received: i64,
    pub commission: i64,
    pub gst: i64,
    pub pending_amount: i64,
    pub payment_status: String,
    pub bank: String,
    pub created_at: DateTime<Utc>,
}

/// Insert draft for a booking row; ids are assigned by the database.
pub struct NewBooking {
    pub booking_name: String,
    pub ota_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_adults: i64,
    pub number_of_nights: i64,
    pub base_amount: i64,
    pub payment_received: i64,
    pub financials: Financials,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub booking_name: String,
    pub ota_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub number_of_adults: i64,
    pub base_amount: i64,
    pub payment_received: i64,
}

impl NewBooking {
    pub fn new(params: NewBookingParams) -> Self {
        let number_of_nights = (params.check_out - params.check_in).num_days();
        let financials = Financials::compute(
            &params.ota_name,
            params.base_amount,
            params.payment_received,
        );

        Self {
            booking_name: params.booking_name,
            ota_name: params.ota_name,
            check_in: params.check_in,
            check_out: params.check_out,
            number_of_adults: params.number_of_adults,
            number_of_nights,
            base_amount: params.base_amount,
            payment_received: params.payment_received,
            financials,
            created_at: Utc::now(),
        }
    }
}

/// One room leg of a booking, carrying the guest count requested for that room.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingRoom {
    pub booking_room_id: i64,
    pub booking_id: i64,
    pub room_id: i64,
    pub number_of_guests: i64,
    pub assigned_at: DateTime<Utc>,
}

/// A bed held for a booking over [check_in, check_out). This is the row the
/// overlap invariant operates on: no two rows for one bed may overlap.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct BookingBed {
    pub booking_bed_id: i64,
    pub booking_id: i64,
    pub booking_room_id: i64,
    pub bed_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub assigned_at: DateTime<Utc>,
}

/// Insert draft for a bed assignment.
pub struct NewBedAssignment {
    pub booking_id: i64,
    pub booking_room_id: i64,
    pub bed_id: i64,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}
