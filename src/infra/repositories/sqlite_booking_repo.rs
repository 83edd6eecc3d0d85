use crate::domain::{models::booking::{Booking, NewBooking}, ports::BookingRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::SqlitePool;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create(&self, booking: &NewBooking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (booking_name, ota_name, check_in, check_out, number_of_adults, number_of_nights, base_amount, payment_received, commission, gst, pending_amount, payment_status, bank, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&booking.booking_name).bind(&booking.ota_name)
            .bind(booking.check_in).bind(booking.check_out)
            .bind(booking.number_of_adults).bind(booking.number_of_nights)
            .bind(booking.base_amount).bind(booking.payment_received)
            .bind(booking.financials.commission).bind(booking.financials.gst)
            .bind(booking.financials.pending_amount).bind(&booking.financials.payment_status)
            .bind(&booking.financials.bank).bind(booking.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, check_in: Option<NaiveDate>) -> Result<Vec<Booking>, AppError> {
        match check_in {
            Some(date) => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings WHERE check_in = ? ORDER BY check_in ASC, booking_id ASC"
            )
                .bind(date).fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings ORDER BY check_in ASC, booking_id ASC"
            )
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET booking_name = ?, ota_name = ?, check_in = ?, check_out = ?, number_of_adults = ?, number_of_nights = ?, base_amount = ?, payment_received = ?, commission = ?, gst = ?, pending_amount = ?, payment_status = ?, bank = ?
             WHERE booking_id = ?
             RETURNING *"
        )
            .bind(&booking.booking_name).bind(&booking.ota_name)
            .bind(booking.check_in).bind(booking.check_out)
            .bind(booking.number_of_adults).bind(booking.number_of_nights)
            .bind(booking.base_amount).bind(booking.payment_received)
            .bind(booking.commission).bind(booking.gst)
            .bind(booking.pending_amount).bind(&booking.payment_status)
            .bind(&booking.bank).bind(booking.booking_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE booking_id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking not found".into()));
        }
        Ok(())
    }
}
