use crate::domain::{
    models::booking::{BookingBed, BookingRoom, NewBedAssignment},
    ports::AssignmentRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub struct SqliteAssignmentRepo {
    pool: SqlitePool,
}

impl SqliteAssignmentRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CalendarRow {
    #[sqlx(flatten)]
    assignment: BookingBed,
    booking_name: String,
}

#[async_trait]
impl AssignmentRepository for SqliteAssignmentRepo {
    async fn occupied_beds(
        &self,
        bed_ids: &[i64],
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<i64>,
    ) -> Result<Vec<i64>, AppError> {
        if bed_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Half-open overlap: an assignment collides with [check_in, check_out)
        // iff it starts before our end and ends after our start.
        let mut qb = QueryBuilder::<Sqlite>::new(
            "SELECT DISTINCT bed_id FROM booking_beds WHERE check_in < "
        );
        qb.push_bind(check_out);
        qb.push(" AND check_out > ");
        qb.push_bind(check_in);
        qb.push(" AND bed_id IN (");
        {
            let mut separated = qb.separated(", ");
            for id in bed_ids {
                separated.push_bind(*id);
            }
        }
        qb.push(")");
        if let Some(booking_id) = exclude_booking_id {
            qb.push(" AND booking_id != ");
            qb.push_bind(booking_id);
        }

        qb.build_query_scalar::<i64>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn insert_room(
        &self,
        booking_id: i64,
        room_id: i64,
        number_of_guests: i64,
    ) -> Result<BookingRoom, AppError> {
        sqlx::query_as::<_, BookingRoom>(
            "INSERT INTO booking_rooms (booking_id, room_id, number_of_guests, assigned_at)
             VALUES (?, ?, ?, ?)
             RETURNING *"
        )
            .bind(booking_id).bind(room_id).bind(number_of_guests).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn insert_beds(&self, assignments: &[NewBedAssignment]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        for a in assignments {
            // The overlap invariant is re-verified inside the transaction:
            // a concurrent claim that slipped past the pre-check rolls the
            // whole insert back as a conflict.
            let clashes: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM booking_beds
                 WHERE bed_id = ? AND check_in < ? AND check_out > ? AND booking_id != ?"
            )
                .bind(a.bed_id).bind(a.check_out).bind(a.check_in).bind(a.booking_id)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

            if clashes > 0 {
                return Err(AppError::Conflict(format!(
                    "Bed {} is already booked for overlapping dates", a.bed_id
                )));
            }

            sqlx::query(
                "INSERT INTO booking_beds (booking_id, booking_room_id, bed_id, check_in, check_out, assigned_at)
                 VALUES (?, ?, ?, ?, ?, ?)"
            )
                .bind(a.booking_id).bind(a.booking_room_id).bind(a.bed_id)
                .bind(a.check_in).bind(a.check_out).bind(Utc::now())
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn rooms_for_booking(&self, booking_id: i64) -> Result<Vec<BookingRoom>, AppError> {
        sqlx::query_as::<_, BookingRoom>(
            "SELECT * FROM booking_rooms WHERE booking_id = ? ORDER BY booking_room_id ASC"
        )
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn beds_for_booking(&self, booking_id: i64) -> Result<Vec<BookingBed>, AppError> {
        sqlx::query_as::<_, BookingBed>(
            "SELECT * FROM booking_beds WHERE booking_id = ? ORDER BY booking_bed_id ASC"
        )
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_room(&self, booking_room_id: i64) -> Result<Option<BookingRoom>, AppError> {
        sqlx::query_as::<_, BookingRoom>("SELECT * FROM booking_rooms WHERE booking_room_id = ?")
            .bind(booking_room_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_bed(&self, booking_bed_id: i64) -> Result<Option<BookingBed>, AppError> {
        sqlx::query_as::<_, BookingBed>("SELECT * FROM booking_beds WHERE booking_bed_id = ?")
            .bind(booking_bed_id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn beds_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<(BookingBed, String)>, AppError> {
        let rows = sqlx::query_as::<_, CalendarRow>(
            "SELECT bb.*, b.booking_name FROM booking_beds bb
             JOIN bookings b ON b.booking_id = bb.booking_id
             WHERE bb.check_in < ? AND bb.check_out > ?
             ORDER BY bb.bed_id ASC, bb.check_in ASC"
        )
            .bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)?;

        Ok(rows.into_iter().map(|r| (r.assignment, r.booking_name)).collect())
    }

    async fn update_bed_assignment(
        &self,
        booking_bed_id: i64,
        bed_id: i64,
    ) -> Result<BookingBed, AppError> {
        sqlx::query_as::<_, BookingBed>(
            "UPDATE booking_beds SET bed_id = ? WHERE booking_bed_id = ? RETURNING *"
        )
            .bind(bed_id).bind(booking_bed_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete_bed_assignment(&self, booking_bed_id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM booking_beds WHERE booking_bed_id = ?")
            .bind(booking_bed_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bed assignment not found".into()));
        }
        Ok(())
    }

    async fn delete_room_assignment(&self, booking_room_id: i64) -> Result<(), AppError> {
        // Child rows first.
        sqlx::query("DELETE FROM booking_beds WHERE booking_room_id = ?")
            .bind(booking_room_id).execute(&self.pool).await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM booking_rooms WHERE booking_room_id = ?")
            .bind(booking_room_id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Booking room not found".into()));
        }
        Ok(())
    }

    async fn delete_for_booking(&self, booking_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM booking_beds WHERE booking_id = ?")
            .bind(booking_id).execute(&self.pool).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM booking_rooms WHERE booking_id = ?")
            .bind(booking_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
