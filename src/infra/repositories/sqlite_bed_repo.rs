use crate::domain::{models::room::Bed, ports::BedRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteBedRepo {
    pool: SqlitePool,
}

impl SqliteBedRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BedRepository for SqliteBedRepo {
    async fn create(&self, room_id: i64, bed_name: &str, status: &str) -> Result<Bed, AppError> {
        sqlx::query_as::<_, Bed>(
            "INSERT INTO beds (room_id, bed_name, status, created_at) VALUES (?, ?, ?, ?) RETURNING *"
        )
            .bind(room_id).bind(bed_name).bind(status).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Bed>, AppError> {
        sqlx::query_as::<_, Bed>("SELECT * FROM beds WHERE bed_id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Bed>, AppError> {
        sqlx::query_as::<_, Bed>("SELECT * FROM beds ORDER BY bed_id ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_room(&self, room_id: i64) -> Result<Vec<Bed>, AppError> {
        sqlx::query_as::<_, Bed>("SELECT * FROM beds WHERE room_id = ? ORDER BY bed_id ASC")
            .bind(room_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, bed: &Bed) -> Result<Bed, AppError> {
        sqlx::query_as::<_, Bed>(
            "UPDATE beds SET bed_name = ?, status = ? WHERE bed_id = ? RETURNING *"
        )
            .bind(&bed.bed_name).bind(&bed.status).bind(bed.bed_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM beds WHERE bed_id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Bed not found".into()));
        }
        Ok(())
    }

    async fn delete_by_room(&self, room_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM beds WHERE room_id = ?")
            .bind(room_id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }
}
