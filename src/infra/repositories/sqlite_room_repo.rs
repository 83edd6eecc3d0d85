use crate::domain::{models::room::Room, ports::RoomRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

pub struct SqliteRoomRepo {
    pool: SqlitePool,
}

impl SqliteRoomRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoomRepository for SqliteRoomRepo {
    async fn create(&self, room_name: &str, capacity: i64) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "INSERT INTO rooms (room_name, capacity, created_at) VALUES (?, ?, ?) RETURNING *"
        )
            .bind(room_name).bind(capacity).bind(Utc::now())
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE room_id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Room>, AppError> {
        sqlx::query_as::<_, Room>("SELECT * FROM rooms ORDER BY room_id ASC")
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, room: &Room) -> Result<Room, AppError> {
        sqlx::query_as::<_, Room>(
            "UPDATE rooms SET room_name = ?, capacity = ? WHERE room_id = ? RETURNING *"
        )
            .bind(&room.room_name).bind(room.capacity).bind(room.room_id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn set_capacity(&self, id: i64, capacity: i64) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE rooms SET capacity = ? WHERE room_id = ?")
            .bind(capacity).bind(id)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Room not found".into()));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM rooms WHERE room_id = ?")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Room not found".into()));
        }
        Ok(())
    }
}
