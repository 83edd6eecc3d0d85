use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{ConnectOptions, SqlitePool};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::domain::services::allocation::RoomLocks;
use crate::infra::repositories::{
    sqlite_assignment_repo::SqliteAssignmentRepo, sqlite_bed_repo::SqliteBedRepo,
    sqlite_booking_repo::SqliteBookingRepo, sqlite_room_repo::SqliteRoomRepo,
};
use crate::state::AppState;

pub async fn bootstrap_state(config: &Config) -> AppState {
    info!("Initializing SQLite connection with WAL Mode...");

    let opts = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid SQLite connection string")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5))
        .log_statements(LevelFilter::Debug)
        .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(opts)
        .await
        .expect("Failed to connect to SQLite");

    run_sqlite_migrations(&pool).await;

    AppState {
        config: config.clone(),
        room_repo: Arc::new(SqliteRoomRepo::new(pool.clone())),
        bed_repo: Arc::new(SqliteBedRepo::new(pool.clone())),
        booking_repo: Arc::new(SqliteBookingRepo::new(pool.clone())),
        assignment_repo: Arc::new(SqliteAssignmentRepo::new(pool.clone())),
        room_locks: Arc::new(RoomLocks::new()),
    }
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
