use std::sync::Arc;

use sqlx::SqlitePool;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub pool: SqlitePool,
}
