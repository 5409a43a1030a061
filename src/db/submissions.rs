use sqlx::SqlitePool;

use crate::models::Submission;

pub async fn create(pool: &SqlitePool, payload: &str) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "INSERT INTO submissions (payload) VALUES ($1) RETURNING id, payload, created_at",
    )
    .bind(payload)
    .fetch_one(pool)
    .await
}

/// Every submission, newest first. Timestamps have one-second resolution, so
/// ties fall back to the id.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(
        "SELECT id, payload, created_at FROM submissions
         ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM submissions")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}
