use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db;
use crate::error::AppError;
use crate::models::Submission;
use crate::state::SharedState;

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = db::submissions::list_all(&state.pool).await?;
    Ok(Json(submissions))
}

pub async fn export(State(state): State<SharedState>) -> Response {
    match db::submissions::list_all(&state.pool).await {
        Ok(submissions) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"submissions.csv\"",
                ),
            ],
            export_csv(&submissions),
        )
            .into_response(),
        Err(e) => AppError::from(e).into_text_response("Error generating CSV"),
    }
}

fn export_csv(submissions: &[Submission]) -> String {
    use std::fmt::Write;
    let mut csv = String::from("ID,Payload,Created At\n");

    for sub in submissions {
        let _ = writeln!(
            csv,
            "{},{},{}",
            sub.id,
            csv_quote(&sub.payload),
            sub.created_at_text()
        );
    }

    csv
}

/// Always quoted: the payload is JSON, so it nearly always holds quotes or commas.
fn csv_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
