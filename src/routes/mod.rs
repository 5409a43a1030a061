pub mod ingest;
pub mod submissions;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/api/collect", post(ingest::collect))
        .route("/api/submissions", get(submissions::list))
}

pub fn export_routes() -> Router<SharedState> {
    Router::new().route("/download", get(submissions::export))
}
