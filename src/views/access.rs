use askama::Template;
use axum::response::{Html, IntoResponse, Response};

use crate::error::AppError;

#[derive(Template)]
#[template(path = "access.html")]
struct AccessTemplate {
    submissions_url: &'static str,
    download_url: &'static str,
}

pub async fn index() -> Response {
    let template = AccessTemplate {
        submissions_url: "/api/submissions",
        download_url: "/download",
    };

    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => AppError::Internal(format!("Failed to render access page: {e}"))
            .into_text_response("Error loading page"),
    }
}
