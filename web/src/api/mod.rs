use crate::state::AppState;
use axum::{
    Router,
    response::Json,
    routing::{get, post},
};
use serde::Serialize;

mod geocode;
mod location;

#[cfg(test)]
mod tests;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/submit", post(location::submit))
        .route("/data", get(location::list))
        .route("/save", post(location::save))
        .route("/geocode", get(geocode::lookup))
        .route("/health", get(health))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    message: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        message: "locus backend is running",
    })
}
