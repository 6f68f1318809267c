use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use tracing::warn;

#[derive(thiserror::Error, Debug)]
pub(crate) enum Error {
    #[error("Required parameter '{0}' is missing")]
    RequiredParameterMissing(String),
    #[error("No results found for address '{0}'")]
    AddressNotFound(String),
    #[error(transparent)]
    Store(#[from] liblocus::Error),
    #[error("geocoding request failed: {0}")]
    GeocodeTransport(#[from] reqwest::Error),
    #[error("geocoding service returned unparseable coordinates: '{0}'")]
    GeocodeMalformed(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub(crate) fn to_client_status(&self) -> (StatusCode, String) {
        match self {
            Error::RequiredParameterMissing(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::AddressNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Error::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to access stored data".to_string(),
            ),
            Error::GeocodeTransport(_) | Error::GeocodeMalformed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Geocoding failed".to_string(),
            ),
            Error::Other(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Unknown error".to_string(),
            ),
        }
    }
}

// Tell axum how to convert `Error` into a response: the three-way status
// mapping plus the `{"error": ...}` envelope the frontend expects.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        warn!("Got error for response: {self:?}");
        let (status, message) = self.to_client_status();
        (status, Json(json!({ "error": message }))).into_response()
    }
}
