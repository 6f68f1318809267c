use crate::{error::Error, state::AppState};
use axum::{extract::State, response::Json};
use liblocus::record::{self, LocationRecord, RecordInput};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub(super) struct SubmitParams {
    #[serde(default, deserialize_with = "record::lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "record::lenient_string")]
    address: String,
    #[serde(default, deserialize_with = "record::lenient_string")]
    latitude: String,
    #[serde(default, deserialize_with = "record::lenient_string")]
    longitude: String,
    #[serde(default = "record::default_radius", deserialize_with = "record::lenient_radius")]
    radius: f64,
}

#[derive(Serialize)]
pub(super) struct SubmitResponse {
    message: &'static str,
    data: SubmitData,
}

/// The stored fields echoed back to the client. The circle-center fields are
/// never part of a submit, so they are not part of the echo either.
#[derive(Serialize)]
struct SubmitData {
    name: String,
    address: String,
    latitude: String,
    longitude: String,
    radius: f64,
    timestamp: String,
}

pub(super) async fn submit(
    State(state): State<AppState>,
    Json(params): Json<SubmitParams>,
) -> Result<Json<SubmitResponse>, Error> {
    if params.name.is_empty() {
        return Err(Error::RequiredParameterMissing("name".to_string()));
    }

    // the circle-center fields stay empty here; only the client sets them,
    // and only through a bulk save
    let record = LocationRecord {
        name: params.name,
        address: params.address,
        latitude: params.latitude,
        longitude: params.longitude,
        radius: params.radius,
        timestamp: record::current_timestamp(),
        ..Default::default()
    };
    state.store.append(&record)?;
    debug!("appended record '{}'", record.name);

    let LocationRecord {
        name,
        address,
        latitude,
        longitude,
        radius,
        timestamp,
        ..
    } = record;
    Ok(Json(SubmitResponse {
        message: "Data saved successfully",
        data: SubmitData {
            name,
            address,
            latitude,
            longitude,
            radius,
            timestamp,
        },
    }))
}

#[derive(Serialize)]
pub(super) struct ListResponse {
    data: Vec<LocationRecord>,
    count: usize,
}

pub(super) async fn list(State(state): State<AppState>) -> Result<Json<ListResponse>, Error> {
    let data = state.store.read_all()?;
    let count = data.len();
    Ok(Json(ListResponse { data, count }))
}

#[derive(Debug, Deserialize)]
pub(super) struct SaveParams {
    #[serde(default)]
    data: Vec<RecordInput>,
}

#[derive(Serialize)]
pub(super) struct SaveResponse {
    message: &'static str,
    count: usize,
}

/// Full replacement of the store: records missing from `data` are dropped.
pub(super) async fn save(
    State(state): State<AppState>,
    Json(params): Json<SaveParams>,
) -> Result<Json<SaveResponse>, Error> {
    let records = params.data.into_iter().map(LocationRecord::from).collect();
    let count = state.store.replace_all(records)?;
    debug!("bulk save rewrote the store with {count} records");

    Ok(Json(SaveResponse {
        message: "Data saved successfully",
        count,
    }))
}
