use crate::{error::Error, geocode::GeocodeResult, state::AppState};
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct LookupParams {
    #[serde(default)]
    address: String,
}

pub(super) async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Json<GeocodeResult>, Error> {
    if params.address.is_empty() {
        return Err(Error::RequiredParameterMissing("address".to_string()));
    }
    let result = state.geocoder.lookup(&params.address).await?;
    Ok(Json(result))
}
