use crate::geocode::GeocodeClient;
use liblocus::RecordStore;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Clone)]
pub(crate) struct SharedState {
    pub store: RecordStore,
    pub geocoder: GeocodeClient,
}

impl SharedState {
    pub fn new(store: RecordStore, geocoder: GeocodeClient) -> Self {
        trace!("Creating shared app state");
        Self { store, geocoder }
    }
}

pub(crate) type AppState = Arc<SharedState>;
