use crate::error::Error;
use anyhow::anyhow;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub(crate) const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = concat!("locusweb/", env!("CARGO_PKG_VERSION"));

/// Coordinates for an address as returned to the frontend.
#[derive(Debug, Serialize)]
pub(crate) struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// One entry of the provider's result list. Nominatim sends coordinates as
/// strings; extra fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

impl TryFrom<Place> for GeocodeResult {
    type Error = Error;

    fn try_from(place: Place) -> Result<Self, Error> {
        let latitude = place
            .lat
            .parse()
            .map_err(|_| Error::GeocodeMalformed(place.lat.clone()))?;
        let longitude = place
            .lon
            .parse()
            .map_err(|_| Error::GeocodeMalformed(place.lon.clone()))?;
        Ok(GeocodeResult {
            latitude,
            longitude,
            display_name: place.display_name,
        })
    }
}

/// Stateless client for a Nominatim-compatible geocoding service.
#[derive(Debug, Clone)]
pub(crate) struct GeocodeClient {
    inner: reqwest::Client,
    base: Url,
}

impl GeocodeClient {
    pub(crate) fn new(base: &str) -> anyhow::Result<Self> {
        // Nominatim's usage policy requires an identifying User-Agent
        let inner = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let mut base: Url = base
            .parse()
            .map_err(|e| anyhow!("{} is not a valid url: {}", base, e))?;
        // a trailing slash keeps any path component of the base when the
        // relative endpoint is joined below
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        Ok(Self { inner, base })
    }

    fn search_url(&self) -> Result<Url, Error> {
        Ok(self
            .base
            .join("search")
            .map_err(|e| anyhow!("error joining url: {e}"))?)
    }

    /// Forward the address to the provider and take the first hit. No timeout
    /// and no retries; a stalled provider stalls the calling request.
    pub(crate) async fn lookup(&self, address: &str) -> Result<GeocodeResult, Error> {
        let url = self.search_url()?;
        debug!("looking up '{address}' via {url}");

        let places: Vec<Place> = self
            .inner
            .get(url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .json()
            .await?;

        first_result(address, places)
    }
}

/// Reduce the provider's result list to the first hit; an empty list means
/// the address is unknown, not an internal failure.
fn first_result(address: &str, places: Vec<Place>) -> Result<GeocodeResult, Error> {
    match places.into_iter().next() {
        Some(place) => place.try_into(),
        None => Err(Error::AddressNotFound(address.to_string())),
    }
}
