use anyhow::Result;
use axum::Router;
use clap::Parser;
use liblocus::RecordStore;
use state::{AppState, SharedState};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::CorsLayer;
use tracing::{debug, info};
use tracing_subscriber::filter::EnvFilter;

mod api;
mod error;
mod geocode;
mod state;

const API_PREFIX: &str = "/api";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the CSV file that holds the saved locations
    #[arg(short, long, default_value = "data/data.csv")]
    pub data_file: String,
    #[arg(short, long, default_value = "0.0.0.0")]
    pub listen: String,
    #[arg(short, long, default_value = "5000")]
    pub port: u16,
    /// Base URL of a Nominatim-compatible geocoding service
    #[arg(short, long, default_value = geocode::DEFAULT_GEOCODER_URL)]
    pub geocoder_url: String,
}

// The frontend may be served from anywhere, so cross-origin requests are
// allowed unconditionally.
fn app(state: AppState) -> Router {
    Router::new()
        .nest(API_PREFIX, api::router())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_env("LOCUSWEB_LOG"))
        .init();
    let args = Cli::parse();
    debug!("using record file '{}'", args.data_file);

    let store = RecordStore::new(&args.data_file);
    store.init()?;

    let geocoder = geocode::GeocodeClient::new(&args.geocoder_url)?;
    let shared_state = Arc::new(SharedState::new(store, geocoder));

    let addr: SocketAddr = format!("{}:{}", args.listen, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Storing location data in '{}'", args.data_file);
    info!("Listening on http://{}", addr);
    axum::serve(listener, app(shared_state).into_make_service()).await?;
    Ok(())
}
