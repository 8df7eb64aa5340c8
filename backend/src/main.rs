use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

mod config;
mod domain;
mod rest;
mod storage;

use config::AppConfig;
use domain::gemini::GeminiClient;
use domain::{EntryService, EstimationService, ProfileService};
use rest::AppState;
use storage::csv::{CsvConnection, LedgerRepository, ProfileRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;
    info!("data directory: {:?}", config.data_dir);

    let connection = CsvConnection::new(&config.data_dir)?;
    let ledger_repository = LedgerRepository::new(connection.clone());
    let profile_repository = ProfileRepository::new(connection);

    let gemini = GeminiClient::new(&config.gemini)?;
    let state = AppState::new(
        EntryService::new(Arc::new(ledger_repository)),
        EstimationService::new(Arc::new(gemini)),
        ProfileService::new(Arc::new(profile_repository)),
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/estimate", post(rest::estimate))
        .route("/entries", get(rest::list_entries))
        .route("/entries/confirm", post(rest::confirm_entry))
        .route("/entries/:position", put(rest::update_entry).delete(rest::delete_entry))
        .route("/summary/daily", get(rest::daily_summary))
        .route("/summary/weekly", get(rest::weekly_summary))
        .route("/profile", get(rest::get_profile).put(rest::put_profile))
        .route("/targets", get(rest::get_targets));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(state);

    info!("starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
