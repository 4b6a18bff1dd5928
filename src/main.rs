// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::ingest_service::IngestService;
use crate::application::query_service::QueryService;
use crate::application::task_service::TaskService;
use crate::infrastructure::config::load_influx_settings;
use crate::infrastructure::influx_store::InfluxStore;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    ingest, query_downsampled, setup_alert_task, setup_downsample_task, welcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Load configuration
    let settings = load_influx_settings()?;

    // Create the store (infrastructure layer)
    let store = Arc::new(InfluxStore::new(
        &settings.url,
        &settings.org,
        &settings.token,
    ));

    // Create services (application layer)
    let ingest_service = IngestService::new(store.clone(), settings.bucket.clone());
    let query_service = QueryService::new(store.clone(), settings.bucket.clone());
    let task_service = TaskService::new(
        store,
        settings.bucket.clone(),
        settings.org.clone(),
        settings.org_id.clone(),
    );

    let state = Arc::new(AppState {
        ingest_service,
        query_service,
        task_service,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/", get(welcome))
        .route("/ingest", post(ingest))
        .route("/query", post(query_downsampled))
        .route("/setup", post(setup_downsample_task))
        .route("/tasks", post(setup_alert_task))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    tracing::info!(%addr, org = %settings.org, bucket = %settings.bucket, "starting telemetry gateway");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
