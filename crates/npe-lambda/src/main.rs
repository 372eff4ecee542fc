use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tracing_subscriber::EnvFilter;

use npe_bedrock::gateway::BedrockGenerator;
use npe_catalog::Registry;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env();

    // Fail at cold start, not on the first request, if the catalogs are inconsistent.
    let registry = Registry::builtin()?;
    tracing::info!(
        diagnoses = registry.diagnoses.len(),
        assessments = registry.assessments.len(),
        modalities = registry.modalities.len(),
        strategies = registry.strategies.len(),
        model_id = %config.model_id,
        "registry loaded"
    );

    let client = npe_bedrock::client::build_client_with_region(&config.region).await;

    let state = AppState {
        generator: BedrockGenerator::new(client, config.model_id),
        registry: Arc::new(registry),
    };

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/model-answer", post(routes::model_answer::model_answer))
        .route("/cases", post(routes::cases::generate_case))
        .layer(axum_mw::from_fn(middleware::access_log::access_log))
        .with_state(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
