use std::sync::Arc;

use npe_bedrock::gateway::BedrockGenerator;
use npe_catalog::Registry;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub generator: BedrockGenerator,
    /// Built and validated once at cold start; read-only afterwards.
    pub registry: Arc<Registry>,
}
