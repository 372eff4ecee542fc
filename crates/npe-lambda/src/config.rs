use std::env;

const DEFAULT_MODEL_ID: &str = "us.anthropic.claude-sonnet-4-20250514-v1:0";
const DEFAULT_REGION: &str = "us-east-1";

/// Runtime settings read from the Lambda environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub model_id: String,
    pub region: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            model_id: env::var("NPE_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.to_string()),
            region: env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.to_string()),
        }
    }
}
