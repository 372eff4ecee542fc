//! The generation gateway: the one capability the pipeline needs from a
//! language model, `generate(instructions, prompt, temperature) -> text`.

use std::future::Future;

use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::error::SdkError;
use aws_sdk_bedrockruntime::operation::converse::ConverseError;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use tracing::{info, warn};

use crate::error::GenerationError;

/// One call to the generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// System-level instructions.
    pub instructions: String,
    /// The task payload.
    pub prompt: String,
    pub temperature: f32,
}

/// A text-generation backend.
///
/// Implementations return the model's literal text, trimmed. The text is
/// untrusted: it may be empty and need not be JSON. Only service-level
/// failures are errors, always [`GenerationError::Transport`].
pub trait Generator: Send + Sync {
    /// Model identifier, recorded in response metadata.
    fn model_id(&self) -> &str;

    fn generate(
        &self,
        request: &GenerationRequest,
    ) -> impl Future<Output = Result<String, GenerationError>> + Send;
}

/// [`Generator`] backed by the Bedrock Converse API.
#[derive(Debug, Clone)]
pub struct BedrockGenerator {
    client: Client,
    model_id: String,
}

impl BedrockGenerator {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

impl Generator for BedrockGenerator {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(request.prompt.clone()))
            .build()
            .map_err(|e| GenerationError::Transport {
                status: None,
                message: e.to_string(),
            })?;

        let inference = InferenceConfiguration::builder()
            .temperature(request.temperature)
            .build();

        info!(
            model = %self.model_id,
            temperature = request.temperature,
            prompt_len = request.prompt.len(),
            "invoking converse"
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(request.instructions.clone()))
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(transport_error)?;

        let Some(output_message) = response.output().and_then(|o| o.as_message().ok()) else {
            warn!(model = %self.model_id, "converse response carried no message");
            return Ok(String::new());
        };

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        Ok(text.trim().to_string())
    }
}

fn transport_error(err: SdkError<ConverseError>) -> GenerationError {
    let status = err.raw_response().map(|r| r.status().as_u16());
    GenerationError::Transport {
        status,
        message: err.into_service_error().to_string(),
    }
}
