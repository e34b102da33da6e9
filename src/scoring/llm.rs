use async_trait::async_trait;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest};
use tracing::{debug, error};

use super::backend::ScoringBackend;
use super::error::BackendError;
use super::parse::parse_reply;
use super::prompt::build_prompt;
use super::types::{ScoringBackendResponse, ScoringContext};

const BACKEND_NAME: &str = "llm";

/// Confidence attached to scores produced by a language model.
pub const LLM_CONFIDENCE: f64 = 0.8;

/// Scores answers with a chat model through `genai`.
///
/// Provider credentials come from the environment (`OPENAI_API_KEY`,
/// `ANTHROPIC_API_KEY`, ...), resolved by `genai` from the model name.
#[derive(Clone)]
pub struct LlmBackend {
    client: Client,
    model: String,
    options: ChatOptions,
}

impl std::fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmBackend")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl LlmBackend {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            client: Client::default(),
            model: model.into(),
            options: ChatOptions::default().with_temperature(temperature),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ScoringBackend for LlmBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn confidence(&self) -> f64 {
        LLM_CONFIDENCE
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn score(
        &self,
        context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError> {
        let prompt = build_prompt(context);
        let request = ChatRequest::new(vec![
            ChatMessage::system(prompt.system),
            ChatMessage::user(prompt.user),
        ]);

        let response = self
            .client
            .exec_chat(&self.model, request, Some(&self.options))
            .await
            .map_err(|e| {
                error!(model = %self.model, "Provider error: {}", e);
                BackendError::unavailable(BACKEND_NAME, e.to_string())
            })?;

        let text = response.first_text().unwrap_or_default();
        if text.trim().is_empty() {
            return Err(BackendError::rejected(BACKEND_NAME, "empty model reply"));
        }

        debug!(model = %self.model, reply_len = text.len(), "Model reply received");

        parse_reply(text, context.max_points)
            .map_err(|reason| BackendError::rejected(BACKEND_NAME, reason))
    }
}
