use std::sync::Arc;

use tracing::info;

use crate::config::ModelConfig;
use crate::llm::{CompletionRequest, LLMError, TextCompletionService, summary_prompt};
use crate::validation::SummarizeRequest;

/// Generates summaries through a [`TextCompletionService`].
#[derive(Clone)]
pub struct Summarizer {
    llm: Arc<dyn TextCompletionService>,
    temperature: f32,
    max_tokens: u32,
}

impl Summarizer {
    pub fn new(llm: Arc<dyn TextCompletionService>, model: &ModelConfig) -> Self {
        Self {
            llm,
            temperature: model.temperature,
            max_tokens: model.max_output_tokens,
        }
    }

    /// Returns the generated text verbatim. Failures are returned unlogged; the caller
    /// reports them.
    pub async fn summarize(&self, request: &SummarizeRequest) -> Result<String, LLMError> {
        let completion = CompletionRequest {
            prompt: summary_prompt(&request.transcript, &request.instruction),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(completion).await?;
        info!(
            transcript_chars = request.transcript.chars().count(),
            summary_chars = response.content.chars().count(),
            latency_ms = response.latency_ms,
            "summary generated"
        );
        Ok(response.content)
    }
}
