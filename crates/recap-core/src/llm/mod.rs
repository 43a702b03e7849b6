pub mod error;
pub mod mock;
pub mod prompt;
pub mod types;

pub use error::LLMError;
pub use mock::MockCompletionService;
pub use prompt::summary_prompt;
pub use types::{CompletionRequest, CompletionResponse};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use genai::{
    Client as GenaiClient, Error as GenaiError, ServiceTarget,
    chat::{ChatMessage as GenaiChatMessage, ChatOptions, ChatRequest, ChatResponse, MessageContent},
    resolver::{AuthData, Endpoint, ServiceTargetResolver},
    webc,
};
use reqwest::StatusCode;
use tracing::debug;

use crate::config::ModelConfig;

/// Capability to turn a plain-text prompt into generated text.
#[async_trait]
pub trait TextCompletionService: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError>;
}

#[async_trait]
pub trait ChatExecutor: Send + Sync {
    async fn exec_chat(
        &self,
        model: &str,
        request: ChatRequest,
        options: Option<&ChatOptions>,
    ) -> Result<ChatResponse, GenaiError>;
}

#[async_trait]
impl ChatExecutor for GenaiClient {
    async fn exec_chat(
        &self,
        model: &str,
        request: ChatRequest,
        options: Option<&ChatOptions>,
    ) -> Result<ChatResponse, GenaiError> {
        GenaiClient::exec_chat(self, model, request, options).await
    }
}

/// Completion service backed by the genai crate (Gemini by default).
pub struct GenaiCompletionService {
    chat: Arc<dyn ChatExecutor>,
    model: String,
}

impl GenaiCompletionService {
    pub fn new(model_config: &ModelConfig) -> Self {
        let chat: Arc<dyn ChatExecutor> = Arc::new(build_genai_client(model_config));
        Self::with_executor(model_config, chat)
    }

    pub fn with_executor(model_config: &ModelConfig, chat: Arc<dyn ChatExecutor>) -> Self {
        Self {
            chat,
            model: namespaced_model(model_config),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_chat_request(&self, request: &CompletionRequest) -> ChatRequest {
        ChatRequest::from_messages(vec![GenaiChatMessage::user(MessageContent::from_text(
            request.prompt.clone(),
        ))])
    }

    fn build_chat_options(&self, request: &CompletionRequest) -> ChatOptions {
        ChatOptions::default()
            .with_temperature(request.temperature as f64)
            .with_max_tokens(request.max_tokens)
    }
}

#[async_trait]
impl TextCompletionService for GenaiCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        let chat_request = self.build_chat_request(&request);
        let options = self.build_chat_options(&request);

        let start = Instant::now();
        let result = self
            .chat
            .exec_chat(&self.model, chat_request, Some(&options))
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let response = result.map_err(map_genai_error)?;
        let content = match response.first_text() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => return Err(LLMError::EmptyResponse),
        };
        let model = response.provider_model_iden.to_string();
        let (input_tokens, output_tokens) = usage_tokens(&response.usage);

        debug!(
            model = %model,
            latency_ms,
            input_tokens,
            output_tokens,
            "completion finished"
        );

        Ok(CompletionResponse {
            content,
            model,
            input_tokens,
            output_tokens,
            latency_ms,
        })
    }
}

/// Build a genai client whose credentials come from configuration rather than the
/// process environment.
fn build_genai_client(cfg: &ModelConfig) -> GenaiClient {
    let api_key = cfg.api_key.clone();
    let api_base = cfg.api_base.clone();
    let resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let ServiceTarget {
                endpoint, model, ..
            } = target;
            let endpoint = match &api_base {
                Some(base) => Endpoint::from_owned(base.clone()),
                None => endpoint,
            };
            Ok(ServiceTarget {
                endpoint,
                auth: AuthData::from_single(api_key.expose().to_string()),
                model,
            })
        },
    );

    GenaiClient::builder()
        .with_service_target_resolver(resolver)
        .build()
}

fn namespaced_model(cfg: &ModelConfig) -> String {
    if cfg.provider.is_empty() {
        cfg.model.clone()
    } else {
        format!("{}::{}", cfg.provider.to_lowercase(), cfg.model)
    }
}

fn usage_tokens(usage: &genai::chat::Usage) -> (u32, u32) {
    let input = usage.prompt_tokens.unwrap_or_default().max(0) as u32;
    let output = usage.completion_tokens.unwrap_or_default().max(0) as u32;
    (input, output)
}

fn map_genai_error(err: GenaiError) -> LLMError {
    match err {
        GenaiError::RequiresApiKey { .. }
        | GenaiError::NoAuthResolver { .. }
        | GenaiError::NoAuthData { .. } => LLMError::AuthenticationFailed,
        GenaiError::WebAdapterCall { webc_error, .. }
        | GenaiError::WebModelCall { webc_error, .. } => map_webc_error(webc_error),
        GenaiError::NoChatResponse { .. } => LLMError::EmptyResponse,
        other => LLMError::ProviderError(other.to_string()),
    }
}

fn map_webc_error(err: webc::Error) -> LLMError {
    match &err {
        webc::Error::ResponseFailedStatus { status, .. } => match *status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LLMError::AuthenticationFailed,
            status if status.is_server_error() => LLMError::ServerError(status.to_string()),
            status => LLMError::ProviderError(status.to_string()),
        },
        webc::Error::Reqwest(req_err) if req_err.is_timeout() => LLMError::Timeout,
        _ => LLMError::ProviderError(err.to_string()),
    }
}
