use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LLMError, TextCompletionService};

/// Scripted completion service. Responses are returned in the order they were queued and
/// every request is recorded.
#[derive(Debug, Default, Clone)]
pub struct MockCompletionService {
    responses: Arc<Mutex<VecDeque<Result<CompletionResponse, LLMError>>>>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
    call_count: Arc<AtomicUsize>,
}

impl MockCompletionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_response(&self, response: Result<CompletionResponse, LLMError>) {
        let mut guard = self.responses.lock().expect("lock responses");
        guard.push_back(response);
    }

    /// Queue a successful response carrying `content`.
    pub fn enqueue_text(&self, content: impl Into<String>) {
        self.enqueue_response(Ok(CompletionResponse::text(content)));
    }

    /// Returns the number of times `complete` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("lock requests").clone()
    }
}

#[async_trait]
impl TextCompletionService for MockCompletionService {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LLMError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("lock requests").push(request);
        let mut guard = self.responses.lock().expect("lock responses");
        guard.pop_front().unwrap_or_else(|| {
            Err(LLMError::ProviderError(
                "mock response not provided".to_string(),
            ))
        })
    }
}
