use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{MailError, MailRelay};
use crate::validation::EmailRequest;

/// Scripted relay that records every message it is asked to send.
#[derive(Debug, Default, Clone)]
pub struct MockMailRelay {
    responses: Arc<Mutex<VecDeque<Result<String, MailError>>>>,
    sent: Arc<Mutex<Vec<EmailRequest>>>,
}

impl MockMailRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue_response(&self, response: Result<String, MailError>) {
        self.responses
            .lock()
            .expect("lock responses")
            .push_back(response);
    }

    pub fn sent(&self) -> Vec<EmailRequest> {
        self.sent.lock().expect("lock sent").clone()
    }
}

#[async_trait]
impl MailRelay for MockMailRelay {
    async fn send(&self, email: &EmailRequest) -> Result<String, MailError> {
        self.sent.lock().expect("lock sent").push(email.clone());
        self.responses
            .lock()
            .expect("lock responses")
            .pop_front()
            .unwrap_or_else(|| Err(MailError::Relay("mock response not provided".to_string())))
    }
}
