use std::sync::Arc;

use tracing::info;

use crate::mail::{MailError, MailRelay};
use crate::validation::EmailRequest;

/// Delivers validated email requests through a [`MailRelay`].
#[derive(Clone)]
pub struct Mailer {
    relay: Arc<dyn MailRelay>,
}

impl Mailer {
    pub fn new(relay: Arc<dyn MailRelay>) -> Self {
        Self { relay }
    }

    /// Returns the relay-assigned message identifier.
    pub async fn send(&self, request: &EmailRequest) -> Result<String, MailError> {
        let message_id = self.relay.send(request).await?;
        info!(
            recipients = request.recipients.len(),
            message_id = %message_id,
            "email sent"
        );
        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MockMailRelay;
    use crate::ops::log_capture::CapturedLogs;

    fn request() -> EmailRequest {
        EmailRequest {
            recipients: vec!["a@b.com".into(), "c@d.com".into()],
            subject: "Summary".into(),
            body: "Notes".into(),
        }
    }

    #[tokio::test]
    async fn returns_relay_message_id() {
        let relay = MockMailRelay::new();
        relay.enqueue_response(Ok("abc123".into()));
        let mailer = Mailer::new(Arc::new(relay.clone()));

        assert_eq!(mailer.send(&request()).await.expect("sent"), "abc123");
        assert_eq!(relay.sent(), vec![request()]);
    }

    #[tokio::test]
    async fn propagates_relay_failure_without_logging_it() {
        let logs = CapturedLogs::default();
        let _guard = logs.install();
        let relay = MockMailRelay::new();
        relay.enqueue_response(Err(MailError::Connection("refused".into())));
        let mailer = Mailer::new(Arc::new(relay));

        assert!(matches!(
            mailer.send(&request()).await,
            Err(MailError::Connection(_))
        ));
        assert!(logs.lines().is_empty(), "logged: {:?}", logs.lines());
    }
}
