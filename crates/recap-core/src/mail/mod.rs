pub mod error;
pub mod message;
pub mod mock;
pub mod smtp;

pub use error::MailError;
pub use message::{EmailAddress, MimeMessage, new_message_id};
pub use mock::MockMailRelay;
pub use smtp::SmtpRelay;

use async_trait::async_trait;

use crate::validation::EmailRequest;

/// Capability to deliver one plain-text message to a list of recipients.
///
/// Returns the identifier assigned to the delivered message.
#[async_trait]
pub trait MailRelay: Send + Sync {
    async fn send(&self, email: &EmailRequest) -> Result<String, MailError>;
}
