use async_trait::async_trait;
use mail_send::SmtpClientBuilder;
use tracing::info;

use super::{EmailAddress, MailError, MailRelay, MimeMessage};
use crate::config::{MailConfig, MailTls};
use crate::validation::EmailRequest;

/// Relay that delivers through an authenticated SMTP submission server.
///
/// A new connection is opened for every message.
pub struct SmtpRelay {
    config: MailConfig,
    sender: EmailAddress,
}

impl SmtpRelay {
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let sender = EmailAddress::parse(config.sender())?;
        Ok(Self { config, sender })
    }

    pub fn sender(&self) -> &EmailAddress {
        &self.sender
    }

    fn client_builder(&self) -> SmtpClientBuilder<String> {
        let builder = SmtpClientBuilder::new(self.config.host.clone(), self.config.port)
            .implicit_tls(self.config.tls == MailTls::Implicit);

        if self.config.username.is_empty() {
            builder
        } else {
            builder.credentials((
                self.config.username.clone(),
                self.config.password.expose().to_string(),
            ))
        }
    }
}

#[async_trait]
impl MailRelay for SmtpRelay {
    async fn send(&self, email: &EmailRequest) -> Result<String, MailError> {
        let message = MimeMessage::for_request(self.sender.clone(), email);
        let message_id = message.message_id.clone();
        let message = message.into_builder();

        let smtp = self.client_builder();
        match self.config.tls {
            MailTls::Plain => smtp.connect_plain().await?.send(message).await?,
            MailTls::Implicit | MailTls::Starttls => smtp.connect().await?.send(message).await?,
        }

        info!(
            host = %self.config.host,
            recipients = email.recipients.len(),
            message_id = %message_id,
            "message accepted by relay"
        );
        Ok(format!("<{message_id}>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secret::Secret;

    fn mail_config(from: Option<&str>) -> MailConfig {
        MailConfig {
            host: "smtp.example.com".into(),
            port: 465,
            tls: MailTls::Implicit,
            username: "bot@example.com".into(),
            password: Secret::new("app-password"),
            from: from.map(str::to_string),
        }
    }

    #[test]
    fn sender_defaults_to_username() {
        let relay = SmtpRelay::new(mail_config(None)).expect("relay");
        assert_eq!(relay.sender().email, "bot@example.com");
        assert!(relay.sender().name.is_none());
    }

    #[test]
    fn sender_honours_display_name() {
        let relay = SmtpRelay::new(mail_config(Some("Recap <notes@example.com>"))).expect("relay");
        assert_eq!(relay.sender().email, "notes@example.com");
        assert_eq!(relay.sender().name.as_deref(), Some("Recap"));
    }

    #[test]
    fn invalid_sender_is_rejected_up_front() {
        let mut config = mail_config(None);
        config.username = "not-an-address".into();
        assert!(matches!(
            SmtpRelay::new(config),
            Err(MailError::InvalidSender(_))
        ));
    }
}
