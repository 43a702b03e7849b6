use mail_builder::MessageBuilder;
use mail_builder::headers::address::Address;
use mail_builder::headers::message_id::MessageId;
use uuid::Uuid;

use super::MailError;
use crate::validation::{EmailRequest, is_valid_email};

/// Simple representation of an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress {
    pub email: String,
    pub name: Option<String>,
}

impl EmailAddress {
    #[cfg(test)]
    pub fn new(name: Option<impl Into<String>>, email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: name.map(|n| n.into()),
        }
    }

    /// Parse either `user@host` or `Display Name <user@host>`.
    pub fn parse(raw: &str) -> Result<Self, MailError> {
        let raw = raw.trim();
        let (name, email) = match (raw.rfind('<'), raw.strip_suffix('>')) {
            (Some(open), Some(without_close)) => {
                let name = raw[..open].trim().trim_matches('"').trim();
                let email = without_close[open + 1..].trim();
                ((!name.is_empty()).then(|| name.to_string()), email)
            }
            _ => (None, raw),
        };

        if !is_valid_email(email) {
            return Err(MailError::InvalidSender(raw.to_string()));
        }

        Ok(Self {
            email: email.to_string(),
            name,
        })
    }

    pub fn domain(&self) -> &str {
        self.email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .unwrap_or("localhost")
    }
}

impl From<&str> for EmailAddress {
    fn from(email: &str) -> Self {
        Self {
            email: email.to_string(),
            name: None,
        }
    }
}

impl From<String> for EmailAddress {
    fn from(email: String) -> Self {
        Self { email, name: None }
    }
}

/// Plain-text message ready to hand to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeMessage {
    pub from: EmailAddress,
    pub to: Vec<EmailAddress>,
    pub subject: String,
    pub body_plain: String,
    /// Message-ID without angle brackets.
    pub message_id: String,
}

impl MimeMessage {
    /// Compose a message for a validated request, assigning a fresh Message-ID in the
    /// sender's domain.
    pub fn for_request(from: EmailAddress, request: &EmailRequest) -> Self {
        let message_id = new_message_id(&from);
        Self {
            from,
            to: request
                .recipients
                .iter()
                .map(|r| EmailAddress::from(r.as_str()))
                .collect(),
            subject: request.subject.clone(),
            body_plain: request.body.clone(),
            message_id,
        }
    }

    pub fn into_builder(self) -> MessageBuilder<'static> {
        MessageBuilder::new()
            .from(to_header_address(&self.from))
            .to(address_list(&self.to))
            .subject(self.subject)
            .text_body(self.body_plain)
            .message_id(MessageId::new(self.message_id))
    }

    /// Build the RFC 5322 message as a string.
    #[cfg(test)]
    pub fn to_rfc822(self) -> String {
        self.into_builder()
            .write_to_string()
            .expect("message renders")
    }
}

pub fn new_message_id(sender: &EmailAddress) -> String {
    format!("{}@{}", Uuid::new_v4(), sender.domain())
}

fn to_header_address(addr: &EmailAddress) -> Address<'static> {
    Address::new_address(addr.name.clone(), addr.email.clone())
}

fn address_list(addrs: &[EmailAddress]) -> Address<'static> {
    let list: Vec<Address<'static>> = addrs.iter().map(to_header_address).collect();
    Address::new_list(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> EmailRequest {
        EmailRequest {
            recipients: vec!["a@b.com".into(), "team@example.org".into()],
            subject: "Weekly sync summary".into(),
            body: "- Ship on Friday\n- Budget approved".into(),
        }
    }

    #[test]
    fn parses_bare_and_named_addresses() {
        let bare = EmailAddress::parse("bot@example.com").expect("bare");
        assert_eq!(bare, EmailAddress::from("bot@example.com"));

        let named = EmailAddress::parse("\"Meeting Bot\" <bot@example.com>").expect("named");
        assert_eq!(named.name.as_deref(), Some("Meeting Bot"));
        assert_eq!(named.email, "bot@example.com");
        assert_eq!(named.domain(), "example.com");
    }

    #[test]
    fn rejects_unusable_sender() {
        assert!(matches!(
            EmailAddress::parse(""),
            Err(MailError::InvalidSender(_))
        ));
        assert!(matches!(
            EmailAddress::parse("Bot <nope>"),
            Err(MailError::InvalidSender(_))
        ));
    }

    #[test]
    fn message_id_uses_sender_domain_and_is_unique() {
        let sender = EmailAddress::from("bot@mail.example.com");
        let first = new_message_id(&sender);
        let second = new_message_id(&sender);
        assert!(first.ends_with("@mail.example.com"));
        assert_ne!(first, second);
    }

    #[test]
    fn builds_plain_text_message_for_all_recipients() {
        let mut message = MimeMessage::for_request(
            EmailAddress::new(Some("Recap"), "recap@example.com"),
            &request(),
        );
        message.message_id = "fixed-id@example.com".into();

        let raw = message.to_rfc822();
        let lowered = raw.to_lowercase();
        assert!(lowered.contains("message-id: <fixed-id@example.com>"));
        assert!(raw.contains("recap@example.com"));
        assert!(raw.contains("a@b.com"));
        assert!(raw.contains("team@example.org"));
        assert!(raw.contains("Subject: Weekly sync summary"));
        assert!(raw.contains("Ship on Friday"));
        assert!(lowered.contains("text/plain"));
        assert!(!lowered.contains("text/html"));
    }
}
