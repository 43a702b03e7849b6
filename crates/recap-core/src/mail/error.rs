use thiserror::Error;

/// Failure delivering a message through the relay. Messages carry the relay's reply text
/// and never the credentials used to authenticate.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("authentication with the mail relay failed: {0}")]
    Authentication(String),
    #[error("mail relay rejected the message: {0}")]
    Rejected(String),
    #[error("could not reach the mail relay: {0}")]
    Connection(String),
    #[error("invalid sender address: {0}")]
    InvalidSender(String),
    #[error("{0}")]
    Relay(String),
}

impl MailError {
    /// Text returned to API callers; falls back to a generic message when the relay gave
    /// nothing useful.
    pub fn client_message(&self) -> String {
        match self {
            MailError::Relay(detail) if detail.trim().is_empty() => "Bad Request".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<mail_send::Error> for MailError {
    fn from(err: mail_send::Error) -> Self {
        match &err {
            mail_send::Error::AuthenticationFailed(_) | mail_send::Error::MissingCredentials => {
                MailError::Authentication(err.to_string())
            }
            mail_send::Error::UnexpectedReply(_) => MailError::Rejected(err.to_string()),
            mail_send::Error::Io(_) | mail_send::Error::Timeout => {
                MailError::Connection(err.to_string())
            }
            _ => MailError::Relay(err.to_string()),
        }
    }
}
