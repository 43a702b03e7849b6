pub mod api;
pub mod config;
pub mod llm;
pub mod mail;
pub mod ops;
pub mod secret;
pub mod telemetry;
pub mod validation;

pub use api::{
    ErrorResponse, SUMMARY_FAILED_MESSAGE, SendEmailPayload, SendEmailResponse, SummarizePayload,
    SummarizeResponse,
};
pub use config::{Config, ConfigError, MailConfig, MailTls, ModelConfig};
pub use llm::{GenaiCompletionService, LLMError, MockCompletionService, TextCompletionService};
pub use mail::{MailError, MailRelay, MockMailRelay, SmtpRelay};
pub use ops::{Mailer, Summarizer};
pub use secret::Secret;
pub use telemetry::{TelemetryError, TelemetryGuard, init_telemetry};
pub use validation::{EmailRequest, SummarizeRequest, Validate, ValidationError, Violation, parse_body};
