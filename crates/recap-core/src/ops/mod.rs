//! The two request operations, independent of HTTP.

pub mod send_email;
pub mod summarize;

pub use send_email::Mailer;
pub use summarize::Summarizer;
