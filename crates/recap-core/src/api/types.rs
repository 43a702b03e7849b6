//! JSON bodies exchanged with the browser client.
//!
//! Request payloads are documented here for the generated TypeScript bindings; the server
//! validates incoming bodies with [`crate::validation`] rather than deserializing them
//! straight into these types.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Fixed message returned when the model call fails.
pub const SUMMARY_FAILED_MESSAGE: &str = "Failed to generate summary";

/// Body of `POST /api/summerize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummarizePayload {
    pub transcript: String,
    pub prompt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SummarizeResponse {
    pub summary: String,
}

/// Body of `POST /api/send-email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SendEmailPayload {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SendEmailResponse {
    pub ok: bool,
    pub id: String,
}

impl SendEmailResponse {
    pub fn sent(id: impl Into<String>) -> Self {
        Self {
            ok: true,
            id: id.into(),
        }
    }
}

/// Error body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
