//! HTTP API handlers for the recap web client.
//!
//! Provides:
//! - POST /api/summerize (and /api/summarize) - Summarize a transcript
//! - POST /api/send-email - Email a summary to a list of recipients

pub mod email;
pub mod error;
pub mod summarize;

use axum::{Router, routing::post};

use crate::AppState;

/// Create the API router; mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summerize", post(summarize::summarize))
        .route("/summarize", post(summarize::summarize))
        .route("/send-email", post(email::send_email))
}
