//! POST /api/send-email
//!
//! Validates `{ to, subject, body }`, hands the message to the relay and returns
//! `{ ok: true, id }`.

use axum::{Json, body::Bytes, extract::State};

use recap_core::{EmailRequest, SendEmailResponse, parse_body};

use super::error::ApiError;
use crate::AppState;

pub async fn send_email(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let request: EmailRequest = parse_body(&body)?;
    let id = state.mailer.send(&request).await?;
    Ok(Json(SendEmailResponse::sent(id)))
}
