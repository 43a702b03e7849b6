//! POST /api/summerize
//!
//! Validates `{ transcript, prompt }` and returns `{ summary }` with the model output
//! verbatim.

use axum::{Json, body::Bytes, extract::State};

use recap_core::{SummarizeRequest, SummarizeResponse, parse_body};

use super::error::ApiError;
use crate::AppState;

pub async fn summarize(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SummarizeResponse>, ApiError> {
    let request: SummarizeRequest = parse_body(&body)?;
    let summary = state.summarizer.summarize(&request).await?;
    Ok(Json(SummarizeResponse { summary }))
}
