use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recap_core::{ErrorResponse, LLMError, MailError, SUMMARY_FAILED_MESSAGE, ValidationError};

/// Failure at the handler boundary. Every variant renders as `{ "error": String }`.
#[derive(Debug)]
pub enum ApiError {
    Validation(ValidationError),
    Summary(LLMError),
    Mail(MailError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Mail(_) => StatusCode::BAD_REQUEST,
            ApiError::Summary(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the caller. Upstream model failures are not described.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.message().to_string(),
            ApiError::Summary(_) => SUMMARY_FAILED_MESSAGE.to_string(),
            ApiError::Mail(err) => err.client_message(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err)
    }
}

impl From<LLMError> for ApiError {
    fn from(err: LLMError) -> Self {
        ApiError::Summary(err)
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        ApiError::Mail(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Validation(err) => {
                let first = err.first();
                tracing::info!(field = %first.field, reason = %first.message, "rejected request");
            }
            ApiError::Summary(err) => tracing::error!("Failed to generate summary: {}", err),
            ApiError::Mail(err) => tracing::error!("Failed to send email: {}", err),
        }

        (self.status(), Json(ErrorResponse::new(self.client_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn render(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json"))
    }

    #[tokio::test]
    async fn validation_errors_are_bad_requests_with_first_message() {
        let err = ValidationError::single("to", "At least one recipient");
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "At least one recipient"}));
    }

    #[tokio::test]
    async fn model_failures_hide_the_cause() {
        let err = LLMError::ProviderError("API key sk-live-123 not valid".into());
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Failed to generate summary"}));
    }

    #[tokio::test]
    async fn mail_failures_surface_relay_text() {
        let (status, body) = render(MailError::Rejected("550 mailbox unavailable".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "mail relay rejected the message: 550 mailbox unavailable"})
        );

        let (status, body) = render(MailError::Relay(String::new()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Bad Request"}));
    }
}
