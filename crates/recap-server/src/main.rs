use std::{env, net::SocketAddr, sync::Arc};

use axum::{Json, Router, extract::DefaultBodyLimit, http::StatusCode, routing::get};
use recap_core::{
    Config, GenaiCompletionService, Mailer, SmtpRelay, Summarizer, init_telemetry,
};
use serde::Serialize;
use tracing::{info, warn};

mod api;

#[derive(Clone)]
pub(crate) struct AppState {
    summarizer: Summarizer,
    mailer: Mailer,
}

impl AppState {
    pub(crate) fn new(summarizer: Summarizer, mailer: Mailer) -> Self {
        Self { summarizer, mailer }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    let config = Config::load(&config_path)?;

    let _guard = init_telemetry(&config.app, &config.telemetry)?;

    let completion = Arc::new(GenaiCompletionService::new(&config.model));
    info!(model = completion.model(), "text completion service ready");
    let summarizer = Summarizer::new(completion, &config.model);

    let relay = SmtpRelay::new(config.mail.clone())?;
    info!(
        host = %config.mail.host,
        port = config.mail.port,
        sender = %relay.sender().email,
        "mail relay configured"
    );
    let mailer = Mailer::new(Arc::new(relay));

    let app = router(AppState::new(summarizer, mailer));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.app.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Recap listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Request bodies are not size-capped; transcripts of any length reach the validator.
fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api::router())
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn healthz() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        let mut sigterm = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("received ctrl+c, shutting down");
        }
        _ = terminate => {
            warn!("received terminate signal, shutting down");
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use recap_core::{
        MockCompletionService, MockMailRelay, ModelConfig, Mailer, Secret, Summarizer,
    };

    use crate::AppState;

    pub(crate) fn model_config() -> ModelConfig {
        ModelConfig {
            provider: "gemini".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.2,
            max_output_tokens: 512,
            api_key: Secret::new("sk-test-secret-key"),
            api_base: None,
        }
    }

    /// State wired to mocks; the returned handles script and inspect them.
    pub(crate) fn mock_state() -> (AppState, MockCompletionService, MockMailRelay) {
        let llm = MockCompletionService::new();
        let relay = MockMailRelay::new();
        let state = AppState::new(
            Summarizer::new(Arc::new(llm.clone()), &model_config()),
            Mailer::new(Arc::new(relay.clone())),
        );
        (state, llm, relay)
    }
}
