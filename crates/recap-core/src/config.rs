use serde::Deserialize;
use std::{env, path::Path};
use thiserror::Error;

use crate::secret::Secret;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    pub app: AppConfig,
    pub telemetry: TelemetryConfig,
    pub model: ModelConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    pub service_name: String,
    pub port: u16,
    pub env: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TelemetryConfig {
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    pub export_traces: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub api_key: Secret,
    /// Overrides the provider endpoint, e.g. for a proxy. Must end with `/`.
    #[serde(default)]
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTls {
    /// TLS from the first byte (SMTPS, usually port 465).
    Implicit,
    /// Plain connection upgraded with STARTTLS (usually port 587).
    Starttls,
    /// No TLS. Only for local relays.
    Plain,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub tls: MailTls,
    pub username: String,
    pub password: Secret,
    #[serde(default)]
    pub from: Option<String>,
}

impl MailConfig {
    /// Address used as the envelope and header sender.
    pub fn sender(&self) -> &str {
        self.from
            .as_deref()
            .filter(|from| !from.is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    ConfigBuild(config::ConfigError),
    #[error("failed to parse configuration: {0}")]
    Deserialize(config::ConfigError),
    #[error("missing required environment variable {0}")]
    MissingEnvVar(String),
    #[error("invalid {name} override: {source}")]
    InvalidPort {
        name: &'static str,
        source: std::num::ParseIntError,
    },
}

const DEFAULTS: &[(&str, &str)] = &[
    ("app.service_name", "recap"),
    ("app.env", "dev"),
    ("model.provider", "gemini"),
    ("model.model", "gemini-1.5-flash"),
    ("model.api_key", "env:GEMINI_API_KEY"),
    ("mail.host", "smtp.gmail.com"),
    ("mail.tls", "implicit"),
    ("mail.username", "env:EMAIL_USER"),
    ("mail.password", "env:EMAIL_PASS"),
];

impl Config {
    /// Load configuration from the provided path (which may be absent), layered over the
    /// built-in defaults. Environment overrides are applied afterwards and any `env:`
    /// indirections are resolved last.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        for (key, value) in DEFAULTS {
            builder = builder
                .set_default(*key, *value)
                .map_err(ConfigError::ConfigBuild)?;
        }
        let raw = builder
            .set_default("app.port", 3000_i64)
            .and_then(|b| b.set_default("telemetry.export_traces", false))
            .and_then(|b| b.set_default("model.temperature", 0.2_f64))
            .and_then(|b| b.set_default("model.max_output_tokens", 2048_i64))
            .and_then(|b| b.set_default("mail.port", 465_i64))
            .map_err(ConfigError::ConfigBuild)?
            .add_source(config::File::from(path.as_ref()).required(false))
            .build()
            .map_err(ConfigError::ConfigBuild)?;

        let mut cfg: Config = raw.try_deserialize().map_err(ConfigError::Deserialize)?;
        cfg.apply_env_overrides()?;
        cfg.resolve_env_markers()?;
        cfg.normalize();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(port) = env::var("APP_PORT") {
            self.app.port = port.parse().map_err(|source| ConfigError::InvalidPort {
                name: "APP_PORT",
                source,
            })?;
        }

        if let Ok(otlp) = env::var("OTLP_ENDPOINT") {
            self.telemetry.otlp_endpoint = Some(otlp);
        }

        if let Ok(model) = env::var("MODEL") {
            self.model.model = model;
        }

        if let Ok(key) = env::var("GEMINI_API_KEY") {
            self.model.api_key = Secret::new(key);
        }

        if let Ok(user) = env::var("EMAIL_USER") {
            self.mail.username = user;
        }

        if let Ok(pass) = env::var("EMAIL_PASS") {
            self.mail.password = Secret::new(pass);
        }

        if let Ok(host) = env::var("SMTP_HOST") {
            self.mail.host = host;
        }

        if let Ok(port) = env::var("SMTP_PORT") {
            self.mail.port = port.parse().map_err(|source| ConfigError::InvalidPort {
                name: "SMTP_PORT",
                source,
            })?;
        }

        Ok(())
    }

    fn resolve_env_markers(&mut self) -> Result<(), ConfigError> {
        apply_env_marker(&mut self.app.service_name)?;
        apply_env_marker(&mut self.app.env)?;
        apply_env_marker(&mut self.model.provider)?;
        apply_env_marker(&mut self.model.model)?;
        apply_env_marker(self.model.api_key.as_mut_string())?;
        if let Some(base) = &mut self.model.api_base {
            apply_env_marker(base)?;
        }
        apply_env_marker(&mut self.mail.host)?;
        apply_env_marker(&mut self.mail.username)?;
        apply_env_marker(self.mail.password.as_mut_string())?;
        if let Some(from) = &mut self.mail.from {
            apply_env_marker(from)?;
        }
        if let Some(endpoint) = &mut self.telemetry.otlp_endpoint {
            apply_env_marker(endpoint)?;
        }
        Ok(())
    }

    fn normalize(&mut self) {
        if self.model.api_base.as_deref().is_some_and(str::is_empty) {
            self.model.api_base = None;
        }
        if self.mail.from.as_deref().is_some_and(str::is_empty) {
            self.mail.from = None;
        }
        if self
            .telemetry
            .otlp_endpoint
            .as_deref()
            .is_some_and(str::is_empty)
        {
            self.telemetry.otlp_endpoint = None;
        }
    }
}

fn apply_env_marker(value: &mut String) -> Result<(), ConfigError> {
    if let Some(rest) = value.strip_prefix("env:") {
        let resolved = env::var(rest).map_err(|_| ConfigError::MissingEnvVar(rest.to_string()))?;
        *value = resolved;
    }
    Ok(())
}
