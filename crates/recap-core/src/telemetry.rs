use std::fmt as StdFmt;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use chrono::Utc;
use opentelemetry::KeyValue;
use opentelemetry::global;
use opentelemetry::trace::{TraceContextExt, TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::{BatchSpanProcessor, SdkTracerProvider};
use opentelemetry_sdk::{Resource, trace};
use serde_json::json;
use thiserror::Error;
use tracing::Subscriber;
use tracing_opentelemetry::{OpenTelemetrySpanExt, OtelData};
use tracing_subscriber::field::MakeExt;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer, debug_fn};
use tracing_subscriber::fmt::{self, FmtContext};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::reload;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{AppConfig, TelemetryConfig};
use crate::secret::{is_sensitive_field, redacted};

struct TelemetryHandles {
    install_otel: Box<dyn Fn(trace::Tracer) -> Result<(), TelemetryError> + Send + Sync + 'static>,
}

impl TelemetryHandles {
    fn install_tracer(&self, tracer: trace::Tracer) -> Result<(), TelemetryError> {
        (self.install_otel)(tracer)
    }
}

static TELEMETRY_HANDLES: OnceLock<TelemetryHandles> = OnceLock::new();
static GLOBAL_GUARD: OnceLock<Mutex<Option<TelemetryGuard>>> = OnceLock::new();

/// Guard that owns the tracer provider so spans are flushed on drop.
#[derive(Clone)]
pub struct TelemetryGuard {
    provider: Option<Arc<SdkTracerProvider>>,
    shutdown_on_drop: bool,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if self.shutdown_on_drop {
            if let Some(provider) = self.provider.take() {
                if Arc::strong_count(&provider) == 1 {
                    let _ = provider.shutdown();
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to set tracing subscriber: {0}")]
    SubscriberInit(String),
    #[error("failed to build OTLP exporter: {0}")]
    ExporterBuild(String),
}

/// Initialize structured logging (RUST_LOG driven) and optional OpenTelemetry tracing.
///
/// `dev` environments get pretty stderr output, everything else one JSON object per
/// line. In both formats fields whose names denote credentials are replaced with
/// `[redacted]` before they are written.
pub fn init_telemetry(
    app: &AppConfig,
    telemetry: &TelemetryConfig,
) -> Result<TelemetryGuard, TelemetryError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| TelemetryError::SubscriberInit(err.to_string()))?;

    let (tracer, provider) = build_tracer(app, telemetry)?;

    let json_format = !app.env.eq_ignore_ascii_case("dev");
    if json_format {
        let fmt_layer = fmt::layer().event_format(JsonTraceFormatter);
        install_subscriber(fmt_layer, env_filter, tracer)?;
    } else {
        let fields = debug_fn(|writer: &mut Writer<'_>, field, value| {
            if field.name() == "message" {
                write!(writer, "{value:?}")
            } else if is_sensitive_field(field.name()) {
                write!(writer, "{}={}", field.name(), redacted())
            } else {
                write!(writer, "{}={value:?}", field.name())
            }
        })
        .delimited(", ");
        let fmt_layer = fmt::layer()
            .with_target(true)
            .pretty()
            .fmt_fields(fields)
            .with_writer(std::io::stderr);
        install_subscriber(fmt_layer, env_filter, tracer)?;
    }

    let guard = provider
        .as_ref()
        .map(|provider| retain_provider(provider.clone()))
        .unwrap_or(TelemetryGuard {
            provider: None,
            shutdown_on_drop: false,
        });

    Ok(guard)
}

fn build_tracer(
    app: &AppConfig,
    telemetry: &TelemetryConfig,
) -> Result<(Option<trace::Tracer>, Option<Arc<SdkTracerProvider>>), TelemetryError> {
    if !telemetry.export_traces {
        return Ok((None, None));
    }

    let endpoint = match telemetry.otlp_endpoint.as_deref() {
        Some(endpoint) if !endpoint.is_empty() => endpoint,
        _ => return Ok((None, None)),
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_http()
        .with_timeout(Duration::from_secs(3))
        .with_endpoint(endpoint)
        .build()
        .map_err(|err| TelemetryError::ExporterBuild(err.to_string()))?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", app.service_name.clone()),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            KeyValue::new("deployment.environment", app.env.clone()),
        ])
        .build();
    let provider = SdkTracerProvider::builder()
        .with_span_processor(BatchSpanProcessor::builder(exporter).build())
        .with_resource(resource)
        .build();

    let provider = Arc::new(provider);

    global::set_tracer_provider(provider.as_ref().clone());
    global::set_text_map_propagator(opentelemetry_sdk::propagation::TraceContextPropagator::new());

    let tracer = provider.tracer(app.service_name.clone());

    Ok((Some(tracer), Some(provider)))
}

fn retain_provider(provider: Arc<SdkTracerProvider>) -> TelemetryGuard {
    let local_guard = TelemetryGuard {
        provider: Some(provider.clone()),
        shutdown_on_drop: false,
    };

    let global_guard = TelemetryGuard {
        provider: Some(provider),
        shutdown_on_drop: true,
    };

    let slot = GLOBAL_GUARD.get_or_init(|| Mutex::new(None));
    if let Ok(mut slot) = slot.lock() {
        *slot = Some(global_guard);
    }

    local_guard
}

fn install_subscriber(
    fmt_layer: impl tracing_subscriber::Layer<Registry> + Send + Sync + 'static,
    env_filter: EnvFilter,
    tracer: Option<trace::Tracer>,
) -> Result<(), TelemetryError> {
    if let Some(handles) = TELEMETRY_HANDLES.get() {
        if let Some(tracer) = tracer {
            handles.install_tracer(tracer)?;
        }
        return Ok(());
    }

    let (otel_layer, otel_reload) =
        reload::Layer::new(tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer)));

    let subscriber = Registry::default()
        .with(fmt_layer)
        .with(otel_layer)
        .with(env_filter);

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| TelemetryError::SubscriberInit(err.to_string()))?;

    let handles = TelemetryHandles {
        install_otel: Box::new(move |tracer: trace::Tracer| {
            otel_reload
                .modify(|layer| {
                    *layer = Some(tracing_opentelemetry::layer().with_tracer(tracer));
                })
                .map_err(|err| TelemetryError::SubscriberInit(err.to_string()))
        }),
    };
    let _ = TELEMETRY_HANDLES.set(handles);

    Ok(())
}

#[derive(Default)]
struct JsonTraceFormatter;

impl<S, N> FormatEvent<S, N> for JsonTraceFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'writer> FormatFields<'writer> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> StdFmt::Result {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let trace_id = ctx
            .lookup_current()
            .and_then(|span| {
                span.extensions()
                    .get::<OtelData>()
                    .and_then(|data| data.trace_id())
            })
            .or_else(|| {
                let ctx = tracing::Span::current().context();
                let span_ctx = ctx.span().span_context().clone();
                span_ctx.is_valid().then(|| span_ctx.trace_id())
            })
            .map(|id| id.to_string());

        let span_name = ctx.lookup_current().map(|span| span.name().to_string());

        let payload = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": event.metadata().level().as_str().to_lowercase(),
            "target": event.metadata().target(),
            "span": span_name,
            "trace_id": trace_id,
            "fields": visitor.fields,
        });

        let serialized = serde_json::to_string(&payload).map_err(|_| StdFmt::Error)?;
        writer.write_str(&serialized)?;
        writer.write_str("\n")
    }
}

/// Collects event fields into a JSON map, dropping the values of credential fields.
#[derive(Default)]
struct JsonVisitor {
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &tracing::field::Field, value: serde_json::Value) {
        let value = if is_sensitive_field(field.name()) {
            redacted().into()
        } else {
            value
        };
        self.fields.insert(field.name().to_string(), value);
    }
}

impl tracing_subscriber::field::Visit for JsonVisitor {
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.insert(field, value.into());
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.insert(field, value.into());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.insert(field, value.into());
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.insert(field, value.into());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn StdFmt::Debug) {
        self.insert(field, format!("{value:?}").into());
    }
}
