use opentelemetry_semantic_conventions::{
    resource::{SERVICE_NAME, SERVICE_VERSION},
    SCHEMA_URL,
};
use std::{
    fs::File,
    path::Path,
    sync::{mpsc, OnceLock},
};
use tracing::level_filters::LevelFilter;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    trace::{Sampler, SdkTracerProvider},
    Resource,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

const SERVICE: &str = "kubectl-argo-rollouts";
pub const LOG_FILE_NAME: &str = "rollouts.log";

static SUBSCRIBER_SET: OnceLock<()> = OnceLock::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();
static WORKER_HANDLE: OnceLock<std::thread::JoinHandle<()>> = OnceLock::new();

fn resource() -> Resource {
    Resource::builder()
        .with_schema_url(
            [
                KeyValue::new(SERVICE_NAME, SERVICE),
                KeyValue::new(SERVICE_VERSION, env!("CARGO_PKG_VERSION")),
            ],
            SCHEMA_URL,
        )
        .with_service_name(SERVICE)
        .build()
}

/// Must run inside a Tokio runtime, the batch exporter spawns onto it.
fn init_tracer_provider(endpoint: &str) -> Result<SdkTracerProvider, BoxError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            1.0,
        ))))
        .with_resource(resource())
        .with_batch_exporter(exporter)
        .build())
}

/// File logging plus OTLP span export to `endpoint`.
///
/// The exporter lives on its own thread with its own runtime so spans keep
/// flowing while the caller's runtime is busy redrawing.
pub fn setup_logger(log_dir: &str, endpoint: &str) -> Result<(), BoxError> {
    if SUBSCRIBER_SET.get().is_some() {
        return Ok(());
    }

    let (tx, rx) = mpsc::sync_channel(1);
    let endpoint_owned = endpoint.to_owned();

    let handle = std::thread::Builder::new()
        .name("otel-worker".into())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .worker_threads(2)
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tx.send(Err(BoxError::from(e))).ok();
                    return;
                }
            };

            rt.block_on(async move {
                let provider = init_tracer_provider(&endpoint_owned);
                let started = provider.is_ok();
                tx.send(provider).ok();
                if started {
                    std::future::pending::<()>().await;
                }
            });
        })?;

    let provider = rx.recv()??;
    TRACER_PROVIDER.set(provider.clone()).ok();
    WORKER_HANDLE.set(handle).ok();

    let file = File::create(Path::new(log_dir).join(LOG_FILE_NAME))?;
    let (writer, guard) = tracing_appender::non_blocking(file);
    let file_layer = tracing_subscriber::fmt::layer()
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(LevelFilter::INFO);
    LOG_GUARD.set(guard).ok();

    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE));

    tracing_subscriber::registry()
        .with(LevelFilter::TRACE)
        .with(file_layer)
        .with(otel_layer)
        .try_init()?;
    SUBSCRIBER_SET.set(()).ok();

    Ok(())
}

/// Flushes pending spans. Call before the process exits.
pub fn shutdown() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("failed to flush traces: {e}");
        }
    }
}
