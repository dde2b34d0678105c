//! # Payments Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Initialize tracing (optionally exporting spans over OTLP)
//! - Create the payment service with the static rate table and local tokenizer
//! - Start the HTTP server

mod config;

use exchange_rates::RateTable;
use opentelemetry::global;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payments_hex::{
    PaymentService, inbound::HttpServer, outbound::StaticRateProvider, security::ApiKeys,
};
use payments_types::LocalTokenizer;

use config::{Config, LogFormat};

fn init_tracer(endpoint: &str) -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("payments-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    // Initialize OpenTelemetry tracing when a collector endpoint is configured
    let (otel_tracer, otel_provider) = match config.otel_endpoint.as_deref() {
        Some(endpoint) => {
            let (tracer, provider) = init_tracer(endpoint)?;
            (Some(tracer), Some(provider))
        }
        None => (None, None),
    };
    let telemetry = otel_tracer.map(|tracer| tracing_opentelemetry::layer().with_tracer(tracer));

    let text_logs =
        (config.log_format == LogFormat::Text).then(|| tracing_subscriber::fmt::layer());
    let json_logs =
        (config.log_format == LogFormat::Json).then(|| tracing_subscriber::fmt::layer().json());

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,payments_app=debug,payments_hex=debug".into()),
        )
        .with(text_logs)
        .with(json_logs)
        .with(telemetry)
        .init();

    tracing::info!(?config, "Starting payments server");

    let tokenizer = match config.token_secret.as_deref() {
        Some(secret) => LocalTokenizer::with_secret(secret.as_bytes()),
        None => LocalTokenizer::new(),
    };
    let service = PaymentService::new(StaticRateProvider::new(RateTable::builtin()), tokenizer);

    let api_keys = ApiKeys::from_raw(&config.api_keys);
    if api_keys.is_enabled() {
        tracing::info!(keys = api_keys.len(), "API key authentication enabled");
    } else {
        tracing::warn!("No API_KEYS configured; authentication is disabled");
    }

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(service, config.rate_limit_per_minute)
        .with_api_keys(api_keys);

    server.run(&config.bind_addr()).await?;

    // Ensure traces are flushed before exit
    if let Some(provider) = otel_provider {
        let _ = provider.shutdown();
    }
    Ok(())
}
