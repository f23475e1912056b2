//! # Conversion Application
//!
//! Binary that wires together all the components:
//! - Load configuration from environment
//! - Build the upstream rate client
//! - Create the conversion service
//! - Start the HTTP server

mod config;

use opentelemetry::global;
use opentelemetry_sdk::{propagation::TraceContextPropagator, trace as sdktrace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conversion_hex::{ConversionService, inbound::HttpServer};
use rates_client::FreeCurrencyApiClient;

fn init_tracer() -> anyhow::Result<(sdktrace::Tracer, sdktrace::SdkTracerProvider)> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    // Use gRPC exporter with batch processing (non-blocking)
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .build()?;

    let provider = sdktrace::SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .build();

    global::set_tracer_provider(provider.clone());

    use opentelemetry::trace::TracerProvider as _;
    Ok((provider.tracer("conversion-service"), provider))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Export traces only when a collector is configured
    let otel = match std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") {
        Ok(_) => Some(init_tracer()?),
        Err(_) => None,
    };
    let telemetry = otel
        .as_ref()
        .map(|(tracer, _)| tracing_opentelemetry::layer().with_tracer(tracer.clone()));

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,conversion_app=debug,conversion_hex=debug,rates_client=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry)
        .init();

    // Load configuration
    let config = config::Config::from_env().inspect_err(|e| {
        tracing::error!("{}", e);
        tracing::error!("Please configure the FREE_CURRENCY_API_BASE_URL");
    })?;

    tracing::info!("Starting conversion server on port {}", config.port);
    tracing::info!("Using exchange rate API: {}", config.api_base_url);

    // Build the upstream client once; it is shared by every request
    let client = FreeCurrencyApiClient::with_timeout(
        &config.api_base_url,
        config.api_key.as_deref(),
        config.api_timeout,
    )
    .inspect_err(|e| tracing::error!("{}", e))?;
    if !client.has_api_key() {
        tracing::warn!("No FREE_CURRENCY_API_API_KEY configured, upstream may reject requests");
    }

    // Create the conversion service
    let service = ConversionService::new(client);

    // Create and run the HTTP server
    let server = HttpServer::with_rate_limit(
        service,
        config.rate_limit_per_minute,
        config.trust_forwarded_for,
    );
    let addr = format!("0.0.0.0:{}", config.port);

    server.run(&addr).await?;

    // Ensure traces are flushed before exit
    if let Some((_, provider)) = otel {
        let _ = provider.shutdown();
    }
    Ok(())
}
