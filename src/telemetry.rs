use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};

/// Compose multiple layers into a `tracing` subscriber.
///
/// `impl Subscriber` keeps the concrete layered type out of the signature.
pub fn get_subscriber<Sink>(
    name: String,
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = BunyanFormattingLayer::new(name, sink);
    Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer)
}

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("Failed to install the `log` bridge")]
    LogTracer(#[from] tracing_log::log_tracer::SetLoggerError),
    #[error("Failed to set the global tracing subscriber")]
    GlobalDefault(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Register a subscriber as global default to process span data.
///
/// It should only be called once! A second call fails.
pub fn init_subscriber(
    subscriber: impl Subscriber + Send + Sync,
) -> Result<(), TelemetryError> {
    // Rocket logs through `log`; forward those records into our subscriber.
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
