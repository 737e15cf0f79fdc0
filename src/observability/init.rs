//! Subscriber setup wiring `tracing` to the file exporter.

use super::file_writer::RotationPolicy;
use super::tracer::{self, SCOPE_NAME};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name of the trace file inside the data directory.
pub const TRACE_FILE_NAME: &str = "staff-directory-otlp.json";

/// Installs the global subscriber.
///
/// Spans at or above `config.trace_level` (default `"info"`, any
/// `EnvFilter` directive is accepted) are exported to
/// `<data_dir>/staff-directory-otlp.json`. Observability is optional: when
/// the data directory cannot be created nothing is installed, and calls
/// after the first successful one have no effect.
///
/// ```no_run
/// use staff_directory::{observability::init_tracing, Config};
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SCOPE_NAME)]);
    let provider = tracer::create_tracer_provider(
        config.data_dir.join(TRACE_FILE_NAME),
        resource,
        RotationPolicy::default(),
    );

    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SCOPE_NAME));

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(otel_layer)
        .try_init();
}
