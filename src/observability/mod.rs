//! OpenTelemetry tracing exported to a local file.
//!
//! ```text
//! tracing → tracing-opentelemetry → OpenTelemetry SDK → FileSpanExporter → JSON lines
//! ```
//!
//! Spans land in `~/.local/share/zellij/tabula/tabula-otlp.json`, one OTLP
//! JSON document per exported batch. The file rolls over at 10 MB and keeps
//! three backups.
//!
//! The level comes from `trace_level` in the plugin configuration and
//! defaults to `info`.

mod export;
mod rotation;

use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global tracing subscriber.
///
/// Does nothing when the data directory cannot be created or a subscriber
/// is already installed.
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");

    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", export::SCOPE_NAME)]);
    let provider = export::file_tracer_provider(data_dir.join("tabula-otlp.json"), resource);
    let tracer = provider.tracer(export::SCOPE_NAME);

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(OpenTelemetryLayer::new(tracer));

    if subscriber.try_init().is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
