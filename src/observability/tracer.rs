//! Tracer provider backed by a file exporter.
//!
//! Finished spans are written as OTLP JSON lines to a rotating local file
//! instead of being shipped to a collector.

use super::file_writer::{FileWriter, RotationPolicy};
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

/// Instrumentation scope recorded on every exported batch.
pub const SCOPE_NAME: &str = "StaffDirectory";

struct FileSpanExporter {
    writer: FileWriter,
    formatter: SpanFormatter,
    is_shutdown: AtomicBool,
}

impl FileSpanExporter {
    const fn new(writer: FileWriter, resource: Resource) -> Self {
        Self {
            writer,
            formatter: SpanFormatter::new(resource, SCOPE_NAME),
            is_shutdown: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.is_shutdown.load(Ordering::SeqCst) {
            return Err(TraceError::from("exporter is shut down"));
        }
        let line = self.formatter.format_batch(batch).to_string();
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(e.to_string()))
    }
}

impl SpanExporter for FileSpanExporter {
    /// Writes the batch as one OTLP JSON line.
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.is_shutdown.store(true, Ordering::SeqCst);
    }

    // Resource is fixed at construction.
    fn set_resource(&mut self, _res: &Resource) {}
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("writer", &self.writer)
            .field("formatter", &self.formatter)
            .field("is_shutdown", &self.is_shutdown)
            .finish()
    }
}

/// Builds a provider that exports every span synchronously to `file_path`.
///
/// ```no_run
/// use opentelemetry::KeyValue;
/// use opentelemetry_sdk::resource::Resource;
/// use staff_directory::observability::{create_tracer_provider, RotationPolicy};
///
/// let resource = Resource::new(vec![KeyValue::new("service.name", "StaffDirectory")]);
/// let _provider = create_tracer_provider(
///     "/tmp/staff-directory-otlp.json".into(),
///     resource,
///     RotationPolicy::default(),
/// );
/// ```
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource, policy: RotationPolicy) -> TracerProvider {
    let exporter = FileSpanExporter::new(FileWriter::new(file_path, policy), resource.clone());

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}
