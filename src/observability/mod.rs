//! Local trace export.
//!
//! Store mutations, loads, migrations and exports run inside `tracing`
//! spans. [`init_tracing`] routes them through OpenTelemetry into a JSON
//! file in the data directory:
//!
//! ```text
//! tracing → tracing-opentelemetry → FileSpanExporter → staff-directory-otlp.json
//! ```
//!
//! The file rotates at 10MB and keeps three backups. The level comes from
//! `trace_level` in [`Config`](crate::Config), default `"info"`.

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotationPolicy;
pub use init::{init_tracing, TRACE_FILE_NAME};
pub use tracer::create_tracer_provider;
