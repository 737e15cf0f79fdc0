//! OTLP JSON encoding of finished spans.
//!
//! Each exported batch becomes one JSON document:
//!
//! ```json
//! {
//!   "resourceSpans": [{
//!     "resource": { "attributes": [{"key": "service.name", "value": {"stringValue": "StaffDirectory"}}] },
//!     "scopeSpans": [{ "scope": {"name": "StaffDirectory"}, "spans": [...] }]
//!   }]
//! }
//! ```

use opentelemetry::trace::{Event, Link, SpanId, SpanKind, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{json, Value as JsonValue};
use std::time::{SystemTime, UNIX_EPOCH};

pub struct SpanFormatter {
    resource: Resource,
    scope: &'static str,
}

impl SpanFormatter {
    pub const fn new(resource: Resource, scope: &'static str) -> Self {
        Self { resource, scope }
    }

    /// Wraps `batch` in a single OTLP `resourceSpans` document.
    pub fn format_batch(&self, batch: &[SpanData]) -> JsonValue {
        let resource_attributes: Vec<JsonValue> = self
            .resource
            .iter()
            .map(|(key, value)| attribute(key.as_str(), value))
            .collect();
        let spans: Vec<JsonValue> = batch.iter().map(format_span).collect();

        json!({
            "resourceSpans": [{
                "resource": { "attributes": resource_attributes },
                "scopeSpans": [{
                    "scope": { "name": self.scope },
                    "spans": spans
                }]
            }]
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter").field("scope", &self.scope).finish_non_exhaustive()
    }
}

fn format_span(span: &SpanData) -> JsonValue {
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let (code, message) = status(&span.status);

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "kind": kind_code(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": attributes(&span.attributes),
        "events": span.events.iter().map(format_event).collect::<Vec<_>>(),
        "links": span.links.iter().map(format_link).collect::<Vec<_>>(),
        "status": { "code": code, "message": message },
    })
}

fn format_event(event: &Event) -> JsonValue {
    json!({
        "timeUnixNano": unix_nanos(event.timestamp),
        "name": event.name,
        "attributes": attributes(&event.attributes),
    })
}

fn format_link(link: &Link) -> JsonValue {
    json!({
        "traceId": format!("{:032x}", link.span_context.trace_id()),
        "spanId": format!("{:016x}", link.span_context.span_id()),
        "attributes": attributes(&link.attributes),
    })
}

fn attributes(pairs: &[KeyValue]) -> Vec<JsonValue> {
    pairs.iter().map(|kv| attribute(kv.key.as_str(), &kv.value)).collect()
}

fn attribute(key: &str, value: &Value) -> JsonValue {
    json!({ "key": key, "value": attribute_value(value) })
}

/// OTLP any-value encoding; 64-bit integers travel as strings.
fn attribute_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.as_str() }),
        Value::Array(_) => json!({ "stringValue": value.to_string() }),
    }
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn status(status: &Status) -> (u8, String) {
    match status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    }
}

fn unix_nanos(at: SystemTime) -> String {
    at.duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_encoded_as_strings() {
        assert_eq!(attribute_value(&Value::I64(42)), json!({ "intValue": "42" }));
        assert_eq!(attribute_value(&Value::Bool(true)), json!({ "boolValue": true }));
        assert_eq!(
            attribute("storage_key", &Value::from("staff-storage")),
            json!({ "key": "storage_key", "value": { "stringValue": "staff-storage" } })
        );
    }

    #[test]
    fn empty_batch_carries_resource_and_scope() {
        let resource = Resource::new(vec![KeyValue::new("service.name", "StaffDirectory")]);
        let doc = SpanFormatter::new(resource, "StaffDirectory").format_batch(&[]);

        let scope_spans = &doc["resourceSpans"][0]["scopeSpans"][0];
        assert_eq!(scope_spans["scope"]["name"], "StaffDirectory");
        assert_eq!(scope_spans["spans"], json!([]));
        let attrs = doc["resourceSpans"][0]["resource"]["attributes"].as_array().unwrap();
        assert!(attrs
            .iter()
            .any(|a| a["key"] == "service.name" && a["value"]["stringValue"] == "StaffDirectory"));
    }

    #[test]
    fn epoch_is_zero_nanos() {
        assert_eq!(unix_nanos(UNIX_EPOCH), "0");
    }
}
