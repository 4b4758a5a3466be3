//! In-memory event capture for tests
//!
//! The flattener reports skipped data through warning events rather than
//! errors, so tests assert on those events. [`init_test_capture`] installs a
//! recording layer as the global subscriber once per test binary; every
//! caller shares the same [`TestCapture`] handle.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use confx_core_types::schema::{
    EVENT_ANOMALY, FIELD_ANOMALY, FIELD_ENTITY_TYPE, FIELD_EVENT, FIELD_OP,
};

/// One recorded event, fields rendered as text
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

/// Renders every field as text; strings without the Debug quotes
#[derive(Default)]
struct TextFields(BTreeMap<String, String>);

impl Visit for TextFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer appending every event to a shared buffer
pub struct TestCaptureLayer {
    buffer: Buffer,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let buffer = Buffer::default();
        (
            Self {
                buffer: Arc::clone(&buffer),
            },
            TestCapture { buffer },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = TextFields::default();
        event.record(&mut fields);
        let fields = fields.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(FIELD_OP).cloned(),
            event: fields.get(FIELD_EVENT).cloned(),
            fields,
        };
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.push(captured);
        }
    }
}

/// Read side of the capture buffer
#[derive(Clone)]
pub struct TestCapture {
    buffer: Buffer,
}

impl TestCapture {
    /// Snapshot of everything captured so far
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.buffer
            .lock()
            .map(|buffer| buffer.clone())
            .unwrap_or_default()
    }

    /// Anomaly events reported for `entity_type`
    ///
    /// Tests in one binary share the buffer and run in parallel, so each
    /// test filters on an entity type no other test uses.
    pub fn anomalies_for(&self, entity_type: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| {
                e.event.as_deref() == Some(EVENT_ANOMALY)
                    && e.field(FIELD_ENTITY_TYPE) == Some(entity_type)
            })
            .collect()
    }

    /// Anomaly reasons reported for `entity_type`, in emission order
    pub fn anomaly_reasons(&self, entity_type: &str) -> Vec<String> {
        self.anomalies_for(entity_type)
            .iter()
            .filter_map(|e| e.field(FIELD_ANOMALY).map(str::to_string))
            .collect()
    }

    /// # Panics
    ///
    /// Panics unless an event with this `op` and `event` was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no event op={} event={} among {} captured",
            op,
            event,
            events.len()
        );
    }

    pub fn count_events(&self, predicate: impl Fn(&CapturedEvent) -> bool) -> usize {
        self.events().iter().filter(|e| predicate(e)).count()
    }
}

static CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer (first call only) and return its handle
///
/// ```
/// use confx_core::logging_facility::test_capture::init_test_capture;
/// use confx_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_example_op");
/// capture.assert_event_exists("doc_example_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            tracing_subscriber::registry().with(layer).init();
            capture
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captured_event_lookup() {
        let event = CapturedEvent {
            level: Level::WARN,
            op: Some("flatten".to_string()),
            event: Some("anomaly".to_string()),
            fields: BTreeMap::from([("entity_type".to_string(), "routes".to_string())]),
        };

        assert_eq!(event.field("entity_type"), Some("routes"));
        assert_eq!(event.field("missing"), None);
        assert!(event.is("flatten", "anomaly"));
        assert!(!event.is("flatten", "start"));
    }
}
