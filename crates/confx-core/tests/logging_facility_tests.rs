#![allow(clippy::unwrap_used, clippy::expect_used)]

use confx_core::logging_facility::test_capture::init_test_capture;
use confx_core::CoreError;
use confx_core::{log_anomaly, log_op_end, log_op_error, log_op_start};
use confx_core_types::schema::{
    ANOMALY_ENTITY_MISSING, EVENT_ANOMALY, EVENT_END, EVENT_END_ERROR, EVENT_START,
    FIELD_ANOMALY, FIELD_ERR_CODE,
};
use tracing::Level;

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    capture.assert_event_exists(op_name, EVENT_START);
}

#[test]
fn test_log_op_end_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let events = capture.events();
    let end_events: Vec<_> = events
        .iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = CoreError::UnknownCode { code: 99 };
    log_op_error!(op_name, err, duration_ms = 10);

    let events = capture.events();
    let error_event = events
        .iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(error_event.level, Level::ERROR);
    assert_eq!(error_event.field(FIELD_ERR_CODE), Some("ERR_UNKNOWN_CODE"));
}

#[test]
fn test_boundary_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name, entity_type = "services");
    log_op_end!(op_name, duration_ms = 1, record_count = 3u64);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_anomaly_is_a_warning_with_reason() {
    let capture = init_test_capture();

    log_anomaly!(
        "test_anomaly_unique_5",
        ANOMALY_ENTITY_MISSING,
        entity_type = "test_anomaly_widgets",
        entity_index = 7u64
    );

    let anomalies = capture.anomalies_for("test_anomaly_widgets");
    assert_eq!(anomalies.len(), 1);
    let anomaly = &anomalies[0];
    assert_eq!(anomaly.level, Level::WARN);
    assert_eq!(anomaly.event.as_deref(), Some(EVENT_ANOMALY));
    assert_eq!(anomaly.field(FIELD_ANOMALY), Some(ANOMALY_ENTITY_MISSING));
    assert_eq!(anomaly.field("entity_index"), Some("7"));
}
