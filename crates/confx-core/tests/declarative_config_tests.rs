#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::sync::Arc;

use confx_core::logging_facility::test_capture::init_test_capture;
use confx_core::schema::builtin::gateway_registry;
use confx_core::{
    declarative_config_flattened, CoreError, ErrorCode, ErrorFactory, SharedRelationships,
};
use serde_json::{json, Value};

#[test]
fn test_declarative_config_error_shape() {
    let index = common::gateway_index();
    let factory = ErrorFactory::new(Some("off".to_string()));
    let errors = common::nested_service_errors();

    let err = declarative_config_flattened(
        &factory,
        &index,
        &errors,
        &common::nested_service_document(),
    )
    .unwrap();

    assert_eq!(err.code(), ErrorCode::DeclarativeConfig);
    assert_eq!(err.name(), "invalid declarative configuration");
    assert_eq!(err.producer(), Some("off"));
    assert!(err
        .message()
        .unwrap()
        .starts_with("declarative config is invalid: {\"services\":"));
    assert_eq!(err.fields(), errors.as_object());

    let records = err.flattened_errors().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entity_type, "plugin");
    assert_eq!(records[1].entity_type, "route");
}

#[test]
fn test_declarative_config_json_body() {
    let index = common::gateway_index();
    let err = declarative_config_flattened(
        &ErrorFactory::new(Some("off".to_string())),
        &index,
        &json!({ "consumers": [{ "username": "length must be at least 1" }] }),
        &json!({ "consumers": [{ "username": "" }] }),
    )
    .unwrap();

    let body = serde_json::to_value(&err).unwrap();
    assert_eq!(body["code"], json!(14));
    assert_eq!(body["name"], json!("invalid declarative configuration"));
    assert!(body.get("producer").is_none());
    assert_eq!(
        body["flattened_errors"],
        json!([{
            "entity_type": "consumer",
            "entity": { "username": "" },
            "errors": [
                { "type": "field", "field": "username", "message": "length must be at least 1" }
            ]
        }])
    );
}

#[test]
fn test_clean_document_has_no_records() {
    let index = common::gateway_index();
    let err = declarative_config_flattened(
        &ErrorFactory::default(),
        &index,
        &json!({}),
        &json!({ "services": [{ "name": "fine" }] }),
    )
    .unwrap();

    assert_eq!(err.flattened_errors(), Some(&[][..]));
    assert_eq!(err.to_string(), "declarative config is invalid: {}");
}

#[test]
fn test_non_mapping_arguments_are_logged_and_returned() {
    let capture = init_test_capture();
    let index = common::gateway_index();

    let err = declarative_config_flattened(
        &ErrorFactory::default(),
        &index,
        &json!({}),
        &json!(["not", "a", "mapping"]),
    )
    .unwrap_err();

    assert_eq!(
        err,
        CoreError::InvalidInput {
            op: "flatten",
            arg: "input"
        }
    );
    let logged = capture.count_events(|e| {
        e.op.as_deref() == Some("declarative_config_flattened")
            && e.event.as_deref() == Some("end_error")
            && e.field("err_code") == Some("ERR_INVALID_INPUT")
    });
    assert!(logged >= 1);
}

#[test]
fn test_shared_relationships_across_threads() {
    let shared = SharedRelationships::new(Arc::new(gateway_registry()));
    let factory = ErrorFactory::new(Some("off".to_string()));
    let input = common::nested_service_document();
    let errors = common::nested_service_errors();

    let bodies: Vec<Value> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let err =
                        declarative_config_flattened(&factory, shared.get(), &errors, &input)
                            .unwrap();
                    serde_json::to_value(&err).unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(shared.is_built());
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_yaml_document_flattens_like_json() {
    let input: Value = serde_yaml::from_str(
        r#"
services:
  - name: svc
    url: http://x
    routes:
      - name: r
        protocols: [bogus]
    plugins:
      - name: nope
"#,
    )
    .unwrap();
    assert_eq!(input, common::nested_service_document());

    let index = common::gateway_index();
    let err = declarative_config_flattened(
        &ErrorFactory::default(),
        &index,
        &common::nested_service_errors(),
        &input,
    )
    .unwrap();
    assert_eq!(err.flattened_errors().unwrap().len(), 2);
}
