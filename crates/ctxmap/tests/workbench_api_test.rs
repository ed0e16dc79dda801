//! Integration tests for the Workbench API
//!
//! These tests verify that the public API works and is usable.

use ctxmap::{
    CtxmapError, ErrorCode, Workbench,
    config::{AppConfig, ValidationConfig, WriterConfig},
    validate::ValidationCode,
};

const ORDERS: &str = r#"
BoundedContext Sales {
    Aggregate Orders {
        Entity Order {
            aggregateRoot
            - OrderId orderId key
            String status
        }
        ValueObject OrderId {
            String value
        }
    }
}
"#;

#[test]
fn test_workbench_api_exists() {
    let _workbench = Workbench::default();
}

#[test]
fn test_parse_simple_model() {
    let workbench = Workbench::default();
    let result = workbench.parse(ORDERS);
    assert!(
        result.is_ok(),
        "Should parse valid model: {:?}",
        result.err()
    );
}

#[test]
fn test_parse_error_keeps_source() {
    let source = "BoundedContext Sales {\n    Aggregate {\n}";
    let err = Workbench::default().parse(source).unwrap_err();

    match err {
        CtxmapError::Parse { err, src } => {
            assert_eq!(src, source);
            let diagnostic = &err.diagnostics()[0];
            assert_eq!(diagnostic.code(), Some(ErrorCode::E100));
            let position = diagnostic.position(&src).unwrap();
            assert_eq!((position.line, position.column), (2, 15));
        }
        other => panic!("Expected parse error, got {other:?}"),
    }
}

#[test]
fn test_check_accepts_valid_model() {
    let workbench = Workbench::default();
    let model = workbench.parse(ORDERS).expect("Failed to parse");
    let report = workbench.check(&model).expect("Model should be valid");
    assert!(report.is_empty());
}

#[test]
fn test_check_rejects_errors() {
    let workbench = Workbench::default();
    let model = workbench
        .parse("BoundedContext A { } BoundedContext A { }")
        .expect("Failed to parse");

    match workbench.check(&model) {
        Err(CtxmapError::Validation(report)) => {
            assert_eq!(report.findings()[0].code(), ValidationCode::E200);
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[test]
fn test_deny_warnings() {
    let source = "BoundedContext Sales { Aggregate Orders { Entity Order } }";

    let lenient = Workbench::default();
    let model = lenient.parse(source).expect("Failed to parse");
    let report = lenient.check(&model).expect("Warnings should pass");
    assert!(report.has_warnings());

    let strict = Workbench::new(AppConfig::new(
        WriterConfig::default(),
        ValidationConfig::new(true),
    ));
    let err = strict.check(&model).unwrap_err();
    assert_eq!(err.to_string(), "validation failed: 0 errors, 1 warning");
}

#[test]
fn test_serialize_uses_configured_indent() {
    let workbench = Workbench::new(AppConfig::new(
        WriterConfig::new(2),
        ValidationConfig::default(),
    ));
    let model = workbench.parse(ORDERS).expect("Failed to parse");
    let text = workbench.serialize(&model);

    assert!(text.contains("\n  Aggregate Orders {\n"));
    assert!(text.contains("\n    Entity Order {\n      aggregateRoot\n"));
}

#[test]
fn test_free_functions() {
    let model = ctxmap::parse(ORDERS).expect("Failed to parse");
    assert!(ctxmap::validate(&model).is_valid());
    assert_eq!(
        ctxmap::serialize(&model),
        Workbench::default().serialize(&model)
    );
}
