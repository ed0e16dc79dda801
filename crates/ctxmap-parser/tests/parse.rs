use ctxmap_core::model::{ContextMapState, Relationship, SymmetricKind, UpstreamPattern};
use ctxmap_parser::{CollectionKind, ErrorCode, Position, TypeRef, parse, parse_type_ref};

#[test]
fn test_order_scenario() {
    let source = r#"
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

    let model = parse(source).expect("Failed to parse");

    assert_eq!(model.bounded_contexts.len(), 1);
    let aggregate = &model.bounded_contexts[0].aggregates[0];
    assert_eq!(aggregate.name, "Orders");

    let root = aggregate.aggregate_root().expect("Expected an aggregate root");
    assert_eq!(root.name, "Order");
    assert_eq!(root.attributes.len(), 2);
    assert_eq!(root.attributes[0].name, "orderId");
    assert_eq!(root.attributes[0].type_name, "- OrderId");
    assert!(root.attributes[0].key);

    assert_eq!(aggregate.value_objects[0].name, "OrderId");
}

#[test]
fn test_keyword_prefixed_name_is_one_identifier() {
    let model = parse("BoundedContext ServiceNowPlatform { }").expect("Failed to parse");
    assert_eq!(model.bounded_contexts[0].name, "ServiceNowPlatform");
}

#[test]
fn test_escaped_attribute_name_drops_caret() {
    let model = parse("BoundedContext A { Aggregate B { Entity C { String ^query } } }")
        .expect("Failed to parse");
    let entity = &model.bounded_contexts[0].aggregates[0].entities[0];
    assert_eq!(entity.attributes[0].name, "query");
}

#[test]
fn test_context_map_with_relationships() {
    let source = r#"
        ContextMap Shop {
            type = SYSTEM_LANDSCAPE
            state = TO_BE
            contains Sales, Billing

            Sales [SK]<->[SK] Billing
            Sales [U,OHS] -> [D,ACL] Billing {
                exposedAggregates = Orders
            }
        }
        BoundedContext Sales { Aggregate Orders { } }
        BoundedContext Billing { }
    "#;

    let model = parse(source).expect("Failed to parse");
    let map = model.context_map.as_ref().expect("Expected a context map");

    assert_eq!(map.name.as_deref(), Some("Shop"));
    assert_eq!(map.state, ContextMapState::ToBe);
    assert_eq!(map.contains, vec!["Sales", "Billing"]);
    assert_eq!(map.relationships.len(), 2);

    match map.relationships[0].inner() {
        Relationship::Symmetric(rel) => assert_eq!(rel.kind, SymmetricKind::SharedKernel),
        other => panic!("Expected symmetric relationship, got {other:?}"),
    }
    match map.relationships[1].inner() {
        Relationship::UpstreamDownstream(rel) => {
            assert_eq!(rel.upstream_patterns, vec![UpstreamPattern::OpenHostService]);
            assert_eq!(rel.exposed_aggregates, vec!["Orders"]);
        }
        other => panic!("Expected upstream-downstream relationship, got {other:?}"),
    }
}

#[test]
fn test_lexical_errors_are_all_reported() {
    let source = "BoundedContext A {\n  domainVisionStatement = \"open\n  $ \n}";
    let err = parse(source).expect_err("Expected lexing to fail");

    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, vec![ErrorCode::E001, ErrorCode::E002]);
}

#[test]
fn test_error_position() {
    let source = "BoundedContext A {\n    Aggregate {\n}";
    let err = parse(source).expect_err("Expected parsing to fail");

    let diagnostic = &err.diagnostics()[0];
    assert_eq!(diagnostic.code(), Some(ErrorCode::E100));
    assert_eq!(
        diagnostic.position(source),
        Some(Position {
            line: 2,
            column: 15
        })
    );
}

#[test]
fn test_duplicate_context_map() {
    let err = parse("ContextMap A { } ContextMap B { }").expect_err("Expected check to fail");
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E103));
}

#[test]
fn test_parse_type_ref() {
    assert_eq!(
        parse_type_ref("BigDecimal").unwrap(),
        TypeRef::Named("BigDecimal".into())
    );
    assert_eq!(
        parse_type_ref("Set<Tag>").unwrap(),
        TypeRef::Collection(CollectionKind::Set, "Tag".into())
    );
    assert_eq!(
        parse_type_ref("- CustomerId").unwrap(),
        TypeRef::Reference("CustomerId".into())
    );

    let err = parse_type_ref("List<Set<String>>").unwrap_err();
    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E102));
    assert!(parse_type_ref("Map<String, Any>").is_err());
    assert!(parse_type_ref("").is_err());
}
