//! End-to-end behaviour of parsing, validating, editing and writing.

use ctxmap::{
    guards::{reserved_domain_object_name, validate_attribute_type},
    model::{Attribute, Entity, ValueObject},
    session::{EditError, Session},
    validate::ValidationCode,
};

const SHOP: &str = r#"
ContextMap Shop {
    type = SYSTEM_LANDSCAPE
    state = TO_BE
    contains Sales, Billing, Support

    Sales [SK]<->[SK] Support
    Billing [D,ACL] <- [U,OHS,PL] Sales {
        exposedAggregates = Orders
        implementationTechnology = "REST"
    }
}

BoundedContext Sales {
    domainVisionStatement = "Takes \"orders\""
    responsibilities = "Orders", "Pricing"
    type = FEATURE

    Aggregate Orders {
        Entity Order {
            aggregateRoot
            - OrderId orderId key
            List<OrderLine> lines
            String ^query nullable
            def Money total(String currency);
        }
        ValueObject OrderId { String value }
        ValueObject OrderLine { int quantity }
        DomainEvent OrderPlaced { - OrderId order }
        Command PlaceOrder
        Service Pricing {
            def quote(- OrderId order);
        }
    }

    Module pricing {
        Aggregate Catalog {
            Entity Product { aggregateRoot String ^type }
        }
    }
}

BoundedContext Billing {
    knowledgeLevel = CONCRETE
    Aggregate Invoices { }
}

BoundedContext Support { }
"#;

#[test]
fn test_round_trip() {
    let model = ctxmap::parse(SHOP).expect("Failed to parse");
    let text = ctxmap::serialize(&model);
    let reparsed = ctxmap::parse(&text).expect("Failed to parse written text");
    assert_eq!(reparsed, model);
}

#[test]
fn test_serialization_is_idempotent() {
    let model = ctxmap::parse(SHOP).expect("Failed to parse");
    let first = ctxmap::serialize(&model);
    let second = ctxmap::serialize(&ctxmap::parse(&first).expect("Failed to reparse"));
    assert_eq!(first, second);
}

#[test]
fn test_reverse_arrow_is_written_forward() {
    let model = ctxmap::parse(SHOP).expect("Failed to parse");
    let text = ctxmap::serialize(&model);
    assert!(text.contains("Sales [U,OHS,PL] -> [D,ACL] Billing {"));
    assert!(text.contains("Sales SharedKernel Support"));
}

#[test]
fn test_keyword_prefix_is_one_identifier() {
    let model = ctxmap::parse("BoundedContext ServiceNowPlatform { Aggregate EntityStore { } }")
        .expect("Failed to parse");
    assert_eq!(model.bounded_contexts[0].name, "ServiceNowPlatform");
    assert_eq!(model.bounded_contexts[0].aggregates[0].name, "EntityStore");
}

#[test]
fn test_escaped_attribute_names_round_trip() {
    let model = ctxmap::parse(SHOP).expect("Failed to parse");
    let order = &model.bounded_contexts[0].aggregates[0].entities[0];
    assert_eq!(order.attributes[2].name, "query");
    assert!(order.attributes[2].nullable);

    let text = ctxmap::serialize(&model);
    assert!(text.contains("String ^query nullable"));
    assert!(text.contains("String ^type"));
}

#[test]
fn test_shop_is_valid() {
    let model = ctxmap::parse(SHOP).expect("Failed to parse");
    let report = ctxmap::validate(&model);
    assert!(report.is_empty(), "unexpected findings: {:?}", report.findings());
}

#[test]
fn test_cross_context_duplicate_detection() {
    let model = ctxmap::parse(
        r#"
        BoundedContext Sales { Aggregate Agents { ValueObject AgentId } }
        BoundedContext Support { Aggregate Tickets { ValueObject AgentId } }
        "#,
    )
    .expect("Failed to parse");

    let report = ctxmap::validate(&model);
    assert!(!report.is_valid());

    let duplicates: Vec<_> = report
        .errors()
        .filter(|f| f.message().contains("AgentId"))
        .collect();
    assert_eq!(duplicates.len(), 1);
    assert_eq!(duplicates[0].code(), ValidationCode::E206);
    assert!(duplicates[0].message().contains("'Sales'"));
    assert!(duplicates[0].message().contains("'Support'"));
}

#[test]
fn test_reserved_name_rejection() {
    let reserved = reserved_domain_object_name("rEsOuRcE").expect("Expected reserved name");
    assert!(!reserved.suggestions.is_empty());

    let mut session = Session::new();
    session.add_bounded_context("Sales").unwrap();
    for name in ["Resource", "resource", "RESOURCE"] {
        let err = session.add_aggregate("Sales", None, name).unwrap_err();
        assert!(matches!(err, EditError::ReservedName { .. }));
        assert!(err.suggestion().is_some());
    }
    assert!(session.model().bounded_contexts[0].aggregates.is_empty());
}

#[test]
fn test_invalid_type_rejection() {
    assert!(validate_attribute_type("Map<String, Any>").is_err());
    assert!(validate_attribute_type("List<Set<String>>").is_err());
    assert!(validate_attribute_type("List<String>").is_ok());
    assert!(validate_attribute_type("- CustomerId").is_ok());
    assert!(validate_attribute_type("BigDecimal").is_ok());
}

#[test]
fn test_aggregate_root_cardinality() {
    let model = ctxmap::parse(
        r#"
        BoundedContext Sales {
            Aggregate Orders {
                Entity Order { aggregateRoot }
                Entity Invoice { aggregateRoot }
            }
        }
        "#,
    )
    .expect("Failed to parse");

    let aggregate = &model.bounded_contexts[0].aggregates[0];
    assert_eq!(aggregate.aggregate_root().unwrap().name, "Order");

    let report = ctxmap::validate(&model);
    let codes: Vec<_> = report.findings().iter().map(|f| f.code()).collect();
    assert_eq!(codes, vec![ValidationCode::E204]);
}

#[test]
fn test_order_scenario_through_session() {
    let mut session = Session::new();
    session.add_bounded_context("Sales").unwrap();
    session.add_aggregate("Sales", None, "Orders").unwrap();
    session
        .add_entity(
            "Sales",
            "Orders",
            Entity::new("Order")
                .as_root()
                .with_attribute(Attribute::new("- OrderId", "orderId").key())
                .with_attribute(Attribute::new("String", "status")),
        )
        .unwrap();
    session
        .add_value_object(
            "Sales",
            "Orders",
            ValueObject::new("OrderId").with_attribute(Attribute::new("String", "value")),
        )
        .unwrap();

    let model = session.into_model();
    assert!(ctxmap::validate(&model).is_empty());

    let expected = "\
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
";
    let text = ctxmap::serialize(&model);
    assert_eq!(text, expected);
    assert_eq!(ctxmap::parse(&text).unwrap(), model);
}

#[test]
fn test_session_types_round_trip() {
    let mut session = Session::new();
    session.add_bounded_context("Sales").unwrap();
    session.add_aggregate("Sales", None, "Customers").unwrap();
    session
        .add_entity(
            "Sales",
            "Customers",
            Entity::new("Customer")
                .as_root()
                .with_attribute(Attribute::new("-CustomerId", "customer"))
                .with_attribute(Attribute::new("Set <  String>", "tags")),
        )
        .unwrap();

    let model = session.into_model();
    let customer = &model.bounded_contexts[0].aggregates[0].entities[0];
    assert_eq!(customer.attributes[0].type_name, "- CustomerId");
    assert_eq!(customer.attributes[1].type_name, "Set<String>");

    let text = ctxmap::serialize(&model);
    assert_eq!(ctxmap::parse(&text).unwrap(), model);
}
