//! Model building for parsed documents.
//!
//! This module walks the concrete syntax tree produced by the parser and
//! builds the application-level [`Model`]. The walk is total: a document that
//! parsed and passed the structural checks always builds.
//!
//! Block bodies are lists of items in source order, so the builder folds them
//! into records: scalar properties keep the last value written, list
//! properties (responsibilities, `contains`, exposed aggregates) append, and
//! relationship pattern lists drop repeats.

use log::{debug, trace};

use ctxmap_core::{
    identity::Identified,
    model::{
        Aggregate, Attribute, BoundedContext, Command, ContextMap, DomainEvent, DomainService,
        Entity, Model, Module, Operation, Relationship, SymmetricRelationship,
        UpstreamDownstreamRelationship, ValueObject,
    },
};

use crate::parser_types::{
    AggregateDecl, AggregateItem, AttributeDecl, BoundedContextDecl, BoundedContextItem,
    ContextMapDecl, ContextMapItem, Declaration, Document, EntityDecl, EntityMember, ModuleDecl,
    ObjectDecl, OperationDecl, RelationshipDecl, RelationshipItem, ServiceDecl,
};

/// Builds a [`Model`] from a parsed [`Document`].
///
/// Parsed documents carry no model name; the built model's name is empty.
#[derive(Debug, Default)]
pub struct Builder;

impl Builder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(self, document: &Document<'_>) -> Model {
        debug!(declarations = document.declarations.len(); "Building model");

        let mut model = Model::default();

        for declaration in &document.declarations {
            match declaration {
                Declaration::ContextMap(map) => {
                    model.context_map = Some(Identified::new(Self::build_context_map(map)));
                }
                Declaration::BoundedContext(context) => {
                    model
                        .bounded_contexts
                        .push(Identified::new(Self::build_bounded_context(context)));
                }
            }
        }

        debug!(
            bounded_contexts = model.bounded_contexts.len(),
            has_context_map = model.context_map.is_some();
            "Model built",
        );
        model
    }

    // ============================================================================
    // Context map
    // ============================================================================

    fn build_context_map(decl: &ContextMapDecl<'_>) -> ContextMap {
        let mut map = ContextMap {
            name: decl.name.as_ref().map(|name| name.inner().to_string()),
            ..ContextMap::default()
        };

        for item in &decl.items {
            match item {
                ContextMapItem::Type(map_type) => map.map_type = Some(map_type.inner().to_string()),
                ContextMapItem::State(state) => map.state = *state.inner(),
                ContextMapItem::Contains(names) => map
                    .contains
                    .extend(names.iter().map(|name| name.inner().to_string())),
                ContextMapItem::Relationship(relationship) => map
                    .relationships
                    .push(Identified::new(Self::build_relationship(relationship))),
            }
        }

        trace!(
            relationships = map.relationships.len(),
            contains = map.contains.len();
            "Built context map",
        );
        map
    }

    fn build_relationship(decl: &RelationshipDecl<'_>) -> Relationship {
        match decl {
            RelationshipDecl::Symmetric { kind, left, right } => {
                SymmetricRelationship::new(*kind.inner(), *left.inner(), *right.inner()).into()
            }
            RelationshipDecl::UpstreamDownstream {
                upstream,
                downstream,
                upstream_patterns,
                downstream_patterns,
                body,
            } => {
                let mut relationship =
                    UpstreamDownstreamRelationship::new(*upstream.inner(), *downstream.inner());

                for pattern in upstream_patterns {
                    relationship.add_upstream_pattern(*pattern.inner());
                }
                for pattern in downstream_patterns {
                    relationship.add_downstream_pattern(*pattern.inner());
                }

                for item in body {
                    match item {
                        RelationshipItem::ExposedAggregates(names) => relationship
                            .exposed_aggregates
                            .extend(names.iter().map(|name| name.inner().to_string())),
                        RelationshipItem::ImplementationTechnology(technology) => {
                            relationship.implementation_technology =
                                Some(technology.inner().clone());
                        }
                    }
                }

                relationship.into()
            }
        }
    }

    // ============================================================================
    // Bounded contexts, modules and aggregates
    // ============================================================================

    fn build_bounded_context(decl: &BoundedContextDecl<'_>) -> BoundedContext {
        let mut context = BoundedContext::new(*decl.name.inner());

        for item in &decl.items {
            match item {
                BoundedContextItem::VisionStatement(statement) => {
                    context.vision_statement = Some(statement.inner().clone());
                }
                BoundedContextItem::Responsibilities(responsibilities) => context
                    .responsibilities
                    .extend(responsibilities.iter().map(|r| r.inner().clone())),
                BoundedContextItem::ImplementationTechnology(technology) => {
                    context.implementation_technology = Some(technology.inner().clone());
                }
                BoundedContextItem::KnowledgeLevel(level) => {
                    context.knowledge_level = Some(*level.inner());
                }
                BoundedContextItem::Type(context_type) => {
                    context.context_type = Some(*context_type.inner());
                }
                BoundedContextItem::Aggregate(aggregate) => context
                    .aggregates
                    .push(Identified::new(Self::build_aggregate(aggregate))),
                BoundedContextItem::Module(module) => context
                    .modules
                    .push(Identified::new(Self::build_module(module))),
            }
        }

        trace!(
            name = context.name.as_str(),
            aggregates = context.aggregates.len(),
            modules = context.modules.len();
            "Built bounded context",
        );
        context
    }

    fn build_module(decl: &ModuleDecl<'_>) -> Module {
        let mut module = Module::new(*decl.name.inner());
        module.aggregates = decl
            .aggregates
            .iter()
            .map(|aggregate| Identified::new(Self::build_aggregate(aggregate)))
            .collect();
        module
    }

    fn build_aggregate(decl: &AggregateDecl<'_>) -> Aggregate {
        let mut aggregate = Aggregate::new(*decl.name.inner());

        for item in &decl.items {
            match item {
                AggregateItem::Responsibilities(responsibilities) => aggregate
                    .responsibilities
                    .extend(responsibilities.iter().map(|r| r.inner().clone())),
                AggregateItem::KnowledgeLevel(level) => {
                    aggregate.knowledge_level = Some(*level.inner());
                }
                AggregateItem::Entity(entity) => aggregate
                    .entities
                    .push(Identified::new(Self::build_entity(entity))),
                AggregateItem::ValueObject(object) => {
                    let mut value_object = ValueObject::new(*object.name.inner());
                    value_object.attributes = Self::build_attributes(object);
                    aggregate.value_objects.push(Identified::new(value_object));
                }
                AggregateItem::DomainEvent(object) => {
                    let mut event = DomainEvent::new(*object.name.inner());
                    event.attributes = Self::build_attributes(object);
                    aggregate.domain_events.push(Identified::new(event));
                }
                AggregateItem::Command(object) => {
                    let mut command = Command::new(*object.name.inner());
                    command.attributes = Self::build_attributes(object);
                    aggregate.commands.push(Identified::new(command));
                }
                AggregateItem::Service(service) => aggregate
                    .services
                    .push(Identified::new(Self::build_service(service))),
            }
        }

        aggregate
    }

    // ============================================================================
    // Domain objects
    // ============================================================================

    fn build_entity(decl: &EntityDecl<'_>) -> Entity {
        let mut entity = Entity::new(*decl.name.inner());

        for member in &decl.members {
            match member {
                EntityMember::AggregateRoot => entity.aggregate_root = true,
                EntityMember::Attribute(attribute) => {
                    entity.attributes.push(Self::build_attribute(attribute));
                }
                EntityMember::Operation(operation) => {
                    entity.operations.push(Self::build_operation(operation));
                }
            }
        }

        entity
    }

    fn build_attributes(decl: &ObjectDecl<'_>) -> Vec<Attribute> {
        decl.attributes.iter().map(Self::build_attribute).collect()
    }

    fn build_attribute(decl: &AttributeDecl<'_>) -> Attribute {
        Attribute {
            name: decl.name.inner().to_string(),
            type_name: decl.type_ref.inner().to_string(),
            key: decl.key,
            nullable: decl.nullable,
        }
    }

    fn build_service(decl: &ServiceDecl<'_>) -> DomainService {
        let mut service = DomainService::new(*decl.name.inner());
        service.operations = decl.operations.iter().map(Self::build_operation).collect();
        service
    }

    fn build_operation(decl: &OperationDecl<'_>) -> Operation {
        let mut operation = Operation::new(*decl.name.inner());
        if let Some(return_type) = &decl.return_type {
            operation = operation.returning(return_type.inner().to_string());
        }
        decl.parameters.iter().fold(operation, |operation, parameter| {
            operation.with_parameter(
                parameter.type_ref.inner().to_string(),
                *parameter.name.inner(),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use ctxmap_core::model::{
        ContextMapState, ContextType, DownstreamPattern, KnowledgeLevel, SymmetricKind,
        UpstreamPattern,
    };

    use super::*;
    use crate::{lexer::tokenize, parser::build_document};

    fn build(source: &str) -> Model {
        let tokens = tokenize(source).expect("Failed to tokenize input");
        let document = build_document(&tokens).expect("Failed to parse input");
        Builder::new().build(document.inner())
    }

    #[test]
    fn test_empty_document() {
        let model = build("");
        assert!(model.name.is_empty());
        assert!(model.context_map.is_none());
        assert!(model.bounded_contexts.is_empty());
    }

    #[test]
    fn test_context_map_defaults_and_properties() {
        let model = build("ContextMap { contains A }");
        let map = model.context_map.unwrap();
        assert_eq!(map.name, None);
        assert_eq!(map.map_type, None);
        assert_eq!(map.state, ContextMapState::AsIs);
        assert_eq!(map.contains, vec!["A".to_string()]);

        let model = build(
            "ContextMap Landscape {
                type = SYSTEM_LANDSCAPE
                state = AS_IS
                state = TO_BE
                contains A, B
                contains C
            }",
        );
        let map = model.context_map.unwrap();
        assert_eq!(map.name.as_deref(), Some("Landscape"));
        assert_eq!(map.map_type.as_deref(), Some("SYSTEM_LANDSCAPE"));
        assert_eq!(map.state, ContextMapState::ToBe);
        assert_eq!(map.contains, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_relationships() {
        let model = build(
            "ContextMap {
                A Partnership B
                A [SK]<->[SK] C
                A [U,OHS,PL,OHS]->[D,ACL] B {
                    exposedAggregates = Orders
                    exposedAggregates = Invoices
                    implementationTechnology = \"REST\"
                }
                C [D,CF]<-[U] A
            }",
        );
        let map = model.context_map.unwrap();
        assert_eq!(map.relationships.len(), 4);

        assert_eq!(
            *map.relationships[0].inner(),
            Relationship::from(SymmetricRelationship::new(SymmetricKind::Partnership, "A", "B"))
        );
        assert_eq!(
            *map.relationships[1].inner(),
            Relationship::from(SymmetricRelationship::new(SymmetricKind::SharedKernel, "A", "C"))
        );

        match map.relationships[2].inner() {
            Relationship::UpstreamDownstream(rel) => {
                assert_eq!(rel.upstream, "A");
                assert_eq!(rel.downstream, "B");
                assert_eq!(
                    rel.upstream_patterns,
                    vec![UpstreamPattern::OpenHostService, UpstreamPattern::PublishedLanguage]
                );
                assert_eq!(rel.downstream_patterns, vec![DownstreamPattern::AntiCorruptionLayer]);
                assert_eq!(rel.exposed_aggregates, vec!["Orders", "Invoices"]);
                assert_eq!(rel.implementation_technology.as_deref(), Some("REST"));
            }
            other => panic!("expected upstream-downstream relationship, got {other:?}"),
        }

        match map.relationships[3].inner() {
            Relationship::UpstreamDownstream(rel) => {
                assert_eq!(rel.upstream, "A");
                assert_eq!(rel.downstream, "C");
                assert!(rel.upstream_patterns.is_empty());
                assert_eq!(rel.downstream_patterns, vec![DownstreamPattern::Conformist]);
            }
            other => panic!("expected upstream-downstream relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_bounded_context_properties() {
        let model = build(
            r#"BoundedContext Sales {
                domainVisionStatement = "first"
                responsibilities = "Orders"
                type = FEATURE
                domainVisionStatement = "Sell things"
                responsibilities = "Invoices", "Refunds"
                implementationTechnology = "Rust"
                knowledgeLevel = CONCRETE
            }"#,
        );
        let context = &model.bounded_contexts[0];
        assert_eq!(context.name, "Sales");
        assert_eq!(context.vision_statement.as_deref(), Some("Sell things"));
        assert_eq!(context.responsibilities, vec!["Orders", "Invoices", "Refunds"]);
        assert_eq!(context.implementation_technology.as_deref(), Some("Rust"));
        assert_eq!(context.knowledge_level, Some(KnowledgeLevel::Concrete));
        assert_eq!(context.context_type, Some(ContextType::Feature));
    }

    #[test]
    fn test_aggregate_contents() {
        let model = build(
            "BoundedContext Sales {
                Module billing {
                    Aggregate Invoice { Entity Invoice { aggregateRoot } }
                }
                Aggregate Orders {
                    responsibilities = \"Orders\"
                    knowledgeLevel = META
                    Entity Order {
                        aggregateRoot
                        - OrderId orderId key
                        List<OrderLine> lines
                        String note nullable
                        def Money total(String currency);
                    }
                    ValueObject OrderId { String value }
                    DomainEvent OrderPlaced
                    Command PlaceOrder { - OrderId orderId }
                    Service Pricing { def Money quote(- OrderId order, int quantity); }
                }
            }",
        );
        let context = &model.bounded_contexts[0];
        assert_eq!(context.modules.len(), 1);
        assert_eq!(context.modules[0].name, "billing");
        assert_eq!(context.modules[0].aggregates[0].name, "Invoice");

        let aggregate = context.aggregate("Orders").unwrap();
        assert_eq!(aggregate.responsibilities, vec!["Orders"]);
        assert_eq!(aggregate.knowledge_level, Some(KnowledgeLevel::Meta));

        let order = &aggregate.entities[0];
        assert!(order.aggregate_root);
        assert_eq!(
            order.attributes,
            vec![
                Attribute::new("- OrderId", "orderId").key(),
                Attribute::new("List<OrderLine>", "lines"),
                Attribute::new("String", "note").nullable(),
            ]
        );
        assert_eq!(
            order.operations,
            vec![Operation::new("total").returning("Money").with_parameter("String", "currency")]
        );

        assert_eq!(aggregate.value_objects[0].attributes.len(), 1);
        assert_eq!(aggregate.domain_events[0].name, "OrderPlaced");
        assert!(aggregate.domain_events[0].attributes.is_empty());
        assert_eq!(aggregate.commands[0].attributes[0].type_name, "- OrderId");

        let quote = &aggregate.services[0].operations[0];
        assert_eq!(quote.parameters.len(), 2);
        assert_eq!(quote.parameters[1].name, "quantity");
    }

    #[test]
    fn test_first_root_wins() {
        let model = build(
            "BoundedContext A { Aggregate Agg {
                Entity First
                Entity Second { aggregateRoot }
                Entity Third { aggregateRoot }
            } }",
        );
        let aggregate = &model.bounded_contexts[0].aggregates[0];
        assert_eq!(aggregate.aggregate_root().unwrap().name, "Second");
        assert_eq!(aggregate.entities.iter().filter(|e| e.aggregate_root).count(), 2);
    }

    #[test]
    fn test_identities_are_fresh() {
        let model = build("BoundedContext A { } BoundedContext B { }");
        assert_ne!(model.bounded_contexts[0].id(), model.bounded_contexts[1].id());

        let again = build("BoundedContext A { } BoundedContext B { }");
        assert_eq!(model, again);
        assert_ne!(model.bounded_contexts[0].id(), again.bounded_contexts[0].id());
    }
}
