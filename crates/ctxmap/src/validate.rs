//! Whole-model validation.
//!
//! [`validate`] checks a [`Model`] against the structural rules of the
//! language and returns every problem it finds as a [`Finding`]. Validation
//! never stops at the first problem and never modifies the model.
//!
//! ## Rules
//!
//! - **Unique names**: bounded contexts (E200), aggregates per bounded
//!   context (E201), entities and value objects per aggregate (E202, E203)
//! - **Aggregate roots**: at most one (E204), and one whenever the aggregate
//!   has entities (E205, warning)
//! - **Model-wide domain object names** (E206): entities, value objects,
//!   domain events and commands share one namespace across all contexts
//! - **Context map references** (E207 to E210)
//! - **Types** (E211) and **reserved names** (E212)

mod report;

pub use report::{Finding, Location, ValidationCode, ValidationReport};

use std::collections::HashSet;

use indexmap::IndexMap;
use log::debug;

use ctxmap_core::model::{
    Aggregate, Attribute, BoundedContext, Command, ContextMap, DomainEvent, DomainObjectKind,
    DomainService, Entity, Model, Module, Operation, Relationship, ValueObject,
};

use crate::guards;

/// Visitor trait for read-only traversal of a [`Model`].
///
/// Default implementations walk into child elements through the `walk_*`
/// functions, so implementors override only the elements they inspect and
/// call the matching `walk_*` function to keep descending.
pub trait Visitor {
    fn visit_model(&mut self, model: &Model) {
        walk_model(self, model);
    }

    fn visit_context_map(&mut self, _map: &ContextMap, _location: &Location) {}

    fn visit_bounded_context(&mut self, context: &BoundedContext, location: &Location) {
        walk_bounded_context(self, context, location);
    }

    fn visit_module(&mut self, module: &Module, location: &Location) {
        walk_module(self, module, location);
    }

    fn visit_aggregate(&mut self, aggregate: &Aggregate, location: &Location) {
        walk_aggregate(self, aggregate, location);
    }

    fn visit_entity(&mut self, entity: &Entity, location: &Location) {
        walk_entity(self, entity, location);
    }

    fn visit_value_object(&mut self, object: &ValueObject, location: &Location) {
        walk_attributes(self, &object.attributes, location);
    }

    fn visit_domain_event(&mut self, event: &DomainEvent, location: &Location) {
        walk_attributes(self, &event.attributes, location);
    }

    fn visit_command(&mut self, command: &Command, location: &Location) {
        walk_attributes(self, &command.attributes, location);
    }

    fn visit_service(&mut self, service: &DomainService, location: &Location) {
        for operation in &service.operations {
            self.visit_operation(operation, location);
        }
    }

    fn visit_attribute(&mut self, _attribute: &Attribute, _location: &Location) {}

    fn visit_operation(&mut self, _operation: &Operation, _location: &Location) {}
}

pub fn walk_model<V: Visitor + ?Sized>(visitor: &mut V, model: &Model) {
    if let Some(map) = &model.context_map {
        visitor.visit_context_map(map, &context_map_location(map));
    }
    for context in &model.bounded_contexts {
        let location = Location::root().child("BoundedContext", &context.name);
        visitor.visit_bounded_context(context, &location);
    }
}

pub fn walk_bounded_context<V: Visitor + ?Sized>(
    visitor: &mut V,
    context: &BoundedContext,
    location: &Location,
) {
    for aggregate in &context.aggregates {
        visitor.visit_aggregate(aggregate, &location.child("Aggregate", &aggregate.name));
    }
    for module in &context.modules {
        visitor.visit_module(module, &location.child("Module", &module.name));
    }
}

pub fn walk_module<V: Visitor + ?Sized>(visitor: &mut V, module: &Module, location: &Location) {
    for aggregate in &module.aggregates {
        visitor.visit_aggregate(aggregate, &location.child("Aggregate", &aggregate.name));
    }
}

pub fn walk_aggregate<V: Visitor + ?Sized>(
    visitor: &mut V,
    aggregate: &Aggregate,
    location: &Location,
) {
    for entity in &aggregate.entities {
        visitor.visit_entity(entity, &location.child("Entity", &entity.name));
    }
    for object in &aggregate.value_objects {
        visitor.visit_value_object(object, &location.child("ValueObject", &object.name));
    }
    for event in &aggregate.domain_events {
        visitor.visit_domain_event(event, &location.child("DomainEvent", &event.name));
    }
    for command in &aggregate.commands {
        visitor.visit_command(command, &location.child("Command", &command.name));
    }
    for service in &aggregate.services {
        visitor.visit_service(service, &location.child("Service", &service.name));
    }
}

pub fn walk_entity<V: Visitor + ?Sized>(visitor: &mut V, entity: &Entity, location: &Location) {
    walk_attributes(visitor, &entity.attributes, location);
    for operation in &entity.operations {
        visitor.visit_operation(operation, location);
    }
}

pub fn walk_attributes<V: Visitor + ?Sized>(
    visitor: &mut V,
    attributes: &[Attribute],
    location: &Location,
) {
    for attribute in attributes {
        visitor.visit_attribute(attribute, location);
    }
}

fn context_map_location(map: &ContextMap) -> Location {
    Location::root().child("ContextMap", map.name.as_deref().unwrap_or_default())
}

/// Names that occur more than once, with their counts, in first-seen order.
fn duplicates<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<(&'a str, usize)> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for name in names {
        *counts.entry(name).or_default() += 1;
    }
    counts.into_iter().filter(|(_, count)| *count > 1).collect()
}

/// Validates `model` and returns every finding.
///
/// # Examples
///
/// ```
/// use ctxmap::validate::{ValidationCode, validate};
///
/// let model = ctxmap::parse(
///     "BoundedContext Sales { } BoundedContext Sales { }",
/// ).unwrap();
///
/// let report = validate(&model);
/// assert!(!report.is_valid());
/// assert_eq!(report.findings()[0].code(), ValidationCode::E200);
/// ```
pub fn validate(model: &Model) -> ValidationReport {
    let mut findings = Vec::new();

    check_bounded_context_names(model, &mut findings);

    let mut structure = StructureRules::default();
    structure.visit_model(model);
    findings.append(&mut structure.findings);

    check_domain_object_names(model, &mut findings);

    if let Some(map) = &model.context_map {
        check_context_map(model, map, &mut findings);
    }

    let mut declarations = DeclarationRules::default();
    declarations.visit_model(model);
    findings.append(&mut declarations.type_findings);
    findings.append(&mut declarations.name_findings);

    let report = ValidationReport::new(findings);
    debug!(
        errors = report.errors().count(),
        warnings = report.warnings().count();
        "Model validated"
    );
    report
}

fn check_bounded_context_names(model: &Model, findings: &mut Vec<Finding>) {
    let names = model.bounded_contexts.iter().map(|c| c.name.as_str());
    for (name, count) in duplicates(names) {
        findings.push(
            Finding::error(
                ValidationCode::E200,
                format!("bounded context `{name}` is declared {count} times"),
                Location::root().child("BoundedContext", name),
            )
            .with_suggestion("merge the declarations or rename all but one"),
        );
    }
}

/// Uniqueness and root rules inside bounded contexts and aggregates.
#[derive(Default)]
struct StructureRules {
    findings: Vec<Finding>,
}

impl Visitor for StructureRules {
    fn visit_bounded_context(&mut self, context: &BoundedContext, location: &Location) {
        let names = context.all_aggregates().map(|(_, a)| a.name.as_str());
        for (name, count) in duplicates(names) {
            self.findings.push(Finding::error(
                ValidationCode::E201,
                format!(
                    "aggregate `{name}` is declared {count} times in bounded context `{}`",
                    context.name
                ),
                location.clone(),
            ));
        }
        walk_bounded_context(self, context, location);
    }

    fn visit_aggregate(&mut self, aggregate: &Aggregate, location: &Location) {
        let entities = aggregate.entities.iter().map(|e| e.name.as_str());
        for (name, count) in duplicates(entities) {
            self.findings.push(Finding::error(
                ValidationCode::E202,
                format!("entity `{name}` is declared {count} times"),
                location.clone(),
            ));
        }

        let value_objects = aggregate.value_objects.iter().map(|v| v.name.as_str());
        for (name, count) in duplicates(value_objects) {
            self.findings.push(Finding::error(
                ValidationCode::E203,
                format!("value object `{name}` is declared {count} times"),
                location.clone(),
            ));
        }

        let roots: Vec<&str> = aggregate
            .entities
            .iter()
            .filter(|e| e.aggregate_root)
            .map(|e| e.name.as_str())
            .collect();
        if roots.len() > 1 {
            self.findings.push(
                Finding::error(
                    ValidationCode::E204,
                    format!(
                        "aggregate `{}` has {} aggregate roots: {}",
                        aggregate.name,
                        roots.len(),
                        roots.join(", ")
                    ),
                    location.clone(),
                )
                .with_suggestion(format!("keep `aggregateRoot` on `{}` only", roots[0])),
            );
        } else if roots.is_empty() && !aggregate.entities.is_empty() {
            self.findings.push(
                Finding::warning(
                    ValidationCode::E205,
                    format!(
                        "aggregate `{}` has entities but no aggregate root",
                        aggregate.name
                    ),
                    location.clone(),
                )
                .with_suggestion("mark one entity with `aggregateRoot`"),
            );
        }
    }
}

/// Where one domain object name occurs.
struct Occurrence<'a> {
    kind: DomainObjectKind,
    context: &'a str,
    aggregate: Location,
}

fn check_domain_object_names(model: &Model, findings: &mut Vec<Finding>) {
    let mut index: IndexMap<&str, Vec<Occurrence<'_>>> = IndexMap::new();
    for context in &model.bounded_contexts {
        let context_location = Location::root().child("BoundedContext", &context.name);
        for (module, aggregate) in context.all_aggregates() {
            let parent = match module {
                Some(module) => context_location.child("Module", module),
                None => context_location.clone(),
            };
            let aggregate_location = parent.child("Aggregate", &aggregate.name);
            for (kind, name) in aggregate.domain_objects() {
                index.entry(name).or_default().push(Occurrence {
                    kind,
                    context: &context.name,
                    aggregate: aggregate_location.clone(),
                });
            }
        }
    }

    for (name, occurrences) in &index {
        if occurrences.len() < 2 || reported_per_aggregate(occurrences) {
            continue;
        }

        let places = occurrences
            .iter()
            .map(|o| format!("{} in {}", o.kind, o.aggregate))
            .collect::<Vec<_>>()
            .join("; ");

        let mut renames: Vec<String> = Vec::new();
        for occurrence in occurrences {
            let rename = format!("{}{name}", occurrence.context);
            if !renames.contains(&rename) {
                renames.push(rename);
            }
        }

        findings.push(
            Finding::error(
                ValidationCode::E206,
                format!(
                    "domain object name `{name}` is used in {} places: {places}",
                    occurrences.len()
                ),
                occurrences[0].aggregate.clone(),
            )
            .with_suggestion(format!(
                "prefix the names with their bounded context, e.g. {}",
                renames
                    .iter()
                    .map(|r| format!("`{r}`"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        );
    }
}

/// Whether every occurrence is the same entity or value object kind inside
/// one aggregate. E202 and E203 report those, so E206 skips them.
fn reported_per_aggregate(occurrences: &[Occurrence<'_>]) -> bool {
    let first = &occurrences[0];
    matches!(
        first.kind,
        DomainObjectKind::Entity | DomainObjectKind::ValueObject
    ) && occurrences
        .iter()
        .all(|o| o.kind == first.kind && o.aggregate == first.aggregate)
}

fn check_context_map(model: &Model, map: &ContextMap, findings: &mut Vec<Finding>) {
    let known: HashSet<&str> = model
        .bounded_contexts
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let map_location = context_map_location(map);

    for name in &map.contains {
        if !known.contains(name.as_str()) {
            findings.push(unknown_context(name, "`contains`", map_location.clone()));
        }
    }

    for relationship in &map.relationships {
        let (first, second) = relationship.participants();
        let location = match relationship.inner() {
            Relationship::Symmetric(rel) => map_location.child(
                "Relationship",
                format!("{first} {} {second}", rel.kind),
            ),
            Relationship::UpstreamDownstream(_) => {
                map_location.child("Relationship", format!("{first} -> {second}"))
            }
        };

        if !known.contains(first) {
            findings.push(unknown_context(first, "relationship", location.clone()));
        }
        if second != first && !known.contains(second) {
            findings.push(unknown_context(second, "relationship", location.clone()));
        }
        match relationship.inner() {
            Relationship::Symmetric(rel) if relationship.is_self_relationship() => {
                findings.push(Finding::warning(
                    ValidationCode::E208,
                    format!(
                        "bounded context `{first}` has a {} relationship with itself",
                        rel.kind
                    ),
                    location,
                ));
            }
            Relationship::UpstreamDownstream(_) if relationship.is_self_relationship() => {
                findings.push(Finding::error(
                    ValidationCode::E209,
                    format!("bounded context `{first}` cannot be upstream of itself"),
                    location,
                ));
            }
            Relationship::UpstreamDownstream(rel) => {
                let Some(upstream) = model.bounded_context(&rel.upstream) else {
                    continue;
                };
                for exposed in &rel.exposed_aggregates {
                    if upstream.aggregate(exposed).is_none() {
                        findings.push(Finding::warning(
                            ValidationCode::E210,
                            format!(
                                "exposed aggregate `{exposed}` is not declared in upstream context `{}`",
                                rel.upstream
                            ),
                            location.clone(),
                        ));
                    }
                }
            }
            Relationship::Symmetric(_) => {}
        }
    }
}

fn unknown_context(name: &str, site: &str, location: Location) -> Finding {
    Finding::error(
        ValidationCode::E207,
        format!("{site} references unknown bounded context `{name}`"),
        location,
    )
    .with_suggestion(format!("declare `BoundedContext {name}` or fix the reference"))
}

/// Type and reserved-name checks on individual declarations.
#[derive(Default)]
struct DeclarationRules {
    type_findings: Vec<Finding>,
    name_findings: Vec<Finding>,
}

impl DeclarationRules {
    fn check_type(&mut self, type_name: &str, role: String, location: &Location) {
        if let Err(err) = guards::validate_attribute_type(type_name) {
            let mut finding = Finding::error(
                ValidationCode::E211,
                format!("invalid type for {role}: {err}"),
                location.clone(),
            );
            if let Some(suggestion) = err.suggestion() {
                finding = finding.with_suggestion(suggestion);
            }
            self.type_findings.push(finding);
        }
    }

    fn check_name(&mut self, kind: &str, name: &str, location: &Location) {
        if let Some(reserved) = guards::reserved_domain_object_name(name) {
            self.name_findings.push(
                Finding::error(
                    ValidationCode::E212,
                    format!("{kind} name `{name}` is reserved"),
                    location.clone(),
                )
                .with_suggestion(format!(
                    "rename it, e.g. to {}",
                    reserved.suggestions.join(", ")
                )),
            );
        }
    }
}

impl Visitor for DeclarationRules {
    fn visit_aggregate(&mut self, aggregate: &Aggregate, location: &Location) {
        self.check_name("Aggregate", &aggregate.name, location);
        walk_aggregate(self, aggregate, location);
    }

    fn visit_entity(&mut self, entity: &Entity, location: &Location) {
        self.check_name("Entity", &entity.name, location);
        walk_entity(self, entity, location);
    }

    fn visit_value_object(&mut self, object: &ValueObject, location: &Location) {
        self.check_name("ValueObject", &object.name, location);
        walk_attributes(self, &object.attributes, location);
    }

    fn visit_domain_event(&mut self, event: &DomainEvent, location: &Location) {
        self.check_name("DomainEvent", &event.name, location);
        walk_attributes(self, &event.attributes, location);
    }

    fn visit_command(&mut self, command: &Command, location: &Location) {
        self.check_name("Command", &command.name, location);
        walk_attributes(self, &command.attributes, location);
    }

    fn visit_service(&mut self, service: &DomainService, location: &Location) {
        self.check_name("Service", &service.name, location);
        for operation in &service.operations {
            self.visit_operation(operation, location);
        }
    }

    fn visit_attribute(&mut self, attribute: &Attribute, location: &Location) {
        self.check_type(
            &attribute.type_name,
            format!("attribute `{}`", attribute.name),
            location,
        );
    }

    fn visit_operation(&mut self, operation: &Operation, location: &Location) {
        if let Some(return_type) = &operation.return_type {
            self.check_type(
                return_type,
                format!("return value of `{}`", operation.name),
                location,
            );
        }
        for parameter in &operation.parameters {
            self.check_type(
                &parameter.type_name,
                format!("parameter `{}` of `{}`", parameter.name, operation.name),
                location,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use ctxmap_core::{
        identity::Identified,
        model::{SymmetricKind, SymmetricRelationship, UpstreamDownstreamRelationship},
    };

    use super::*;

    fn parse(source: &str) -> Model {
        ctxmap_parser::parse(source).expect("Failed to parse")
    }

    fn codes(report: &ValidationReport) -> Vec<ValidationCode> {
        report.findings().iter().map(|f| f.code()).collect()
    }

    #[test]
    fn test_valid_model_has_no_findings() {
        let model = parse(
            r#"
            ContextMap {
                contains Sales, Billing
                Sales [U,OHS] -> [D,ACL] Billing {
                    exposedAggregates = Orders
                }
            }
            BoundedContext Sales {
                Aggregate Orders {
                    Entity Order {
                        aggregateRoot
                        - OrderId orderId key
                        List<OrderLine> lines
                    }
                    ValueObject OrderId { String value }
                    ValueObject OrderLine { int quantity }
                }
            }
            BoundedContext Billing { }
            "#,
        );

        let report = validate(&model);
        assert!(report.is_empty(), "unexpected findings: {:?}", report.findings());
        assert!(report.is_valid());
    }

    #[test]
    fn test_duplicate_bounded_contexts() {
        let report = validate(&parse("BoundedContext A { } BoundedContext A { } BoundedContext A { }"));
        assert_eq!(codes(&report), vec![ValidationCode::E200]);
        assert!(report.findings()[0].message().contains("3 times"));
    }

    #[test]
    fn test_duplicate_aggregates_across_modules() {
        let report = validate(&parse(
            "BoundedContext Sales { Aggregate Orders { } Module m { Aggregate Orders { } } }",
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E201]);
        assert_eq!(
            report.findings()[0].location().to_string(),
            "BoundedContext 'Sales'"
        );
    }

    #[test]
    fn test_duplicate_entities_and_value_objects() {
        let report = validate(&parse(
            r#"BoundedContext S { Aggregate A {
                Entity E { aggregateRoot }
                Entity E
                ValueObject V
                ValueObject V
            } }"#,
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E202, ValidationCode::E203]);
    }

    #[test]
    fn test_root_cardinality() {
        let report = validate(&parse(
            r#"BoundedContext S {
                Aggregate Two { Entity A { aggregateRoot } Entity B { aggregateRoot } }
                Aggregate Rootless { Entity C }
                Aggregate Values { ValueObject V }
            }"#,
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E204, ValidationCode::E205]);
        assert!(report.findings()[0].severity().is_error());
        assert!(report.findings()[1].severity().is_warning());
        assert_eq!(
            report.findings()[1].location().to_string(),
            "BoundedContext 'S' > Aggregate 'Rootless'"
        );
    }

    #[test]
    fn test_cross_context_duplicate_names() {
        let report = validate(&parse(
            r#"
            BoundedContext Sales { Aggregate Agents { ValueObject AgentId } }
            BoundedContext Support { Module desk { Aggregate Tickets { ValueObject AgentId } } }
            "#,
        ));

        let findings: Vec<_> = report
            .errors()
            .filter(|f| f.code() == ValidationCode::E206)
            .collect();
        assert_eq!(findings.len(), 1);

        let message = findings[0].message();
        assert!(message.contains("AgentId"));
        assert!(message.contains("BoundedContext 'Sales' > Aggregate 'Agents'"));
        assert!(message.contains("BoundedContext 'Support' > Module 'desk' > Aggregate 'Tickets'"));

        let suggestion = findings[0].suggestion().unwrap();
        assert!(suggestion.contains("SalesAgentId"));
        assert!(suggestion.contains("SupportAgentId"));
    }

    #[test]
    fn test_same_aggregate_duplicates_are_not_reported_twice() {
        let report = validate(&parse(
            "BoundedContext S { Aggregate A { ValueObject V ValueObject V } }",
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E203]);
    }

    #[test]
    fn test_mixed_kinds_in_one_aggregate_collide() {
        let report = validate(&parse(
            "BoundedContext S { Aggregate A { ValueObject Paid DomainEvent Paid } }",
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E206]);
    }

    #[test]
    fn test_context_map_references() {
        let report = validate(&parse(
            r#"
            ContextMap {
                contains Sales, Ghost
                Sales [SK]<->[SK] Sales
                Sales [U] -> [D] Sales
                Sales [U] -> [D] Phantom
                Sales [U] -> [D] Billing { exposedAggregates = Orders, Missing }
            }
            BoundedContext Sales { Aggregate Orders { } }
            BoundedContext Billing { }
            "#,
        ));

        assert_eq!(
            codes(&report),
            vec![
                ValidationCode::E207,
                ValidationCode::E208,
                ValidationCode::E209,
                ValidationCode::E207,
                ValidationCode::E210,
            ]
        );
        assert!(report.findings()[0].message().contains("Ghost"));
        assert!(report.findings()[3].message().contains("Phantom"));
        assert!(report.findings()[4].message().contains("Missing"));
        assert_eq!(
            report.findings()[4].location().to_string(),
            "ContextMap > Relationship 'Sales -> Billing'"
        );
    }

    #[test]
    fn test_unknown_self_relationship_reported_once() {
        let report = validate(&parse(
            r#"
            ContextMap {
                Ghost [U] -> [D] Ghost
                Phantom [P]<->[P] Phantom
            }
            "#,
        ));

        assert_eq!(
            codes(&report),
            vec![
                ValidationCode::E207,
                ValidationCode::E209,
                ValidationCode::E207,
                ValidationCode::E208,
            ]
        );
        assert!(report.findings()[0].message().contains("Ghost"));
        assert!(report.findings()[2].message().contains("Phantom"));
    }

    #[test]
    fn test_invalid_types() {
        let mut entity = Entity::new("Order").as_root();
        entity.attributes.push(Attribute::new("Map<String, Any>", "data"));
        entity
            .operations
            .push(Operation::new("lines").returning("List<Set<String>>"));
        let mut aggregate = Aggregate::new("Orders");
        aggregate.entities.push(Identified::new(entity));
        let mut context = BoundedContext::new("Sales");
        context.aggregates.push(Identified::new(aggregate));
        let mut model = Model::default();
        model.bounded_contexts.push(Identified::new(context));

        let report = validate(&model);
        assert_eq!(codes(&report), vec![ValidationCode::E211, ValidationCode::E211]);
        assert!(report.findings()[0].message().contains("attribute `data`"));
        assert!(report.findings()[1].message().contains("nested generic"));
        assert!(report.findings().iter().all(|f| f.suggestion().is_some()));
    }

    #[test]
    fn test_reserved_names() {
        let report = validate(&parse(
            "BoundedContext S { Aggregate ^Resource { Entity ^entity { aggregateRoot } Service Helper } }",
        ));
        assert_eq!(codes(&report), vec![ValidationCode::E212, ValidationCode::E212]);
        assert!(report.findings()[0].message().contains("Aggregate name `Resource`"));
        assert!(report.findings()[1].suggestion().unwrap().contains("EntityItem"));
    }

    #[test]
    fn test_relationship_location_names_the_pattern() {
        let mut map = ContextMap::default();
        map.relationships.push(Identified::new(
            SymmetricRelationship::new(SymmetricKind::Partnership, "A", "A").into(),
        ));
        map.relationships.push(Identified::new(
            UpstreamDownstreamRelationship::new("A", "B").into(),
        ));
        let model = Model {
            context_map: Some(Identified::new(map)),
            bounded_contexts: vec![
                Identified::new(BoundedContext::new("A")),
                Identified::new(BoundedContext::new("B")),
            ],
            ..Model::default()
        };

        let report = validate(&model);
        assert_eq!(codes(&report), vec![ValidationCode::E208]);
        assert_eq!(
            report.findings()[0].location().to_string(),
            "ContextMap > Relationship 'A Partnership A'"
        );
    }
}
