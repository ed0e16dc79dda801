//! Incremental, checked editing of a model.
//!
//! A [`Session`] owns a [`Model`] and adds elements to it one call at a
//! time. Every `add_*` call checks all of its preconditions before touching
//! the model: either the element is inserted in full and its [`ElementId`]
//! returned, or an [`EditError`] explains why nothing changed.
//!
//! The checks mirror the validator, so a model built only through a session
//! never carries duplicate names, reserved names, or invalid types. Member
//! names are sanitized like element names and types are stored in canonical
//! form, so written text parses back to the same model.
//!
//! # Example
//!
//! ```
//! use ctxmap::model::{Attribute, Entity, ValueObject};
//! use ctxmap::session::Session;
//!
//! let mut session = Session::new();
//! session.add_bounded_context("Sales")?;
//! session.add_aggregate("Sales", None, "Orders")?;
//! session.add_entity(
//!     "Sales",
//!     "Orders",
//!     Entity::new("Order").as_root().with_attribute(Attribute::new("- OrderId", "id").key()),
//! )?;
//! session.add_value_object("Sales", "Orders", ValueObject::new("OrderId"))?;
//!
//! // Domain object names are unique across the whole model.
//! session.add_bounded_context("Billing")?;
//! session.add_aggregate("Billing", None, "Invoices")?;
//! let err = session
//!     .add_value_object("Billing", "Invoices", ValueObject::new("OrderId"))
//!     .unwrap_err();
//! assert_eq!(err.suggestion().as_deref(), Some("BillingOrderId"));
//! # Ok::<(), ctxmap::session::EditError>(())
//! ```

use log::debug;
use thiserror::Error;

use ctxmap_core::{
    identity::{ElementId, Identified},
    model::{
        Aggregate, Attribute, BoundedContext, Command, ContextMap, DomainEvent, DomainService,
        Entity, Model, Module, Operation, Relationship, ValueObject,
    },
};

use crate::{
    error::CtxmapError,
    guards::{self, InvalidType},
    validate::Location,
};

/// How a batch insertion reports rejected elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Stop at the first rejected element.
    #[default]
    FailFast,
    /// Check every element and report all rejections.
    CollectAll,
}

/// One rejected element of a batch, by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub error: EditError,
}

/// Reasons an edit is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("name `{0}` contains no identifier characters")]
    EmptyName(String),

    #[error("`{name}` is a reserved name")]
    ReservedName {
        name: String,
        suggestions: Vec<String>,
    },

    #[error("invalid type for {element}: {source}")]
    InvalidType {
        element: String,
        source: InvalidType,
    },

    #[error("{kind} `{name}` already exists in {container}")]
    Duplicate {
        kind: &'static str,
        name: String,
        container: String,
    },

    #[error("name `{name}` is already used by {existing}")]
    NameInUse {
        name: String,
        existing: String,
        context: String,
    },

    #[error("unknown bounded context `{0}`")]
    UnknownBoundedContext(String),

    #[error("unknown module `{module}` in bounded context `{context}`")]
    UnknownModule { context: String, module: String },

    #[error("unknown aggregate `{aggregate}` in bounded context `{context}`")]
    UnknownAggregate { context: String, aggregate: String },

    #[error("{rejected} of {total} elements rejected", rejected = .failures.len())]
    Batch {
        total: usize,
        failures: Vec<BatchFailure>,
    },
}

impl EditError {
    /// A replacement value the caller can retry with, when one is known.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            EditError::ReservedName { suggestions, .. } => suggestions.first().cloned(),
            EditError::InvalidType { source, .. } => source.suggestion().map(str::to_string),
            EditError::NameInUse { name, context, .. } => Some(format!("{context}{name}")),
            EditError::Batch { failures, .. } => {
                failures.first().and_then(|failure| failure.error.suggestion())
            }
            _ => None,
        }
    }
}

/// An element that lives inside an aggregate.
trait Member: Sized {
    /// Keyword naming the element kind in messages.
    const KIND: &'static str;
    /// Whether the name shares the model-wide domain object namespace.
    const MODEL_WIDE_NAME: bool;

    fn name(&self) -> &str;
    fn set_name(&mut self, name: String);
    /// Sanitizes member names and rewrites every type in canonical form.
    fn normalize(&mut self) -> Result<(), EditError>;
    fn members(aggregate: &Aggregate) -> &[Identified<Self>];
    fn members_mut(aggregate: &mut Aggregate) -> &mut Vec<Identified<Self>>;
}

/// Checks `type_name` and returns its canonical spelling.
fn checked_type(element: String, type_name: &str) -> Result<String, EditError> {
    guards::validate_attribute_type(type_name)
        .map(|type_ref| type_ref.to_string())
        .map_err(|source| EditError::InvalidType { element, source })
}

fn normalize_attributes(attributes: &mut [Attribute]) -> Result<(), EditError> {
    for attribute in attributes {
        attribute.name = checked_name(&attribute.name)?;
        attribute.type_name = checked_type(
            format!("attribute `{}`", attribute.name),
            &attribute.type_name,
        )?;
    }
    Ok(())
}

fn normalize_operations(operations: &mut [Operation]) -> Result<(), EditError> {
    for operation in operations {
        operation.name = checked_name(&operation.name)?;
        operation.return_type = operation
            .return_type
            .as_deref()
            .map(|return_type| {
                checked_type(
                    format!("return value of `{}`", operation.name),
                    return_type,
                )
            })
            .transpose()?;
        for parameter in &mut operation.parameters {
            parameter.name = checked_name(&parameter.name)?;
            parameter.type_name = checked_type(
                format!("parameter `{}` of `{}`", parameter.name, operation.name),
                &parameter.type_name,
            )?;
        }
    }
    Ok(())
}

impl Member for Entity {
    const KIND: &'static str = "Entity";
    const MODEL_WIDE_NAME: bool = true;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn normalize(&mut self) -> Result<(), EditError> {
        normalize_attributes(&mut self.attributes)?;
        normalize_operations(&mut self.operations)
    }

    fn members(aggregate: &Aggregate) -> &[Identified<Self>] {
        &aggregate.entities
    }

    fn members_mut(aggregate: &mut Aggregate) -> &mut Vec<Identified<Self>> {
        &mut aggregate.entities
    }
}

macro_rules! attributed_member {
    ($type:ident, $kind:literal, $field:ident) => {
        impl Member for $type {
            const KIND: &'static str = $kind;
            const MODEL_WIDE_NAME: bool = true;

            fn name(&self) -> &str {
                &self.name
            }

            fn set_name(&mut self, name: String) {
                self.name = name;
            }

            fn normalize(&mut self) -> Result<(), EditError> {
                normalize_attributes(&mut self.attributes)
            }

            fn members(aggregate: &Aggregate) -> &[Identified<Self>] {
                &aggregate.$field
            }

            fn members_mut(aggregate: &mut Aggregate) -> &mut Vec<Identified<Self>> {
                &mut aggregate.$field
            }
        }
    };
}

attributed_member!(ValueObject, "ValueObject", value_objects);
attributed_member!(DomainEvent, "DomainEvent", domain_events);
attributed_member!(Command, "Command", commands);

impl Member for DomainService {
    const KIND: &'static str = "Service";
    const MODEL_WIDE_NAME: bool = false;

    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn normalize(&mut self) -> Result<(), EditError> {
        normalize_operations(&mut self.operations)
    }

    fn members(aggregate: &Aggregate) -> &[Identified<Self>] {
        &aggregate.services
    }

    fn members_mut(aggregate: &mut Aggregate) -> &mut Vec<Identified<Self>> {
        &mut aggregate.services
    }
}

/// Sanitizes `raw` and rejects names left empty.
fn checked_name(raw: &str) -> Result<String, EditError> {
    let name = guards::sanitize_identifier(raw);
    if name.is_empty() {
        return Err(EditError::EmptyName(raw.to_string()));
    }
    Ok(name)
}

fn check_reserved(name: &str) -> Result<(), EditError> {
    match guards::reserved_domain_object_name(name) {
        Some(reserved) => Err(EditError::ReservedName {
            name: name.to_string(),
            suggestions: reserved.suggestions,
        }),
        None => Ok(()),
    }
}

/// An owned model under construction.
#[derive(Debug, Clone, Default)]
pub struct Session {
    model: Model,
}

impl Session {
    /// Starts from an empty model.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_model(model: Model) -> Self {
        Self { model }
    }

    /// Starts from the model described by `source`.
    pub fn load(source: &str) -> Result<Self, CtxmapError> {
        crate::parse(source).map(Self::from_model)
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn into_model(self) -> Model {
        self.model
    }

    pub fn add_bounded_context(&mut self, name: &str) -> Result<ElementId, EditError> {
        let name = checked_name(name)?;
        if self.model.bounded_context(&name).is_some() {
            return Err(EditError::Duplicate {
                kind: "BoundedContext",
                name,
                container: "the model".to_string(),
            });
        }

        let context = Identified::new(BoundedContext::new(name));
        let id = context.id();
        debug!(name = context.name.as_str(); "Bounded context added");
        self.model.bounded_contexts.push(context);
        Ok(id)
    }

    pub fn add_module(&mut self, context: &str, name: &str) -> Result<ElementId, EditError> {
        let name = checked_name(name)?;
        let target = self.context_mut(context)?;
        if target.modules.iter().any(|m| m.name == name) {
            return Err(EditError::Duplicate {
                kind: "Module",
                name,
                container: format!("bounded context `{context}`"),
            });
        }

        let module = Identified::new(Module::new(name));
        let id = module.id();
        debug!(context = context, name = module.name.as_str(); "Module added");
        target.modules.push(module);
        Ok(id)
    }

    /// Adds an empty aggregate to a bounded context, or to one of its
    /// modules when `module` is given.
    pub fn add_aggregate(
        &mut self,
        context: &str,
        module: Option<&str>,
        name: &str,
    ) -> Result<ElementId, EditError> {
        let name = checked_name(name)?;
        check_reserved(&name)?;

        let target = self.context_mut(context)?;
        if target.aggregate(&name).is_some() {
            return Err(EditError::Duplicate {
                kind: "Aggregate",
                name,
                container: format!("bounded context `{context}`"),
            });
        }

        let aggregates = match module {
            Some(module) => {
                let Some(found) = target.modules.iter_mut().find(|m| m.name == module) else {
                    return Err(EditError::UnknownModule {
                        context: context.to_string(),
                        module: module.to_string(),
                    });
                };
                &mut found.aggregates
            }
            None => &mut target.aggregates,
        };

        let aggregate = Identified::new(Aggregate::new(name));
        let id = aggregate.id();
        debug!(context = context, name = aggregate.name.as_str(); "Aggregate added");
        aggregates.push(aggregate);
        Ok(id)
    }

    pub fn add_entity(
        &mut self,
        context: &str,
        aggregate: &str,
        entity: Entity,
    ) -> Result<ElementId, EditError> {
        self.add_member(context, aggregate, entity)
    }

    pub fn add_value_object(
        &mut self,
        context: &str,
        aggregate: &str,
        object: ValueObject,
    ) -> Result<ElementId, EditError> {
        self.add_member(context, aggregate, object)
    }

    pub fn add_domain_event(
        &mut self,
        context: &str,
        aggregate: &str,
        event: DomainEvent,
    ) -> Result<ElementId, EditError> {
        self.add_member(context, aggregate, event)
    }

    pub fn add_command(
        &mut self,
        context: &str,
        aggregate: &str,
        command: Command,
    ) -> Result<ElementId, EditError> {
        self.add_member(context, aggregate, command)
    }

    pub fn add_service(
        &mut self,
        context: &str,
        aggregate: &str,
        service: DomainService,
    ) -> Result<ElementId, EditError> {
        self.add_member(context, aggregate, service)
    }

    /// Adds several entities at once. Nothing is inserted unless every
    /// entity passes its checks.
    pub fn add_entities(
        &mut self,
        context: &str,
        aggregate: &str,
        entities: Vec<Entity>,
        mode: BatchMode,
    ) -> Result<Vec<ElementId>, EditError> {
        self.add_batch(context, aggregate, entities, mode)
    }

    /// Adds several value objects at once. Nothing is inserted unless every
    /// value object passes its checks.
    pub fn add_value_objects(
        &mut self,
        context: &str,
        aggregate: &str,
        objects: Vec<ValueObject>,
        mode: BatchMode,
    ) -> Result<Vec<ElementId>, EditError> {
        self.add_batch(context, aggregate, objects, mode)
    }

    /// Adds a relationship to the context map, creating the map if needed.
    ///
    /// Both participants must be declared, and exposed aggregates must
    /// exist in the upstream context.
    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<ElementId, EditError> {
        let (first, second) = relationship.participants();
        for participant in [first, second] {
            if self.model.bounded_context(participant).is_none() {
                return Err(EditError::UnknownBoundedContext(participant.to_string()));
            }
        }

        if let Relationship::UpstreamDownstream(rel) = &relationship {
            let upstream = self.context(&rel.upstream)?;
            if let Some(missing) = rel
                .exposed_aggregates
                .iter()
                .find(|name| upstream.aggregate(name).is_none())
            {
                return Err(EditError::UnknownAggregate {
                    context: rel.upstream.clone(),
                    aggregate: missing.clone(),
                });
            }
        }

        debug!(first = first, second = second; "Adding relationship");
        let relationship = Identified::new(relationship);
        let id = relationship.id();
        self.model
            .context_map
            .get_or_insert_with(|| Identified::new(ContextMap::default()))
            .relationships
            .push(relationship);
        Ok(id)
    }

    fn context(&self, name: &str) -> Result<&Identified<BoundedContext>, EditError> {
        self.model
            .bounded_context(name)
            .ok_or_else(|| EditError::UnknownBoundedContext(name.to_string()))
    }

    fn context_mut(&mut self, name: &str) -> Result<&mut Identified<BoundedContext>, EditError> {
        self.model
            .bounded_context_mut(name)
            .ok_or_else(|| EditError::UnknownBoundedContext(name.to_string()))
    }

    fn aggregate(&self, context: &str, aggregate: &str) -> Result<&Aggregate, EditError> {
        self.context(context)?
            .aggregate(aggregate)
            .map(|a| a.inner())
            .ok_or_else(|| EditError::UnknownAggregate {
                context: context.to_string(),
                aggregate: aggregate.to_string(),
            })
    }

    fn aggregate_mut(&mut self, context: &str, aggregate: &str) -> Result<&mut Aggregate, EditError> {
        self.context_mut(context)?
            .aggregate_mut(aggregate)
            .map(|a| &mut **a)
            .ok_or_else(|| EditError::UnknownAggregate {
                context: context.to_string(),
                aggregate: aggregate.to_string(),
            })
    }

    /// Describes where a domain object named `name` already lives.
    fn domain_object_location(&self, name: &str) -> Option<String> {
        self.model.bounded_contexts.iter().find_map(|context| {
            let context_location = Location::root().child("BoundedContext", &context.name);
            context.all_aggregates().find_map(|(module, aggregate)| {
                let (kind, _) = aggregate.domain_objects().find(|(_, n)| *n == name)?;
                let parent = match module {
                    Some(module) => context_location.child("Module", module),
                    None => context_location.clone(),
                };
                Some(format!(
                    "{kind} in {}",
                    parent.child("Aggregate", &aggregate.name)
                ))
            })
        })
    }

    /// Runs every check for inserting `member`, returning it with sanitized
    /// names and canonical types. `pending` holds names accepted earlier in
    /// the same batch.
    fn prepare<T: Member>(
        &self,
        context: &str,
        aggregate: &str,
        mut member: T,
        pending: &[String],
    ) -> Result<T, EditError> {
        let name = checked_name(member.name())?;
        check_reserved(&name)?;

        member.normalize()?;

        let target = self.aggregate(context, aggregate)?;
        if T::members(target).iter().any(|m| m.name() == name) || pending.contains(&name) {
            return Err(EditError::Duplicate {
                kind: T::KIND,
                name,
                container: format!("aggregate `{aggregate}`"),
            });
        }

        if T::MODEL_WIDE_NAME {
            if let Some(existing) = self.domain_object_location(&name) {
                return Err(EditError::NameInUse {
                    name,
                    existing,
                    context: context.to_string(),
                });
            }
        }

        member.set_name(name);
        Ok(member)
    }

    fn insert<T: Member>(
        &mut self,
        context: &str,
        aggregate: &str,
        member: T,
    ) -> Result<ElementId, EditError> {
        let target = self.aggregate_mut(context, aggregate)?;
        let member = Identified::new(member);
        let id = member.id();
        debug!(kind = T::KIND, name = member.name(), aggregate = aggregate; "Domain element added");
        T::members_mut(target).push(member);
        Ok(id)
    }

    fn add_member<T: Member>(
        &mut self,
        context: &str,
        aggregate: &str,
        member: T,
    ) -> Result<ElementId, EditError> {
        let member = self.prepare(context, aggregate, member, &[])?;
        self.insert(context, aggregate, member)
    }

    fn add_batch<T: Member>(
        &mut self,
        context: &str,
        aggregate: &str,
        members: Vec<T>,
        mode: BatchMode,
    ) -> Result<Vec<ElementId>, EditError> {
        let total = members.len();
        let mut accepted: Vec<T> = Vec::with_capacity(total);
        let mut pending: Vec<String> = Vec::with_capacity(total);
        let mut failures = Vec::new();

        for (index, member) in members.into_iter().enumerate() {
            match self.prepare(context, aggregate, member, &pending) {
                Ok(member) => {
                    pending.push(member.name().to_string());
                    accepted.push(member);
                }
                Err(error) => {
                    failures.push(BatchFailure { index, error });
                    if mode == BatchMode::FailFast {
                        break;
                    }
                }
            }
        }

        if !failures.is_empty() {
            debug!(total = total, rejected = failures.len(); "Batch rejected");
            return Err(EditError::Batch { total, failures });
        }

        accepted
            .into_iter()
            .map(|member| self.insert(context, aggregate, member))
            .collect()
    }
}
