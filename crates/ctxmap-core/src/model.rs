//! The application-level model of a ctxmap document.
//!
//! A [`Model`] is a tree of plain records. Cross references (relationship
//! participants, contained contexts, exposed aggregates, attribute types)
//! are stored as names and resolved by the validator, never as pointers.
//!
//! Every element is wrapped in [`Identified`] so collaborators can address
//! it later; identity does not take part in equality.

mod relationship;

pub use relationship::{
    DownstreamPattern, Relationship, SymmetricKind, SymmetricRelationship,
    UpstreamDownstreamRelationship, UpstreamPattern,
};

use std::fmt;

use crate::identity::Identified;

/// Root of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    pub name: String,
    pub context_map: Option<Identified<ContextMap>>,
    pub bounded_contexts: Vec<Identified<BoundedContext>>,
}

impl Model {
    /// Creates an empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Finds a bounded context by name.
    pub fn bounded_context(&self, name: &str) -> Option<&Identified<BoundedContext>> {
        self.bounded_contexts.iter().find(|bc| bc.name == name)
    }

    /// Finds a bounded context by name for mutation.
    pub fn bounded_context_mut(&mut self, name: &str) -> Option<&mut Identified<BoundedContext>> {
        self.bounded_contexts.iter_mut().find(|bc| bc.name == name)
    }
}

/// Whether a context map documents the current or the intended landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContextMapState {
    #[default]
    AsIs,
    ToBe,
}

impl ContextMapState {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextMapState::AsIs => "AS_IS",
            ContextMapState::ToBe => "TO_BE",
        }
    }
}

impl fmt::Display for ContextMapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The document-level map of bounded contexts and their relationships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextMap {
    pub name: Option<String>,
    /// Free-form map type (`SYSTEM_LANDSCAPE`, `ORGANIZATIONAL`, ...).
    /// Stored and written back, never interpreted.
    pub map_type: Option<String>,
    pub state: ContextMapState,
    pub contains: Vec<String>,
    pub relationships: Vec<Identified<Relationship>>,
}

/// Knowledge level of a bounded context or aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnowledgeLevel {
    Meta,
    Concrete,
}

impl KnowledgeLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            KnowledgeLevel::Meta => "META",
            KnowledgeLevel::Concrete => "CONCRETE",
        }
    }
}

impl fmt::Display for KnowledgeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a bounded context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextType {
    Feature,
    Application,
    System,
    Team,
}

impl ContextType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContextType::Feature => "FEATURE",
            ContextType::Application => "APPLICATION",
            ContextType::System => "SYSTEM",
            ContextType::Team => "TEAM",
        }
    }
}

impl fmt::Display for ContextType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An independently named subdomain boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundedContext {
    pub name: String,
    pub vision_statement: Option<String>,
    pub responsibilities: Vec<String>,
    /// Informational label such as `"Java, Spring"`.
    pub implementation_technology: Option<String>,
    pub knowledge_level: Option<KnowledgeLevel>,
    pub context_type: Option<ContextType>,
    pub aggregates: Vec<Identified<Aggregate>>,
    pub modules: Vec<Identified<Module>>,
}

impl BoundedContext {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Iterates over every aggregate of the context, including those nested
    /// in modules, together with the owning module's name.
    pub fn all_aggregates(&self) -> impl Iterator<Item = (Option<&str>, &Identified<Aggregate>)> {
        self.aggregates
            .iter()
            .map(|aggregate| (None, aggregate))
            .chain(self.modules.iter().flat_map(|module| {
                module
                    .aggregates
                    .iter()
                    .map(move |aggregate| (Some(module.name.as_str()), aggregate))
            }))
    }

    /// Finds an aggregate by name, looking into modules as well.
    pub fn aggregate(&self, name: &str) -> Option<&Identified<Aggregate>> {
        self.all_aggregates()
            .map(|(_, aggregate)| aggregate)
            .find(|aggregate| aggregate.name == name)
    }

    /// Finds an aggregate by name for mutation, looking into modules as well.
    pub fn aggregate_mut(&mut self, name: &str) -> Option<&mut Identified<Aggregate>> {
        self.aggregates
            .iter_mut()
            .chain(
                self.modules
                    .iter_mut()
                    .flat_map(|module| module.aggregates.iter_mut()),
            )
            .find(|aggregate| aggregate.name == name)
    }
}

/// A named grouping of aggregates inside a bounded context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub name: String,
    pub aggregates: Vec<Identified<Aggregate>>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aggregates: Vec::new(),
        }
    }
}

/// A consistency boundary grouping entities, value objects, events,
/// commands and services.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub name: String,
    pub responsibilities: Vec<String>,
    pub knowledge_level: Option<KnowledgeLevel>,
    pub entities: Vec<Identified<Entity>>,
    pub value_objects: Vec<Identified<ValueObject>>,
    pub domain_events: Vec<Identified<DomainEvent>>,
    pub commands: Vec<Identified<Command>>,
    pub services: Vec<Identified<DomainService>>,
}

impl Aggregate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The aggregate root: the first entity carrying the root marker.
    ///
    /// Additional entities marked as root are a validation concern; this
    /// accessor never looks past the first.
    pub fn aggregate_root(&self) -> Option<&Identified<Entity>> {
        self.entities.iter().find(|entity| entity.aggregate_root)
    }

    /// Iterates over the names of all entities, value objects, domain
    /// events and commands with their kind.
    pub fn domain_objects(&self) -> impl Iterator<Item = (DomainObjectKind, &str)> {
        let entities = self
            .entities
            .iter()
            .map(|e| (DomainObjectKind::Entity, e.name.as_str()));
        let value_objects = self
            .value_objects
            .iter()
            .map(|v| (DomainObjectKind::ValueObject, v.name.as_str()));
        let events = self
            .domain_events
            .iter()
            .map(|e| (DomainObjectKind::DomainEvent, e.name.as_str()));
        let commands = self
            .commands
            .iter()
            .map(|c| (DomainObjectKind::Command, c.name.as_str()));

        entities.chain(value_objects).chain(events).chain(commands)
    }

    /// Returns `true` if the aggregate declares no members at all.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
            && self.value_objects.is_empty()
            && self.domain_events.is_empty()
            && self.commands.is_empty()
            && self.services.is_empty()
    }
}

/// The kinds of domain objects whose names must be unique model-wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainObjectKind {
    Entity,
    ValueObject,
    DomainEvent,
    Command,
}

impl DomainObjectKind {
    /// The keyword introducing this kind of object in source text.
    pub fn keyword(self) -> &'static str {
        match self {
            DomainObjectKind::Entity => "Entity",
            DomainObjectKind::ValueObject => "ValueObject",
            DomainObjectKind::DomainEvent => "DomainEvent",
            DomainObjectKind::Command => "Command",
        }
    }
}

impl fmt::Display for DomainObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A domain object with identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Entity {
    pub name: String,
    pub aggregate_root: bool,
    pub attributes: Vec<Attribute>,
    pub operations: Vec<Operation>,
}

impl Entity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks this entity as the aggregate root.
    pub fn as_root(mut self) -> Self {
        self.aggregate_root = true;
        self
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }
}

macro_rules! attributed_object {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            pub name: String,
            pub attributes: Vec<Attribute>,
        }

        impl $name {
            pub fn new(name: impl Into<String>) -> Self {
                Self {
                    name: name.into(),
                    attributes: Vec::new(),
                }
            }

            pub fn with_attribute(mut self, attribute: Attribute) -> Self {
                self.attributes.push(attribute);
                self
            }
        }
    };
}

attributed_object!(
    /// An attribute bundle without identity of its own.
    ValueObject
);
attributed_object!(
    /// A fact that occurred in the domain.
    DomainEvent
);
attributed_object!(
    /// A requested action.
    Command
);

/// A typed, named field of a domain object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    /// Unescaped name; `^` escapes exist only in source text.
    pub name: String,
    /// Canonical type descriptor: `String`, `List<OrderLine>`, `- CustomerId`.
    pub type_name: String,
    pub key: bool,
    pub nullable: bool,
}

impl Attribute {
    pub fn new(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            key: false,
            nullable: false,
        }
    }

    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A stateless domain service.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainService {
    pub name: String,
    pub operations: Vec<Operation>,
}

impl DomainService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            operations: Vec::new(),
        }
    }
}

/// An operation of a service or an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: None,
            parameters: Vec::new(),
        }
    }

    pub fn returning(mut self, type_name: impl Into<String>) -> Self {
        self.return_type = Some(type_name.into());
        self
    }

    pub fn with_parameter(mut self, type_name: impl Into<String>, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }
}

/// A name/type pair in an operation signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub type_name: String,
}
