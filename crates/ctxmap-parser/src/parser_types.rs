//! Concrete syntax tree produced by the parser.
//!
//! Leaf values (names, strings, keyword values) are wrapped in [`Spanned`];
//! composite nodes keep their children in source order. Block bodies are
//! lists of items because the grammar accepts members in any order and any
//! repetition.

use std::fmt;

use ctxmap_core::model::{
    ContextMapState, ContextType, DownstreamPattern, KnowledgeLevel, SymmetricKind,
    UpstreamPattern,
};

use crate::span::{Span, Spanned};

/// A parsed document: top-level declarations in source order.
#[derive(Debug, Default)]
pub struct Document<'src> {
    pub declarations: Vec<Declaration<'src>>,
}

impl<'src> Document<'src> {
    /// Iterates over the context map declarations of the document.
    pub fn context_maps(&self) -> impl Iterator<Item = &ContextMapDecl<'src>> {
        self.declarations.iter().filter_map(|decl| match decl {
            Declaration::ContextMap(map) => Some(map),
            Declaration::BoundedContext(_) => None,
        })
    }
}

#[derive(Debug)]
pub enum Declaration<'src> {
    ContextMap(ContextMapDecl<'src>),
    BoundedContext(BoundedContextDecl<'src>),
}

/// `ContextMap Name? { ... }`
#[derive(Debug)]
pub struct ContextMapDecl<'src> {
    /// Span of the `ContextMap` keyword
    pub keyword: Span,
    pub name: Option<Spanned<&'src str>>,
    pub items: Vec<ContextMapItem<'src>>,
}

#[derive(Debug)]
pub enum ContextMapItem<'src> {
    /// `type = SYSTEM_LANDSCAPE`; any word is accepted
    Type(Spanned<&'src str>),
    State(Spanned<ContextMapState>),
    Contains(Vec<Spanned<&'src str>>),
    Relationship(RelationshipDecl<'src>),
}

#[derive(Debug)]
pub enum RelationshipDecl<'src> {
    Symmetric {
        kind: Spanned<SymmetricKind>,
        left: Spanned<&'src str>,
        right: Spanned<&'src str>,
    },
    UpstreamDownstream {
        upstream: Spanned<&'src str>,
        downstream: Spanned<&'src str>,
        upstream_patterns: Vec<Spanned<UpstreamPattern>>,
        downstream_patterns: Vec<Spanned<DownstreamPattern>>,
        body: Vec<RelationshipItem<'src>>,
    },
}

#[derive(Debug)]
pub enum RelationshipItem<'src> {
    ExposedAggregates(Vec<Spanned<&'src str>>),
    ImplementationTechnology(Spanned<String>),
}

/// `BoundedContext Name { ... }`
#[derive(Debug)]
pub struct BoundedContextDecl<'src> {
    pub name: Spanned<&'src str>,
    pub items: Vec<BoundedContextItem<'src>>,
}

#[derive(Debug)]
pub enum BoundedContextItem<'src> {
    VisionStatement(Spanned<String>),
    Responsibilities(Vec<Spanned<String>>),
    ImplementationTechnology(Spanned<String>),
    KnowledgeLevel(Spanned<KnowledgeLevel>),
    Type(Spanned<ContextType>),
    Aggregate(AggregateDecl<'src>),
    Module(ModuleDecl<'src>),
}

/// `Module Name { Aggregate* }`
#[derive(Debug)]
pub struct ModuleDecl<'src> {
    pub name: Spanned<&'src str>,
    pub aggregates: Vec<AggregateDecl<'src>>,
}

/// `Aggregate Name { ... }`
#[derive(Debug)]
pub struct AggregateDecl<'src> {
    pub name: Spanned<&'src str>,
    pub items: Vec<AggregateItem<'src>>,
}

#[derive(Debug)]
pub enum AggregateItem<'src> {
    Responsibilities(Vec<Spanned<String>>),
    KnowledgeLevel(Spanned<KnowledgeLevel>),
    Entity(EntityDecl<'src>),
    ValueObject(ObjectDecl<'src>),
    DomainEvent(ObjectDecl<'src>),
    Command(ObjectDecl<'src>),
    Service(ServiceDecl<'src>),
}

/// `Entity Name ({ ... })?`
#[derive(Debug)]
pub struct EntityDecl<'src> {
    pub name: Spanned<&'src str>,
    pub members: Vec<EntityMember<'src>>,
}

#[derive(Debug)]
pub enum EntityMember<'src> {
    AggregateRoot,
    Attribute(AttributeDecl<'src>),
    Operation(OperationDecl<'src>),
}

/// Value objects, domain events and commands share this shape.
#[derive(Debug)]
pub struct ObjectDecl<'src> {
    pub name: Spanned<&'src str>,
    pub attributes: Vec<AttributeDecl<'src>>,
}

/// `Service Name ({ def ...* })?`
#[derive(Debug)]
pub struct ServiceDecl<'src> {
    pub name: Spanned<&'src str>,
    pub operations: Vec<OperationDecl<'src>>,
}

/// `TypeRef name key? nullable? ;?`
#[derive(Debug)]
pub struct AttributeDecl<'src> {
    pub type_ref: Spanned<TypeRef>,
    pub name: Spanned<&'src str>,
    pub key: bool,
    pub nullable: bool,
}

/// `def TypeRef? name(TypeRef name, ...) ;?`
#[derive(Debug)]
pub struct OperationDecl<'src> {
    pub name: Spanned<&'src str>,
    pub return_type: Option<Spanned<TypeRef>>,
    pub parameters: Vec<ParameterDecl<'src>>,
}

#[derive(Debug)]
pub struct ParameterDecl<'src> {
    pub type_ref: Spanned<TypeRef>,
    pub name: Spanned<&'src str>,
}

/// Collection constructors accepted in type references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
        }
    }
}

/// A type reference in one of its three accepted shapes.
///
/// The inner type of a collection is always a plain name, so a collection of
/// collections cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A primitive or a domain object: `String`, `CustomerId`
    Named(String),
    /// `List<T>` or `Set<T>`
    Collection(CollectionKind, String),
    /// `- CustomerId`: an explicit domain-object reference
    Reference(String),
}

impl TypeRef {
    /// The referenced type name, without collection or reference markers.
    pub fn base_name(&self) -> &str {
        match self {
            TypeRef::Named(name) | TypeRef::Collection(_, name) | TypeRef::Reference(name) => name,
        }
    }
}

/// Renders the canonical type descriptor stored in the model:
/// `String`, `List<OrderLine>`, `- CustomerId`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{name}"),
            TypeRef::Collection(kind, inner) => write!(f, "{}<{inner}>", kind.as_str()),
            TypeRef::Reference(name) => write!(f, "- {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_ref_canonical_form() {
        assert_eq!(TypeRef::Named("String".into()).to_string(), "String");
        assert_eq!(
            TypeRef::Collection(CollectionKind::Set, "OrderLine".into()).to_string(),
            "Set<OrderLine>"
        );
        assert_eq!(
            TypeRef::Reference("CustomerId".into()).to_string(),
            "- CustomerId"
        );
    }

    #[test]
    fn test_type_ref_base_name() {
        assert_eq!(
            TypeRef::Collection(CollectionKind::List, "Tag".into()).base_name(),
            "Tag"
        );
        assert_eq!(TypeRef::Reference("OrderId".into()).base_name(), "OrderId");
    }
}
