//! Parser for ctxmap source tokens.
//!
//! This module transforms a token stream from the [`lexer`](super::lexer) into
//! the concrete syntax tree defined in [`parser_types`](super::parser_types).
//! The public entry points are [`build_document`] and [`build_type_ref`].
//!
//! Every token-level helper skips leading whitespace and comments, so the
//! grammar functions read as plain sequences of tokens.

use log::trace;
use winnow::{
    Parser as _,
    combinator::{alt, delimited, fail, opt, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use ctxmap_core::{
    keywords::Keyword,
    model::{
        ContextMapState, ContextType, DownstreamPattern, KnowledgeLevel, SymmetricKind,
        UpstreamPattern,
    },
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{self as types, CollectionKind, TypeRef},
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// Description of what is currently being parsed
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) at error start position
    ///
    /// Used to calculate start_offset as: `tokens.len() - start_offset_value`
    StartOffset(usize),
    /// A dedicated diagnostic replacing the generic "unexpected token" one
    Diagnostic {
        code: ErrorCode,
        message: &'static str,
        help: &'static str,
    },
}

type Input<'src> = CtxmapTokenSlice<'src>;
type IResult<O> = std::result::Result<O, ErrMode<ContextError<Context>>>;
/// Type alias for winnow TokenSlice with our positioned tokens
type CtxmapTokenSlice<'src> = TokenSlice<'src, PositionedToken<'src>>;

/// Commit to the production parsed by `f`.
///
/// Backtracking errors inside `f` become cut errors tagged with the position
/// where `f` started, so alternatives are not retried and the error span
/// starts at the committed construct.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

/// Parse whitespace and comments
fn ws_comment<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

/// Parse zero or more whitespace/comments
fn ws_comments0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., ws_comment).parse_next(input)
}

/// Parse one specific punctuation or operator token.
fn symbol<'src>(
    expected: Token<'src>,
    label: &'static str,
) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        preceded(
            ws_comments0,
            any.verify_map(|token: &PositionedToken<'src>| {
                (token.token == expected).then_some(token.span)
            }),
        )
        .context(Context::Label(label))
        .parse_next(input)
    }
}

/// Parse one specific keyword.
fn keyword<'src>(expected: Keyword) -> impl FnMut(&mut Input<'src>) -> IResult<Span> {
    move |input: &mut Input<'src>| {
        preceded(
            ws_comments0,
            any.verify_map(|token: &PositionedToken<'src>| match token.token {
                Token::Keyword(kw) if kw == expected => Some(token.span),
                _ => None,
            }),
        )
        .context(Context::Label(expected.as_str()))
        .parse_next(input)
    }
}

/// Parse a keyword-valued token and map it through `f`.
fn keyword_value<'src, T>(
    label: &'static str,
    f: fn(Keyword) -> Option<T>,
) -> impl FnMut(&mut Input<'src>) -> IResult<Spanned<T>> {
    move |input: &mut Input<'src>| {
        preceded(
            ws_comments0,
            any.verify_map(|token: &PositionedToken<'src>| match token.token {
                Token::Keyword(kw) => f(kw).map(|value| Spanned::new(value, token.span)),
                _ => None,
            }),
        )
        .context(Context::Label(label))
        .parse_next(input)
    }
}

fn equals<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(Token::Equals, "`=`").parse_next(input)
}

fn comma<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(Token::Comma, "`,`").parse_next(input)
}

fn left_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(Token::LeftBrace, "`{`").parse_next(input)
}

fn right_brace<'src>(input: &mut Input<'src>) -> IResult<Span> {
    symbol(Token::RightBrace, "`}`").parse_next(input)
}

/// Parse an element name.
///
/// Only identifiers qualify; a name that collides with a keyword must be
/// written with the `^` escape.
fn name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("name"))
    .parse_next(input)
}

/// Parse an attribute, parameter or operation name.
///
/// Besides identifiers this admits lower-case keywords (`type`, `state`,
/// `key`, `service`, ...), which collide with everyday domain vocabulary.
fn attribute_name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            Token::Keyword(kw) if kw.is_attribute_name() => {
                Some(Spanned::new(kw.as_str(), token.span))
            }
            _ => None,
        }),
    )
    .context(Context::Label("attribute name"))
    .parse_next(input)
}

/// Parse any word, keyword or identifier.
fn any_word<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'src>| match &token.token {
            Token::Identifier(name) => Some(Spanned::new(*name, token.span)),
            Token::Keyword(kw) => Some(Spanned::new(kw.as_str(), token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("word"))
    .parse_next(input)
}

/// Parse string literal
fn string_literal<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    preceded(
        ws_comments0,
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::StringLiteral(s) => Some(Spanned::new(s.clone(), token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("string literal"))
    .parse_next(input)
}

/// Parse `"a", "b", ...` with at least one string.
fn string_list<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<String>>> {
    separated(1.., string_literal, comma).parse_next(input)
}

/// Parse `A, B, ...` with at least one name.
fn name_list<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<&'src str>>> {
    separated(1.., name, comma).parse_next(input)
}

fn knowledge_level_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<KnowledgeLevel>> {
    keyword_value("`META` or `CONCRETE`", |kw| match kw {
        Keyword::Meta => Some(KnowledgeLevel::Meta),
        Keyword::Concrete => Some(KnowledgeLevel::Concrete),
        _ => None,
    })
    .parse_next(input)
}

fn collection_kind<'src>(input: &mut Input<'src>) -> IResult<Spanned<CollectionKind>> {
    keyword_value("`List` or `Set`", |kw| match kw {
        Keyword::List => Some(CollectionKind::List),
        Keyword::Set => Some(CollectionKind::Set),
        _ => None,
    })
    .parse_next(input)
}

// =========================================================================
// Type references
// =========================================================================

/// Parse the element type of a collection.
///
/// Only a plain name is accepted; another collection constructor here is
/// reported with a dedicated diagnostic.
fn collection_element<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    ws_comments0.parse_next(input)?;
    let start_remaining = input.eof_offset();
    let checkpoint = input.checkpoint();

    if collection_kind.parse_next(input).is_ok() {
        let mut e = ContextError::new();
        e.push(Context::Diagnostic {
            code: ErrorCode::E102,
            message: "nested generic types are not supported",
            help: "introduce a value object that holds the inner collection",
        });
        e.push(Context::StartOffset(start_remaining));
        return Err(ErrMode::Cut(e));
    }
    input.reset(&checkpoint);

    name.parse_next(input)
}

/// Parse `List<T>` or `Set<T>`
fn collection_type<'src>(input: &mut Input<'src>) -> IResult<Spanned<TypeRef>> {
    let kind = collection_kind.parse_next(input)?;

    cut_err(input, |input| {
        symbol(Token::LessThan, "`<`").parse_next(input)?;
        let element = collection_element.parse_next(input)?;
        let close = symbol(Token::GreaterThan, "`>`").parse_next(input)?;

        Ok(Spanned::new(
            TypeRef::Collection(*kind.inner(), element.inner().to_string()),
            kind.span().union(close),
        ))
    })
}

/// Parse `- Name`
fn reference_type<'src>(input: &mut Input<'src>) -> IResult<Spanned<TypeRef>> {
    let dash = symbol(Token::Dash, "`-`").parse_next(input)?;

    cut_err(input, |input| {
        let target = name.parse_next(input)?;
        Ok(Spanned::new(
            TypeRef::Reference(target.inner().to_string()),
            dash.union(target.span()),
        ))
    })
}

/// Parse a type reference in any of its three shapes
fn type_ref<'src>(input: &mut Input<'src>) -> IResult<Spanned<TypeRef>> {
    alt((
        collection_type,
        reference_type,
        name.map(|name| name.map(|n| TypeRef::Named(n.to_string()))),
    ))
    .context(Context::Label("type"))
    .parse_next(input)
}

// =========================================================================
// Domain objects
// =========================================================================

/// Parse an attribute
///
/// Syntax: `TypeRef name key? nullable? ;?`
fn attribute<'src>(input: &mut Input<'src>) -> IResult<types::AttributeDecl<'src>> {
    let type_ref = type_ref.parse_next(input)?;

    cut_err(input, |input| {
        let name = attribute_name.parse_next(input)?;
        let key = opt(keyword(Keyword::Key)).parse_next(input)?.is_some();
        let nullable = opt(keyword(Keyword::Nullable)).parse_next(input)?.is_some();
        opt(symbol(Token::Semicolon, "`;`")).parse_next(input)?;

        Ok(types::AttributeDecl {
            type_ref,
            name,
            key,
            nullable,
        })
    })
}

/// Parse an operation parameter: `TypeRef name`
fn parameter<'src>(input: &mut Input<'src>) -> IResult<types::ParameterDecl<'src>> {
    let type_ref = type_ref.parse_next(input)?;
    let name = attribute_name.parse_next(input)?;
    Ok(types::ParameterDecl { type_ref, name })
}

/// Parse an operation
///
/// Syntax: `def TypeRef? name(TypeRef name, ...) ;?`
///
/// Examples:
/// - `def confirm();`
/// - `def Money total(- Currency currency)`
/// - `def List<OrderLine> lines();`
fn operation<'src>(input: &mut Input<'src>) -> IResult<types::OperationDecl<'src>> {
    keyword(Keyword::Def).parse_next(input)?;

    cut_err(input, |input| {
        let (return_type, name) = alt((
            (type_ref, attribute_name).map(|(ty, name)| (Some(ty), name)),
            attribute_name.map(|name| (None, name)),
        ))
        .parse_next(input)?;

        let parameters = delimited(
            symbol(Token::LeftParen, "`(`"),
            separated(0.., parameter, comma),
            symbol(Token::RightParen, "`)`"),
        )
        .parse_next(input)?;
        opt(symbol(Token::Semicolon, "`;`")).parse_next(input)?;

        Ok(types::OperationDecl {
            name,
            return_type,
            parameters,
        })
    })
}

fn entity_member<'src>(input: &mut Input<'src>) -> IResult<types::EntityMember<'src>> {
    alt((
        keyword(Keyword::AggregateRoot).map(|_| types::EntityMember::AggregateRoot),
        operation.map(types::EntityMember::Operation),
        attribute.map(types::EntityMember::Attribute),
    ))
    .parse_next(input)
}

/// Parse an optional `{ member* }` body; a missing body yields no members.
fn optional_body<'src, O, F>(member: F) -> impl FnMut(&mut Input<'src>) -> IResult<Vec<O>>
where
    F: FnMut(&mut Input<'src>) -> IResult<O> + Copy,
{
    move |input: &mut Input<'src>| {
        opt(delimited(left_brace, repeat(0.., member), right_brace))
            .map(Option::unwrap_or_default)
            .parse_next(input)
    }
}

/// Parse an entity
///
/// Syntax: `Entity Name { aggregateRoot? attributes* operations* }`, body optional
fn entity<'src>(input: &mut Input<'src>) -> IResult<types::EntityDecl<'src>> {
    keyword(Keyword::Entity).parse_next(input)?;

    cut_err(input, |input| {
        let name = name.parse_next(input)?;
        let members = optional_body(entity_member).parse_next(input)?;
        Ok(types::EntityDecl { name, members })
    })
}

/// Parse a value object, domain event or command: `Keyword Name { attributes* }`
fn object_decl<'src>(
    kind: Keyword,
) -> impl FnMut(&mut Input<'src>) -> IResult<types::ObjectDecl<'src>> {
    move |input: &mut Input<'src>| {
        keyword(kind).parse_next(input)?;

        cut_err(input, |input| {
            let name = name.parse_next(input)?;
            let attributes = optional_body(attribute).parse_next(input)?;
            Ok(types::ObjectDecl { name, attributes })
        })
    }
}

/// Parse a domain service: `Service Name { operations* }`
fn service<'src>(input: &mut Input<'src>) -> IResult<types::ServiceDecl<'src>> {
    keyword(Keyword::Service).parse_next(input)?;

    cut_err(input, |input| {
        let name = name.parse_next(input)?;
        let operations = optional_body(operation).parse_next(input)?;
        Ok(types::ServiceDecl { name, operations })
    })
}

// =========================================================================
// Properties
// =========================================================================

/// Parse `keyword = value` where the value parser commits once `keyword` matched.
fn property<'src, O, F>(
    kw: Keyword,
    mut value: F,
) -> impl FnMut(&mut Input<'src>) -> IResult<O>
where
    F: FnMut(&mut Input<'src>) -> IResult<O>,
{
    move |input: &mut Input<'src>| {
        keyword(kw).parse_next(input)?;

        cut_err(input, |input| {
            equals.parse_next(input)?;
            value(input)
        })
    }
}

fn responsibilities<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<String>>> {
    property(Keyword::Responsibilities, string_list).parse_next(input)
}

fn knowledge_level<'src>(input: &mut Input<'src>) -> IResult<Spanned<KnowledgeLevel>> {
    property(Keyword::KnowledgeLevel, knowledge_level_value).parse_next(input)
}

fn implementation_technology<'src>(input: &mut Input<'src>) -> IResult<Spanned<String>> {
    property(Keyword::ImplementationTechnology, string_literal).parse_next(input)
}

// =========================================================================
// Aggregates, modules and bounded contexts
// =========================================================================

fn aggregate_item<'src>(input: &mut Input<'src>) -> IResult<types::AggregateItem<'src>> {
    alt((
        responsibilities.map(types::AggregateItem::Responsibilities),
        knowledge_level.map(types::AggregateItem::KnowledgeLevel),
        entity.map(types::AggregateItem::Entity),
        object_decl(Keyword::ValueObject).map(types::AggregateItem::ValueObject),
        object_decl(Keyword::DomainEvent).map(types::AggregateItem::DomainEvent),
        object_decl(Keyword::Command).map(types::AggregateItem::Command),
        service.map(types::AggregateItem::Service),
    ))
    .parse_next(input)
}

/// Parse an aggregate: `Aggregate Name { ... }`
fn aggregate<'src>(input: &mut Input<'src>) -> IResult<types::AggregateDecl<'src>> {
    keyword(Keyword::Aggregate).parse_next(input)?;

    cut_err(input, |input| {
        let name = name.parse_next(input)?;
        left_brace.parse_next(input)?;
        let items = repeat(0.., aggregate_item).parse_next(input)?;
        right_brace.parse_next(input)?;
        Ok(types::AggregateDecl { name, items })
    })
}

/// Parse a module: `Module Name { Aggregate* }`
fn module<'src>(input: &mut Input<'src>) -> IResult<types::ModuleDecl<'src>> {
    keyword(Keyword::Module).parse_next(input)?;

    cut_err(input, |input| {
        let name = name.parse_next(input)?;
        left_brace.parse_next(input)?;
        let aggregates = repeat(0.., aggregate).parse_next(input)?;
        right_brace.parse_next(input)?;
        Ok(types::ModuleDecl { name, aggregates })
    })
}

fn context_type_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<ContextType>> {
    keyword_value(
        "`FEATURE`, `APPLICATION`, `SYSTEM` or `TEAM`",
        |kw| match kw {
            Keyword::Feature => Some(ContextType::Feature),
            Keyword::Application => Some(ContextType::Application),
            Keyword::System => Some(ContextType::System),
            Keyword::Team => Some(ContextType::Team),
            _ => None,
        },
    )
    .parse_next(input)
}

fn bounded_context_item<'src>(
    input: &mut Input<'src>,
) -> IResult<types::BoundedContextItem<'src>> {
    use types::BoundedContextItem as Item;

    alt((
        property(Keyword::DomainVisionStatement, string_literal).map(Item::VisionStatement),
        responsibilities.map(Item::Responsibilities),
        implementation_technology.map(Item::ImplementationTechnology),
        knowledge_level.map(Item::KnowledgeLevel),
        property(Keyword::Type, context_type_value).map(Item::Type),
        aggregate.map(Item::Aggregate),
        module.map(Item::Module),
    ))
    .parse_next(input)
}

/// Parse a bounded context: `BoundedContext Name { ... }`
fn bounded_context<'src>(input: &mut Input<'src>) -> IResult<types::BoundedContextDecl<'src>> {
    keyword(Keyword::BoundedContext).parse_next(input)?;

    cut_err(input, |input| {
        let name = name.parse_next(input)?;
        left_brace.parse_next(input)?;
        let items = repeat(0.., bounded_context_item).parse_next(input)?;
        right_brace.parse_next(input)?;
        Ok(types::BoundedContextDecl { name, items })
    })
}

// =========================================================================
// Context map and relationships
// =========================================================================

fn symmetric_kind_keyword<'src>(input: &mut Input<'src>) -> IResult<Spanned<SymmetricKind>> {
    keyword_value("`Partnership` or `SharedKernel`", |kw| match kw {
        Keyword::Partnership => Some(SymmetricKind::Partnership),
        Keyword::SharedKernel => Some(SymmetricKind::SharedKernel),
        _ => None,
    })
    .parse_next(input)
}

fn symmetric_kind_bracket<'src>(input: &mut Input<'src>) -> IResult<Spanned<SymmetricKind>> {
    delimited(
        symbol(Token::LeftBracket, "`[`"),
        keyword_value("`SK` or `P`", |kw| match kw {
            Keyword::Sk => Some(SymmetricKind::SharedKernel),
            Keyword::P => Some(SymmetricKind::Partnership),
            _ => None,
        }),
        symbol(Token::RightBracket, "`]`"),
    )
    .parse_next(input)
}

/// Parse `A Partnership B` / `A SharedKernel B`
fn symmetric_keyword_relationship<'src>(
    input: &mut Input<'src>,
) -> IResult<types::RelationshipDecl<'src>> {
    let left = name.parse_next(input)?;
    let kind = symmetric_kind_keyword.parse_next(input)?;

    cut_err(input, |input| {
        let right = name.parse_next(input)?;
        Ok(types::RelationshipDecl::Symmetric { kind, left, right })
    })
}

/// Parse `A [SK]<->[SK] B` / `A [P]<->[P] B`
fn symmetric_bracket_relationship<'src>(
    input: &mut Input<'src>,
) -> IResult<types::RelationshipDecl<'src>> {
    let left = name.parse_next(input)?;
    let kind = symmetric_kind_bracket.parse_next(input)?;
    symbol(Token::DoubleArrow, "`<->`").parse_next(input)?;

    cut_err(input, |input| {
        symmetric_kind_bracket
            .verify(|other: &Spanned<SymmetricKind>| other.inner() == kind.inner())
            .context(Context::Label("the same relationship kind on both sides"))
            .parse_next(input)?;
        let right = name.parse_next(input)?;
        Ok(types::RelationshipDecl::Symmetric { kind, left, right })
    })
}

/// Parse `[U, OHS, PL]`; commits once the role marker is seen and again
/// after every comma.
fn upstream_roles<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<UpstreamPattern>>> {
    symbol(Token::LeftBracket, "`[`").parse_next(input)?;
    alt((keyword(Keyword::U), keyword(Keyword::Upstream))).parse_next(input)?;

    cut_err(input, |input| {
        let patterns = repeat(
            0..,
            preceded(comma, |input: &mut Input<'src>| {
                cut_err(
                    input,
                    keyword_value("`OHS` or `PL`", |kw| match kw {
                        Keyword::Ohs => Some(UpstreamPattern::OpenHostService),
                        Keyword::Pl => Some(UpstreamPattern::PublishedLanguage),
                        _ => None,
                    }),
                )
            }),
        )
        .parse_next(input)?;
        symbol(Token::RightBracket, "`]`").parse_next(input)?;
        Ok(patterns)
    })
}

/// Parse `[D, ACL, CF]`; commits once the role marker is seen and again
/// after every comma.
fn downstream_roles<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<DownstreamPattern>>> {
    symbol(Token::LeftBracket, "`[`").parse_next(input)?;
    alt((keyword(Keyword::D), keyword(Keyword::Downstream))).parse_next(input)?;

    cut_err(input, |input| {
        let patterns = repeat(
            0..,
            preceded(comma, |input: &mut Input<'src>| {
                cut_err(
                    input,
                    keyword_value("`ACL` or `CF`", |kw| match kw {
                        Keyword::Acl => Some(DownstreamPattern::AntiCorruptionLayer),
                        Keyword::Cf => Some(DownstreamPattern::Conformist),
                        _ => None,
                    }),
                )
            }),
        )
        .parse_next(input)?;
        symbol(Token::RightBracket, "`]`").parse_next(input)?;
        Ok(patterns)
    })
}

fn relationship_item<'src>(input: &mut Input<'src>) -> IResult<types::RelationshipItem<'src>> {
    alt((
        property(Keyword::ExposedAggregates, name_list)
            .map(types::RelationshipItem::ExposedAggregates),
        implementation_technology.map(types::RelationshipItem::ImplementationTechnology),
    ))
    .parse_next(input)
}

/// Parse an optional relationship body `{ exposedAggregates = A, B ... }`
fn relationship_body<'src>(input: &mut Input<'src>) -> IResult<Vec<types::RelationshipItem<'src>>> {
    optional_body(relationship_item).parse_next(input)
}

/// Parse `Up [U,OHS] -> [D,ACL] Down { ... }`
fn upstream_downstream_relationship<'src>(
    input: &mut Input<'src>,
) -> IResult<types::RelationshipDecl<'src>> {
    let upstream = name.parse_next(input)?;
    let upstream_patterns = opt(upstream_roles)
        .map(Option::unwrap_or_default)
        .parse_next(input)?;
    symbol(Token::Arrow, "`->`").parse_next(input)?;

    cut_err(input, |input| {
        let downstream_patterns = opt(downstream_roles)
            .map(Option::unwrap_or_default)
            .parse_next(input)?;
        let downstream = name
            .context(Context::Label("downstream context after `->`"))
            .parse_next(input)?;
        let body = relationship_body.parse_next(input)?;

        Ok(types::RelationshipDecl::UpstreamDownstream {
            upstream,
            downstream,
            upstream_patterns,
            downstream_patterns,
            body,
        })
    })
}

/// Parse `Down [D,ACL] <- [U,OHS] Up { ... }`
fn downstream_upstream_relationship<'src>(
    input: &mut Input<'src>,
) -> IResult<types::RelationshipDecl<'src>> {
    let downstream = name.parse_next(input)?;
    let downstream_patterns = opt(downstream_roles)
        .map(Option::unwrap_or_default)
        .parse_next(input)?;
    symbol(Token::LeftArrow, "`<-`").parse_next(input)?;

    cut_err(input, |input| {
        let upstream_patterns = opt(upstream_roles)
            .map(Option::unwrap_or_default)
            .parse_next(input)?;
        let upstream = name
            .context(Context::Label("upstream context after `<-`"))
            .parse_next(input)?;
        let body = relationship_body.parse_next(input)?;

        Ok(types::RelationshipDecl::UpstreamDownstream {
            upstream,
            downstream,
            upstream_patterns,
            downstream_patterns,
            body,
        })
    })
}

fn relationship<'src>(input: &mut Input<'src>) -> IResult<types::RelationshipDecl<'src>> {
    alt((
        symmetric_keyword_relationship,
        symmetric_bracket_relationship,
        upstream_downstream_relationship,
        downstream_upstream_relationship,
    ))
    .context(Context::Label("relationship"))
    .parse_next(input)
}

fn context_map_state<'src>(input: &mut Input<'src>) -> IResult<Spanned<ContextMapState>> {
    keyword_value("`AS_IS` or `TO_BE`", |kw| match kw {
        Keyword::AsIs => Some(ContextMapState::AsIs),
        Keyword::ToBe => Some(ContextMapState::ToBe),
        _ => None,
    })
    .parse_next(input)
}

fn context_map_item<'src>(input: &mut Input<'src>) -> IResult<types::ContextMapItem<'src>> {
    use types::ContextMapItem as Item;

    alt((
        property(Keyword::Type, any_word).map(Item::Type),
        property(Keyword::State, context_map_state).map(Item::State),
        preceded(
            keyword(Keyword::Contains),
            |input: &mut Input<'src>| cut_err(input, name_list),
        )
        .map(Item::Contains),
        relationship.map(Item::Relationship),
    ))
    .parse_next(input)
}

/// Parse a context map: `ContextMap Name? { ... }`
fn context_map<'src>(input: &mut Input<'src>) -> IResult<types::ContextMapDecl<'src>> {
    let keyword_span = keyword(Keyword::ContextMap).parse_next(input)?;

    cut_err(input, |input| {
        let name = opt(name).parse_next(input)?;
        left_brace.parse_next(input)?;
        let items = repeat(0.., context_map_item).parse_next(input)?;
        right_brace.parse_next(input)?;
        Ok(types::ContextMapDecl {
            keyword: keyword_span,
            name,
            items,
        })
    })
}

fn declaration<'src>(input: &mut Input<'src>) -> IResult<types::Declaration<'src>> {
    alt((
        context_map
            .context(Context::Label("context map"))
            .map(types::Declaration::ContextMap),
        bounded_context
            .context(Context::Label("bounded context"))
            .map(types::Declaration::BoundedContext),
        fail.context(Context::Label("`ContextMap` or `BoundedContext`")),
    ))
    .parse_next(input)
}

// =========================================================================
// Error conversion and entry points
// =========================================================================

/// Returns the first token at or after `offset` that is not trivia.
fn next_meaningful<'a>(tokens: &'a [PositionedToken<'a>], offset: usize) -> Option<&'a PositionedToken<'a>> {
    tokens.get(offset..)?.iter().find(|t| !t.is_trivia())
}

/// Union of the spans of all meaningful tokens in `range`.
fn meaningful_span(tokens: &[PositionedToken<'_>], range: std::ops::Range<usize>) -> Option<Span> {
    tokens
        .get(range)?
        .iter()
        .filter(|t| !t.is_trivia())
        .map(|t| t.span)
        .reduce(|acc, span| acc.union(span))
}

/// Utility function to convert winnow errors to our custom error format
///
/// The primary label points at the token the parser could not accept, or at
/// the last token of the document when input ran out.
fn convert_error(
    error: ErrMode<ContextError<Context>>,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let error = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let end_offset = tokens.len() - current_remaining;
    let start_offset = error
        .context()
        .find_map(|ctx| match ctx {
            Context::StartOffset(n) => Some(tokens.len() - n),
            _ => None,
        })
        .unwrap_or(end_offset);

    if let Some((code, message, help)) = error.context().find_map(|ctx| match ctx {
        Context::Diagnostic {
            code,
            message,
            help,
        } => Some((*code, *message, *help)),
        _ => None,
    }) {
        let span = meaningful_span(tokens, start_offset..end_offset)
            .or_else(|| next_meaningful(tokens, end_offset).map(|t| t.span))
            .unwrap_or_default();
        return Diagnostic::error(message)
            .with_code(code)
            .with_label(span, code.description())
            .with_help(help);
    }

    let labels: Vec<&'static str> = error
        .context()
        .filter_map(|ctx| match ctx {
            Context::Label(label) => Some(*label),
            _ => None,
        })
        .collect();
    let expected = labels
        .first()
        .map(|label| format!("expected {label}"))
        .unwrap_or_else(|| "unexpected token".to_string());

    let diagnostic = match next_meaningful(tokens, end_offset) {
        Some(found) => Diagnostic::error(format!("unexpected token `{}`", found.token))
            .with_code(ErrorCode::E100)
            .with_label(found.span, expected),
        None => {
            let span = tokens
                .iter()
                .rev()
                .find(|t| !t.is_trivia())
                .map(|t| Span::new(t.span.end()..t.span.end()))
                .unwrap_or_default();
            Diagnostic::error("unexpected end of input")
                .with_code(ErrorCode::E101)
                .with_label(span, expected)
        }
    };

    match labels.last() {
        Some(outer) if labels.len() > 1 => diagnostic.with_help(format!("while parsing {outer}")),
        _ => diagnostic,
    }
}

/// Skips to the next top-level declaration after a failed one.
///
/// At least one token is consumed when the failed attempt made no progress,
/// so the loop in [`build_document`] always advances.
fn recover<'src>(input: &mut Input<'src>, attempt_start: usize) {
    if input.eof_offset() == attempt_start && input.next_token().is_none() {
        return;
    }

    loop {
        let checkpoint = input.checkpoint();
        match input.next_token() {
            Some(token)
                if matches!(
                    token.token,
                    Token::Keyword(Keyword::ContextMap | Keyword::BoundedContext)
                ) =>
            {
                input.reset(&checkpoint);
                return;
            }
            Some(_) => {}
            None => return,
        }
    }
}

/// Build a document from tokens.
///
/// A declaration that fails to parse is reported and skipped; parsing
/// resumes at the next `ContextMap` or `BoundedContext` keyword so that
/// every malformed declaration is reported in one pass.
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Spanned<types::Document<'src>>, ParseError> {
    let mut input = TokenSlice::new(tokens);
    let mut diagnostics = DiagnosticCollector::new();
    let mut document = types::Document::default();

    loop {
        let _ = ws_comments0.parse_next(&mut input);
        if input.is_empty() {
            break;
        }

        let attempt_start = input.eof_offset();
        match declaration.parse_next(&mut input) {
            Ok(declaration) => document.declarations.push(declaration),
            Err(e) => {
                diagnostics.emit(convert_error(e, tokens, input.eof_offset()));
                recover(&mut input, attempt_start);
            }
        }
    }

    diagnostics.finish()?;

    trace!(declarations = document.declarations.len(); "Parsed document");

    let total_span = meaningful_span(tokens, 0..tokens.len()).unwrap_or_default();
    Ok(Spanned::new(document, total_span))
}

/// Build a single type reference from tokens.
///
/// The whole token stream must form exactly one type reference.
pub fn build_type_ref<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Spanned<TypeRef>, ParseError> {
    let mut input = TokenSlice::new(tokens);

    let result = type_ref.parse_next(&mut input).and_then(|type_ref| {
        ws_comments0.parse_next(&mut input)?;
        if input.is_empty() {
            Ok(type_ref)
        } else {
            let mut e = ContextError::new();
            e.push(Context::Label("end of type"));
            Err(ErrMode::Cut(e))
        }
    });

    result.map_err(|e| convert_error(e, tokens, input.eof_offset()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_tokens(input: &str) -> Vec<PositionedToken<'_>> {
        tokenize(input).expect("Failed to tokenize input")
    }

    #[test]
    fn test_name_skips_trivia() {
        let tokens = parse_tokens("  /* c */ Order");
        let mut slice = TokenSlice::new(&tokens);
        let result = name.parse_next(&mut slice).unwrap();
        assert_eq!(*result.inner(), "Order");
        assert_eq!(result.span(), Span::new(10..15));
    }

    #[test]
    fn test_name_rejects_keyword() {
        let tokens = parse_tokens("Entity");
        let mut slice = TokenSlice::new(&tokens);
        assert!(name.parse_next(&mut slice).is_err());
    }

    #[test]
    fn test_attribute_name_accepts_lowercase_keywords() {
        for word in ["type", "state", "key", "service", "module", "query"] {
            let tokens = parse_tokens(word);
            let mut slice = TokenSlice::new(&tokens);
            let result = attribute_name.parse_next(&mut slice).unwrap();
            assert_eq!(*result.inner(), word);
        }
    }

    #[test]
    fn test_attribute_name_rejects_structural_keyword() {
        let tokens = parse_tokens("Entity");
        let mut slice = TokenSlice::new(&tokens);
        assert!(attribute_name.parse_next(&mut slice).is_err());
    }

    #[test]
    fn test_type_ref_shapes() {
        for (source, expected) in [
            ("String", TypeRef::Named("String".into())),
            ("List<OrderLine>", TypeRef::Collection(CollectionKind::List, "OrderLine".into())),
            ("Set < Tag >", TypeRef::Collection(CollectionKind::Set, "Tag".into())),
            ("- CustomerId", TypeRef::Reference("CustomerId".into())),
            ("-CustomerId", TypeRef::Reference("CustomerId".into())),
        ] {
            let tokens = parse_tokens(source);
            let result = build_type_ref(&tokens).unwrap();
            assert_eq!(result.inner(), &expected, "source: {source}");
        }
    }

    #[test]
    fn test_nested_generic_is_dedicated_error() {
        let tokens = parse_tokens("List<Set<String>>");
        let err = build_type_ref(&tokens).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.primary_span(), Some(Span::new(5..8)));
    }

    #[test]
    fn test_type_ref_rejects_trailing_tokens() {
        let tokens = parse_tokens("Map<String, Any>");
        let err = build_type_ref(&tokens).unwrap_err();
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E100));
    }

    #[test]
    fn test_operation_with_and_without_return_type() {
        let tokens = parse_tokens("def confirm();");
        let mut slice = TokenSlice::new(&tokens);
        let op = operation.parse_next(&mut slice).unwrap();
        assert_eq!(*op.name.inner(), "confirm");
        assert!(op.return_type.is_none());
        assert!(op.parameters.is_empty());

        let tokens = parse_tokens("def Money total(- Currency currency, int scale)");
        let mut slice = TokenSlice::new(&tokens);
        let op = operation.parse_next(&mut slice).unwrap();
        assert_eq!(*op.name.inner(), "total");
        assert_eq!(op.return_type.unwrap().inner().to_string(), "Money");
        assert_eq!(op.parameters.len(), 2);
        assert_eq!(op.parameters[0].type_ref.inner().to_string(), "- Currency");
        assert_eq!(*op.parameters[1].name.inner(), "scale");
    }

    #[test]
    fn test_attribute_flags() {
        let tokens = parse_tokens("- OrderId orderId key nullable;");
        let mut slice = TokenSlice::new(&tokens);
        let attr = attribute.parse_next(&mut slice).unwrap();
        assert_eq!(*attr.name.inner(), "orderId");
        assert!(attr.key);
        assert!(attr.nullable);

        let tokens = parse_tokens("String key");
        let mut slice = TokenSlice::new(&tokens);
        let attr = attribute.parse_next(&mut slice).unwrap();
        assert_eq!(*attr.name.inner(), "key");
        assert!(!attr.key);
    }

    #[test]
    fn test_relationship_forms() {
        let cases = [
            "A Partnership B",
            "A SharedKernel B",
            "A [SK]<->[SK] B",
            "A [P] <-> [P] B",
            "A -> B",
            "A [U,OHS,PL]->[D,ACL] B",
            "A [Upstream] -> [Downstream, CF] B",
            "B [D,ACL]<-[U,OHS] A",
            "A [U]->[D] B { exposedAggregates = Orders, Invoices implementationTechnology = \"REST\" }",
        ];
        for source in cases {
            let tokens = parse_tokens(source);
            let mut slice = TokenSlice::new(&tokens);
            assert!(
                relationship.parse_next(&mut slice).is_ok(),
                "failed to parse relationship: {source}"
            );
            assert!(slice.is_empty(), "leftover tokens for: {source}");
        }
    }

    #[test]
    fn test_reverse_arrow_swaps_roles() {
        let tokens = parse_tokens("Down [D,CF] <- [U,PL] Up");
        let mut slice = TokenSlice::new(&tokens);
        match relationship.parse_next(&mut slice).unwrap() {
            types::RelationshipDecl::UpstreamDownstream {
                upstream,
                downstream,
                upstream_patterns,
                downstream_patterns,
                ..
            } => {
                assert_eq!(*upstream.inner(), "Up");
                assert_eq!(*downstream.inner(), "Down");
                assert_eq!(
                    *upstream_patterns[0].inner(),
                    UpstreamPattern::PublishedLanguage
                );
                assert_eq!(*downstream_patterns[0].inner(), DownstreamPattern::Conformist);
            }
            other => panic!("expected upstream-downstream relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_mismatched_symmetric_brackets() {
        let tokens = parse_tokens("A [SK]<->[P] B");
        let mut slice = TokenSlice::new(&tokens);
        assert!(matches!(
            relationship.parse_next(&mut slice),
            Err(ErrMode::Cut(_))
        ));
    }

    #[test]
    fn test_wrong_pattern_for_role_commits() {
        let tokens = parse_tokens("A [U,ACL]->[D] B");
        let mut slice = TokenSlice::new(&tokens);
        assert!(matches!(
            relationship.parse_next(&mut slice),
            Err(ErrMode::Cut(_))
        ));
    }

    #[test]
    fn test_convert_error_points_at_unexpected_token() {
        let source = "BoundedContext A { Aggregate B { Entity } }";
        let tokens = parse_tokens(source);
        let err = build_document(&tokens).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E100));
        assert_eq!(diag.message(), "unexpected token `}`");
        let offset = source.find("} }").unwrap();
        assert_eq!(diag.primary_span(), Some(Span::new(offset..offset + 1)));
    }

    #[test]
    fn test_convert_error_end_of_input() {
        let tokens = parse_tokens("BoundedContext A {");
        let err = build_document(&tokens).unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.message(), "unexpected end of input");
    }
}
