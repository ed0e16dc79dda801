//! Serialization of models to ctxmap source text.
//!
//! The [`Writer`] is the inverse of the parser: parsing its output yields a
//! model equal to the one written. Formatting is deterministic, so writing a
//! re-parsed model reproduces the same text byte for byte.
//!
//! Names are escaped with `^` when they would otherwise lex as keywords.
//! Attribute, parameter and operation names are escaped when they match any
//! reserved word ignoring case; every other name only when it is exactly a
//! keyword.

use std::borrow::Cow;

use log::debug;

use ctxmap_core::{
    keywords::{is_keyword, is_reserved_word},
    model::{
        Aggregate, Attribute, BoundedContext, ContextMap, Entity, Model, Module, Operation,
        Relationship, SymmetricRelationship, UpstreamDownstreamRelationship,
    },
};

use crate::config::WriterConfig;

/// Writes models as ctxmap source text.
///
/// # Examples
///
/// ```
/// use ctxmap::{config::WriterConfig, model::{BoundedContext, Model}, writer::Writer};
/// use ctxmap::identity::Identified;
///
/// let mut model = Model::default();
/// model.bounded_contexts.push(Identified::new(BoundedContext::new("Sales")));
///
/// let text = Writer::new(WriterConfig::new(2)).write(&model);
/// assert_eq!(text, "BoundedContext Sales {}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Writer {
    config: WriterConfig,
}

impl Writer {
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Renders `model` as source text.
    pub fn write(&self, model: &Model) -> String {
        let mut out = Output::new(self.config.indent_width());

        if let Some(map) = &model.context_map {
            write_context_map(&mut out, map);
        }
        for context in &model.bounded_contexts {
            out.gap();
            write_bounded_context(&mut out, context);
        }

        let text = out.finish();
        debug!(bytes = text.len(); "Model serialized");
        text
    }
}

/// Line-oriented output buffer tracking the nesting depth.
struct Output {
    text: String,
    indent_width: usize,
    depth: usize,
    /// `true` until the current block receives its first line.
    at_block_start: bool,
}

impl Output {
    fn new(indent_width: usize) -> Self {
        Self {
            text: String::new(),
            indent_width,
            depth: 0,
            at_block_start: true,
        }
    }

    fn line(&mut self, content: &str) {
        self.text
            .extend(std::iter::repeat_n(' ', self.depth * self.indent_width));
        self.text.push_str(content);
        self.text.push('\n');
        self.at_block_start = false;
    }

    /// Separates the next child block from what precedes it in its parent.
    fn gap(&mut self) {
        if !self.at_block_start {
            self.text.push('\n');
        }
    }

    fn open(&mut self, header: &str) {
        self.line(&format!("{header} {{"));
        self.depth += 1;
        self.at_block_start = true;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.text
    }
}

// ============================================================================
// Escaping
// ============================================================================

/// Escapes a structural name that is exactly a keyword.
fn name(name: &str) -> Cow<'_, str> {
    if is_keyword(name) {
        Cow::Owned(format!("^{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Escapes an attribute, parameter or operation name that matches any
/// reserved word ignoring case.
fn member_name(name: &str) -> Cow<'_, str> {
    if is_reserved_word(name) {
        Cow::Owned(format!("^{name}"))
    } else {
        Cow::Borrowed(name)
    }
}

/// Converts a stored type descriptor into source form.
///
/// Names inside the three accepted shapes are escaped like structural
/// names; anything else is returned unchanged so that it fails to parse
/// exactly as written.
pub(crate) fn escape_type(type_name: &str) -> String {
    let type_name = type_name.trim();

    if let Some(target) = type_name.strip_prefix('-') {
        return format!("- {}", name(target.trim()));
    }

    if let Some((kind, rest)) = type_name.split_once('<') {
        let kind = kind.trim();
        return match rest.strip_suffix('>') {
            Some(inner) if kind == "List" || kind == "Set" => {
                format!("{kind}<{}>", name(inner.trim()))
            }
            _ => type_name.to_string(),
        };
    }

    name(type_name).into_owned()
}

/// Quotes a string literal, escaping what the lexer unescapes.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\t' => quoted.push_str("\\t"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|value| quote(value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| name(n))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Context map
// ============================================================================

fn write_context_map(out: &mut Output, map: &ContextMap) {
    match &map.name {
        Some(map_name) => out.open(&format!("ContextMap {}", name(map_name))),
        None => out.open("ContextMap"),
    }

    if let Some(map_type) = &map.map_type {
        out.line(&format!("type = {map_type}"));
    }
    out.line(&format!("state = {}", map.state));
    if !map.contains.is_empty() {
        out.line(&format!("contains {}", name_list(&map.contains)));
    }

    for relationship in &map.relationships {
        out.gap();
        match relationship.inner() {
            Relationship::Symmetric(rel) => write_symmetric(out, rel),
            Relationship::UpstreamDownstream(rel) => write_upstream_downstream(out, rel),
        }
    }

    out.close();
}

fn write_symmetric(out: &mut Output, rel: &SymmetricRelationship) {
    out.line(&format!(
        "{} {} {}",
        name(&rel.participant1),
        rel.kind,
        name(&rel.participant2)
    ));
}

fn write_upstream_downstream(out: &mut Output, rel: &UpstreamDownstreamRelationship) {
    let upstream_roles: String = std::iter::once("U")
        .chain(rel.upstream_patterns.iter().map(|p| p.as_str()))
        .collect::<Vec<_>>()
        .join(",");
    let downstream_roles: String = std::iter::once("D")
        .chain(rel.downstream_patterns.iter().map(|p| p.as_str()))
        .collect::<Vec<_>>()
        .join(",");
    let header = format!(
        "{} [{upstream_roles}] -> [{downstream_roles}] {}",
        name(&rel.upstream),
        name(&rel.downstream)
    );

    if rel.exposed_aggregates.is_empty() && rel.implementation_technology.is_none() {
        out.line(&header);
        return;
    }

    out.open(&header);
    if !rel.exposed_aggregates.is_empty() {
        out.line(&format!(
            "exposedAggregates = {}",
            name_list(&rel.exposed_aggregates)
        ));
    }
    if let Some(technology) = &rel.implementation_technology {
        out.line(&format!("implementationTechnology = {}", quote(technology)));
    }
    out.close();
}

// ============================================================================
// Bounded contexts, modules and aggregates
// ============================================================================

fn write_bounded_context(out: &mut Output, context: &BoundedContext) {
    let header = format!("BoundedContext {}", name(&context.name));

    let has_properties = context.vision_statement.is_some()
        || !context.responsibilities.is_empty()
        || context.implementation_technology.is_some()
        || context.knowledge_level.is_some()
        || context.context_type.is_some();
    if !has_properties && context.aggregates.is_empty() && context.modules.is_empty() {
        out.line(&format!("{header} {{}}"));
        return;
    }

    out.open(&header);

    if let Some(statement) = &context.vision_statement {
        out.line(&format!("domainVisionStatement = {}", quote(statement)));
    }
    if !context.responsibilities.is_empty() {
        out.line(&format!(
            "responsibilities = {}",
            quote_list(&context.responsibilities)
        ));
    }
    if let Some(technology) = &context.implementation_technology {
        out.line(&format!("implementationTechnology = {}", quote(technology)));
    }
    if let Some(level) = context.knowledge_level {
        out.line(&format!("knowledgeLevel = {level}"));
    }
    if let Some(context_type) = context.context_type {
        out.line(&format!("type = {context_type}"));
    }

    for aggregate in &context.aggregates {
        out.gap();
        write_aggregate(out, aggregate);
    }
    for module in &context.modules {
        out.gap();
        write_module(out, module);
    }

    out.close();
}

fn write_module(out: &mut Output, module: &Module) {
    let header = format!("Module {}", name(&module.name));
    if module.aggregates.is_empty() {
        out.line(&format!("{header} {{}}"));
        return;
    }

    out.open(&header);
    for aggregate in &module.aggregates {
        out.gap();
        write_aggregate(out, aggregate);
    }
    out.close();
}

fn write_aggregate(out: &mut Output, aggregate: &Aggregate) {
    let header = format!("Aggregate {}", name(&aggregate.name));
    if aggregate.responsibilities.is_empty()
        && aggregate.knowledge_level.is_none()
        && aggregate.is_empty()
    {
        out.line(&format!("{header} {{}}"));
        return;
    }

    out.open(&header);

    if !aggregate.responsibilities.is_empty() {
        out.line(&format!(
            "responsibilities = {}",
            quote_list(&aggregate.responsibilities)
        ));
    }
    if let Some(level) = aggregate.knowledge_level {
        out.line(&format!("knowledgeLevel = {level}"));
    }

    for entity in &aggregate.entities {
        out.gap();
        write_entity(out, entity);
    }
    for object in &aggregate.value_objects {
        out.gap();
        write_attributed(out, "ValueObject", &object.name, &object.attributes);
    }
    for event in &aggregate.domain_events {
        out.gap();
        write_attributed(out, "DomainEvent", &event.name, &event.attributes);
    }
    for command in &aggregate.commands {
        out.gap();
        write_attributed(out, "Command", &command.name, &command.attributes);
    }
    for service in &aggregate.services {
        out.gap();
        let header = format!("Service {}", name(&service.name));
        if service.operations.is_empty() {
            out.line(&header);
        } else {
            out.open(&header);
            for operation in &service.operations {
                out.line(&operation_line(operation));
            }
            out.close();
        }
    }

    out.close();
}

// ============================================================================
// Domain objects
// ============================================================================

fn write_entity(out: &mut Output, entity: &Entity) {
    let header = format!("Entity {}", name(&entity.name));
    if !entity.aggregate_root && entity.attributes.is_empty() && entity.operations.is_empty() {
        out.line(&header);
        return;
    }

    out.open(&header);
    if entity.aggregate_root {
        out.line("aggregateRoot");
    }
    for attribute in &entity.attributes {
        out.line(&attribute_line(attribute));
    }
    for operation in &entity.operations {
        out.line(&operation_line(operation));
    }
    out.close();
}

fn write_attributed(out: &mut Output, keyword: &str, object_name: &str, attributes: &[Attribute]) {
    let header = format!("{keyword} {}", name(object_name));
    if attributes.is_empty() {
        out.line(&header);
        return;
    }

    out.open(&header);
    for attribute in attributes {
        out.line(&attribute_line(attribute));
    }
    out.close();
}

fn attribute_line(attribute: &Attribute) -> String {
    let mut line = format!(
        "{} {}",
        escape_type(&attribute.type_name),
        member_name(&attribute.name)
    );
    if attribute.key {
        line.push_str(" key");
    }
    if attribute.nullable {
        line.push_str(" nullable");
    }
    line
}

fn operation_line(operation: &Operation) -> String {
    let parameters = operation
        .parameters
        .iter()
        .map(|p| format!("{} {}", escape_type(&p.type_name), member_name(&p.name)))
        .collect::<Vec<_>>()
        .join(", ");

    match &operation.return_type {
        Some(return_type) => format!(
            "def {} {}({parameters});",
            escape_type(return_type),
            member_name(&operation.name)
        ),
        None => format!("def {}({parameters});", member_name(&operation.name)),
    }
}
