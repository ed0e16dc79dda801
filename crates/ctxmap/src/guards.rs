//! Pre-insertion checks for names and attribute types.
//!
//! These functions run before an element is added to a model, so that a
//! rejected element is never partially created. The validator reuses them
//! for whole-model checks.

use thiserror::Error;

use ctxmap_core::keywords;
use ctxmap_parser::{ErrorCode, TypeRef, parse_type_ref};

use crate::writer::escape_type;

/// Primitive type names accepted in attribute positions.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "String",
    "int",
    "Integer",
    "long",
    "Long",
    "double",
    "Double",
    "float",
    "Float",
    "boolean",
    "Boolean",
    "BigDecimal",
    "Date",
    "DateTime",
    "Timestamp",
    "UUID",
];

/// Type names that describe shapes the language cannot express, with the
/// replacement suggested for each.
const FORBIDDEN_TYPES: &[(&str, &str)] = &[
    (
        "map",
        "model the entries as a ValueObject and use `List<Entry>`",
    ),
    (
        "hashmap",
        "model the entries as a ValueObject and use `List<Entry>`",
    ),
    (
        "treemap",
        "model the entries as a ValueObject and use `List<Entry>`",
    ),
    (
        "dictionary",
        "model the entries as a ValueObject and use `List<Entry>`",
    ),
    (
        "dict",
        "model the entries as a ValueObject and use `List<Entry>`",
    ),
    (
        "tuple",
        "introduce a ValueObject with one attribute per component",
    ),
    (
        "pair",
        "introduce a ValueObject with one attribute per component",
    ),
    (
        "function",
        "behaviour belongs in an operation (`def`), not in an attribute",
    ),
    (
        "func",
        "behaviour belongs in an operation (`def`), not in an attribute",
    ),
    (
        "callback",
        "behaviour belongs in an operation (`def`), not in an attribute",
    ),
    (
        "lambda",
        "behaviour belongs in an operation (`def`), not in an attribute",
    ),
    ("dynamic", "use a concrete type such as `String`"),
    ("any", "use a concrete type such as `String`"),
];

/// Rejection of an attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidType {
    message: String,
    suggestion: Option<String>,
}

impl InvalidType {
    fn new(message: impl Into<String>, suggestion: Option<String>) -> Self {
        Self {
            message: message.into(),
            suggestion,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// A replacement the caller can offer, when one is known.
    pub fn suggestion(&self) -> Option<&str> {
        self.suggestion.as_deref()
    }
}

/// A domain-object name that can never be used, with alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedName {
    /// Canonical spelling of the reserved name.
    pub name: &'static str,
    /// Alternative names built from the rejected one.
    pub suggestions: Vec<String>,
}

/// Checks an attribute, parameter or return type.
///
/// Accepts a bare identifier, `List<T>` / `Set<T>` over a single
/// identifier, or `- T`. Map-, tuple- and function-like names are rejected
/// even though they would parse as identifiers.
///
/// # Examples
///
/// ```
/// use ctxmap::guards::validate_attribute_type;
///
/// assert!(validate_attribute_type("List<String>").is_ok());
/// assert!(validate_attribute_type("- CustomerId").is_ok());
///
/// let err = validate_attribute_type("Map<String, Any>").unwrap_err();
/// assert!(err.suggestion().is_some());
/// ```
pub fn validate_attribute_type(type_name: &str) -> Result<TypeRef, InvalidType> {
    let trimmed = type_name.trim();
    if trimmed.is_empty() {
        return Err(InvalidType::new(
            "type must not be empty",
            Some(format!("use one of {}", PRIMITIVE_TYPES.join(", "))),
        ));
    }

    if let Some(err) = forbidden_base(trimmed) {
        return Err(err);
    }

    match parse_type_ref(&escape_type(trimmed)) {
        Ok(type_ref) => {
            let inner_error = match &type_ref {
                TypeRef::Collection(_, inner) => forbidden_base(inner),
                _ => None,
            };
            inner_error.map_or(Ok(type_ref), Err)
        }
        Err(err) => {
            let nested = err
                .diagnostics()
                .iter()
                .any(|d| d.code() == Some(ErrorCode::E102));
            if nested {
                Err(InvalidType::new(
                    format!("nested generic type `{trimmed}` is not supported"),
                    Some(
                        "wrap the inner collection in a ValueObject and use a single `List<T>` or `Set<T>`"
                            .to_string(),
                    ),
                ))
            } else {
                Err(InvalidType::new(
                    format!("`{trimmed}` is not a valid type"),
                    Some(
                        "use a primitive, a domain object name, `List<T>`, `Set<T>` or `- T`"
                            .to_string(),
                    ),
                ))
            }
        }
    }
}

/// Rejects a type whose base name, before any `<`, is a forbidden shape.
fn forbidden_base(type_name: &str) -> Option<InvalidType> {
    let base = type_name
        .trim_start_matches('-')
        .split('<')
        .next()
        .unwrap_or_default()
        .trim();

    FORBIDDEN_TYPES
        .iter()
        .find(|(forbidden, _)| forbidden.eq_ignore_ascii_case(base))
        .map(|(_, suggestion)| {
            InvalidType::new(
                format!("type `{type_name}` uses unsupported type `{base}`"),
                Some((*suggestion).to_string()),
            )
        })
}

/// Looks up `name` among the reserved domain-object names, ignoring case.
///
/// # Examples
///
/// ```
/// use ctxmap::guards::reserved_domain_object_name;
///
/// let reserved = reserved_domain_object_name("resource").unwrap();
/// assert_eq!(reserved.name, "Resource");
/// assert!(reserved.suggestions.contains(&"ResourceItem".to_string()));
/// assert!(reserved_domain_object_name("Customer").is_none());
/// ```
pub fn reserved_domain_object_name(name: &str) -> Option<ReservedName> {
    keywords::reserved_domain_object_name(name.trim()).map(|reserved| ReservedName {
        name: reserved,
        suggestions: vec![
            format!("{reserved}Item"),
            format!("{reserved}Record"),
            format!("Domain{reserved}"),
        ],
    })
}

/// Returns `true` if `name` may not be used for a domain object.
pub fn is_reserved_domain_object_name(name: &str) -> bool {
    keywords::reserved_domain_object_name(name.trim()).is_some()
}

/// Reduces `raw` to identifier characters.
///
/// Everything outside `[A-Za-z0-9_]` is dropped and a leading digit gets an
/// underscore prefix. The result may be empty.
///
/// # Examples
///
/// ```
/// use ctxmap::guards::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Order Line!"), "OrderLine");
/// assert_eq!(sanitize_identifier("3DModel"), "_3DModel");
/// ```
pub fn sanitize_identifier(raw: &str) -> String {
    let mut clean: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if clean.starts_with(|c: char| c.is_ascii_digit()) {
        clean.insert(0, '_');
    }
    clean
}

#[cfg(test)]
mod tests {
    use ctxmap_parser::CollectionKind;

    use super::*;

    #[test]
    fn test_accepts_supported_shapes() {
        assert_eq!(
            validate_attribute_type("BigDecimal"),
            Ok(TypeRef::Named("BigDecimal".into()))
        );
        assert_eq!(
            validate_attribute_type("List<String>"),
            Ok(TypeRef::Collection(CollectionKind::List, "String".into()))
        );
        assert_eq!(
            validate_attribute_type("- CustomerId"),
            Ok(TypeRef::Reference("CustomerId".into()))
        );
        assert_eq!(
            validate_attribute_type("-CustomerId"),
            Ok(TypeRef::Reference("CustomerId".into()))
        );
    }

    #[test]
    fn test_accepts_keyword_named_types() {
        assert_eq!(
            validate_attribute_type("Set<Entity>"),
            Ok(TypeRef::Collection(CollectionKind::Set, "Entity".into()))
        );
    }

    #[test]
    fn test_rejects_map_shapes() {
        let err = validate_attribute_type("Map<String, Any>").unwrap_err();
        assert!(err.message().contains("Map"));
        assert!(err.suggestion().unwrap().contains("ValueObject"));

        assert!(validate_attribute_type("HashMap").is_err());
        assert!(validate_attribute_type("dictionary").is_err());
    }

    #[test]
    fn test_rejects_forbidden_inner_type() {
        let err = validate_attribute_type("List<Tuple>").unwrap_err();
        assert!(err.message().contains("Tuple"));
        assert!(validate_attribute_type("Set<any>").is_err());
    }

    #[test]
    fn test_rejects_nested_generics() {
        let err = validate_attribute_type("List<Set<String>>").unwrap_err();
        assert!(err.message().contains("nested generic"));
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_rejects_malformed_types() {
        assert!(validate_attribute_type("").is_err());
        assert!(validate_attribute_type("List<>").is_err());
        assert!(validate_attribute_type("Order Line").is_err());
        assert!(validate_attribute_type("Callback").is_err());
    }

    #[test]
    fn test_reserved_names() {
        let reserved = reserved_domain_object_name("RESOURCE").unwrap();
        assert_eq!(reserved.name, "Resource");
        assert!(!reserved.suggestions.is_empty());
        assert!(!reserved.suggestions.iter().any(|s| s == "Resource"));

        assert!(is_reserved_domain_object_name("service"));
        assert!(!is_reserved_domain_object_name("ServiceNowPlatform"));
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("customer-id"), "customerid");
        assert_eq!(sanitize_identifier("_ok_1"), "_ok_1");
        assert_eq!(sanitize_identifier("42"), "_42");
        assert_eq!(sanitize_identifier("!!"), "");
    }
}
