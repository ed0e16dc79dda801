//! # ctxmap Parser
//!
//! Parser for the ctxmap domain-modeling language. This crate provides the
//! pipeline from source text to the application-level
//! [`Model`](ctxmap_core::model::Model).
//!
//! ## Usage
//!
//! ```
//! # use ctxmap_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         BoundedContext Sales {
//!             Aggregate Orders {
//!                 Entity Order {
//!                     aggregateRoot
//!                     String status
//!                 }
//!             }
//!         }
//!     "#;
//!
//!     let model = parse(source)?;
//!     assert_eq!(model.bounded_contexts[0].name, "Sales");
//!     Ok(())
//! }
//! ```

mod builder;
mod check;
mod error;
mod lexer;
mod parser;
mod parser_types;
mod span;
mod tokens;

pub use error::{Diagnostic, ErrorCode, Label, ParseError, Severity};
pub use parser_types::{CollectionKind, TypeRef};
pub use span::{Position, Span, Spanned};

use ctxmap_core::model::Model;

use builder::Builder;

/// Parse source text into a model.
///
/// This is the main entry point for parsing ctxmap source code. It
/// orchestrates the complete parsing pipeline:
///
/// 1. **Tokenize** - Convert source text to tokens
/// 2. **Parse** - Build the syntax tree from tokens
/// 3. **Check** - Enforce rules that span several declarations
/// 4. **Build** - Transform the syntax tree into the model
///
/// # Returns
///
/// Returns the built [`Model`] on success, or a [`ParseError`] holding every
/// lexical or syntactic diagnostic found. Each diagnostic resolves to a
/// line and column through [`Diagnostic::position`].
///
/// # Example
///
/// ```
/// # use ctxmap_parser::parse;
///
/// let err = parse("BoundedContext Sales {").unwrap_err();
/// let diagnostic = &err.diagnostics()[0];
/// assert_eq!(diagnostic.message(), "unexpected end of input");
/// ```
pub fn parse(source: &str) -> Result<Model, ParseError> {
    // Step 1: Tokenize
    let tokens = lexer::tokenize(source)?;

    // Step 2: Parse
    let document = parser::build_document(&tokens)?;

    // Step 3: Check
    check::check_document(document.inner())?;

    // Step 4: Build
    Ok(Builder::new().build(document.inner()))
}

/// Parse a single attribute, parameter or return type.
///
/// Accepts exactly the shapes the grammar accepts in declarations: a name,
/// `List<Name>` / `Set<Name>`, or `- Name`.
///
/// # Example
///
/// ```
/// # use ctxmap_parser::{parse_type_ref, CollectionKind, TypeRef};
///
/// let type_ref = parse_type_ref("List<OrderLine>").unwrap();
/// assert_eq!(type_ref, TypeRef::Collection(CollectionKind::List, "OrderLine".into()));
/// assert!(parse_type_ref("List<Set<String>>").is_err());
/// ```
pub fn parse_type_ref(text: &str) -> Result<TypeRef, ParseError> {
    let tokens = lexer::tokenize(text)?;
    let type_ref = parser::build_type_ref(&tokens)?;
    Ok(type_ref.into_inner())
}
