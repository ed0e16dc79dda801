//! Error and diagnostic system for the ctxmap parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Multiple diagnostics are wrapped in [`ParseError`]
//! for returning from the parsing lifecycle.
//!
//! # Example
//!
//! ```
//! # use ctxmap_parser::{Diagnostic, ErrorCode, Span};
//!
//! let span = Span::new(100..120);
//! let original_span = Span::new(50..70);
//!
//! let diag = Diagnostic::error("`ContextMap` is declared more than once")
//!     .with_code(ErrorCode::E103)
//!     .with_label(span, "second context map")
//!     .with_secondary_label(original_span, "first declared here")
//!     .with_help("merge the relationships into a single `ContextMap` block");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
