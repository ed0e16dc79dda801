//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to a span of the source.
///
/// A diagnostic normally carries one primary label marking where the
/// problem is, and any number of secondary labels pointing at related
/// locations ("first declared here").
///
/// ```text
/// error[E103]: `ContextMap` is declared more than once
///   --> model.cml:12:1
///    |
/// 12 | ContextMap Later {
///    | ^^^^^^^^^^ second context map
///    |
///   --> model.cml:1:1
///    |
///  1 | ContextMap Landscape {
///    | ---------- first declared here
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
