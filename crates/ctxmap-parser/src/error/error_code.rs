//! Error codes for the ctxmap diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Lexer errors
//! - `E1xx` - Parser and document-check errors
//!
//! Validation findings over a built model use the `E2xx` range; those
//! codes live next to the validator in the `ctxmap` crate.

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Lexer Errors (E0xx)
    // =========================================================================
    /// Unterminated string literal.
    ///
    /// A string was opened with a quote but never closed on the same line.
    E001,

    /// Unexpected character.
    ///
    /// A character was encountered that starts no token of the language.
    E002,

    /// Invalid escape sequence.
    ///
    /// Valid escapes are: `\\`, `\"`, `\'`, `\n`, `\r`, `\t`.
    E003,

    /// Unterminated block comment.
    ///
    /// A `/*` comment was never closed with `*/`.
    E004,

    /// Dangling escape marker.
    ///
    /// A `^` was not immediately followed by an identifier.
    E005,

    // =========================================================================
    // Parser Errors (E1xx)
    // =========================================================================
    /// Unexpected token.
    ///
    /// The parser encountered a token it did not expect at this position.
    E100,

    /// Incomplete input.
    ///
    /// The input ended unexpectedly before a complete construct was parsed.
    E101,

    /// Nested generic type.
    ///
    /// `List<..>` and `Set<..>` accept a single plain type name; a collection
    /// of collections cannot be expressed.
    E102,

    /// Duplicate context map.
    ///
    /// A document holds at most one `ContextMap` block.
    E103,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            // Parser errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer errors
            ErrorCode::E001 => "unterminated string literal",
            ErrorCode::E002 => "unexpected character",
            ErrorCode::E003 => "invalid escape sequence",
            ErrorCode::E004 => "unterminated block comment",
            ErrorCode::E005 => "dangling escape marker",
            // Parser errors
            ErrorCode::E100 => "unexpected token",
            ErrorCode::E101 => "incomplete input",
            ErrorCode::E102 => "nested generic type",
            ErrorCode::E103 => "duplicate context map",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
