//! Structural checks over a parsed document.
//!
//! The grammar accepts any number of top-level declarations in any order.
//! Rules that span several declarations are enforced here, between parsing
//! and building, so that the builder only ever sees a well-formed document.
//!
//! ## Checks Performed
//!
//! - **Single context map**: a document declares at most one `ContextMap`.

use log::trace;

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{ContextMapDecl, Document},
    span::Span,
};

/// Collects diagnostics while walking the top-level declarations.
struct DocumentChecker {
    diagnostics: DiagnosticCollector,
    first_context_map: Option<Span>,
}

impl DocumentChecker {
    fn new() -> Self {
        Self {
            diagnostics: DiagnosticCollector::new(),
            first_context_map: None,
        }
    }

    fn check_context_map(&mut self, map: &ContextMapDecl<'_>) {
        let span = map
            .name
            .as_ref()
            .map_or(map.keyword, |name| map.keyword.union(name.span()));

        match self.first_context_map {
            None => self.first_context_map = Some(span),
            Some(first) => self.diagnostics.emit(
                Diagnostic::error("a document may declare only one context map")
                    .with_code(ErrorCode::E103)
                    .with_label(span, "second context map declared here")
                    .with_secondary_label(first, "first context map declared here")
                    .with_help("merge the relationships into the first `ContextMap` block"),
            ),
        }
    }

    fn finish(self) -> Result<(), ParseError> {
        self.diagnostics.finish()
    }
}

/// Runs the cross-declaration checks over `document`.
///
/// Every violation is reported, not just the first.
pub fn check_document(document: &Document<'_>) -> Result<(), ParseError> {
    let mut checker = DocumentChecker::new();

    for map in document.context_maps() {
        checker.check_context_map(map);
    }

    trace!(declarations = document.declarations.len(); "Checked document");
    checker.finish()
}
