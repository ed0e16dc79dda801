//! ctxmap - A language for Domain-Driven Design context maps.
//!
//! Parsing, validation, and writing of strategic and tactical domain models:
//! bounded contexts, the relationships between them, and the aggregates,
//! entities, value objects, events, commands and services inside them.

pub mod config;
pub mod guards;
pub mod session;
pub mod validate;
pub mod writer;

mod error;

pub use ctxmap_core::{identity, keywords, model};
pub use ctxmap_parser::{Diagnostic, ErrorCode, ParseError, Position, Severity, Span, TypeRef};

pub use error::CtxmapError;

use log::{debug, info, trace};

use config::AppConfig;
use model::Model;
use validate::ValidationReport;
use writer::Writer;

/// Entry point for processing ctxmap documents with a given configuration.
///
/// The workbench ties the pipeline stages together: parsing source into a
/// [`Model`], validating it, and writing it back to source text.
///
/// # Examples
///
/// ```
/// use ctxmap::{Workbench, config::AppConfig};
///
/// let source = "BoundedContext Sales { Aggregate Orders { Entity Order { aggregateRoot } } }";
///
/// let workbench = Workbench::new(AppConfig::default());
///
/// let model = workbench.parse(source).expect("Failed to parse");
/// let report = workbench.check(&model).expect("Model has errors");
/// assert!(report.is_empty());
///
/// let text = workbench.serialize(&model);
/// assert!(text.starts_with("BoundedContext Sales {"));
/// ```
#[derive(Debug, Default)]
pub struct Workbench {
    config: AppConfig,
}

impl Workbench {
    /// Create a new workbench with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including writer and validation settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration this workbench was created with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse source code into a model.
    ///
    /// This performs lexing, parsing, document checks and model building.
    ///
    /// # Errors
    ///
    /// Returns [`CtxmapError::Parse`] carrying every diagnostic together
    /// with the source.
    pub fn parse(&self, source: &str) -> Result<Model, CtxmapError> {
        info!("Parsing model");

        let model = ctxmap_parser::parse(source)
            .map_err(|err| CtxmapError::new_parse_error(err, source))?;

        debug!(
            bounded_contexts = model.bounded_contexts.len();
            "Model parsed successfully"
        );
        trace!(model:?; "Parsed model");

        Ok(model)
    }

    /// Validate a model and return every finding.
    pub fn validate(&self, model: &Model) -> ValidationReport {
        info!("Validating model");
        validate::validate(model)
    }

    /// Validate a model and apply the configured policy to the result.
    ///
    /// # Errors
    ///
    /// Returns [`CtxmapError::Validation`] if the report has errors, or
    /// warnings while `deny_warnings` is set.
    pub fn check(&self, model: &Model) -> Result<ValidationReport, CtxmapError> {
        let report = self.validate(model);
        let denied = self.config.validation().deny_warnings() && report.has_warnings();
        if !report.is_valid() || denied {
            return Err(CtxmapError::Validation(report));
        }
        Ok(report)
    }

    /// Write a model as source text using the configured layout.
    pub fn serialize(&self, model: &Model) -> String {
        info!("Serializing model");
        Writer::new(self.config.writer().clone()).write(model)
    }
}

/// Parse source code into a model with the default configuration.
///
/// # Examples
///
/// ```
/// let model = ctxmap::parse("BoundedContext Sales { }").unwrap();
/// assert_eq!(model.bounded_contexts[0].name, "Sales");
///
/// let err = ctxmap::parse("BoundedContext { }").unwrap_err();
/// assert!(matches!(err, ctxmap::CtxmapError::Parse { .. }));
/// ```
pub fn parse(source: &str) -> Result<Model, CtxmapError> {
    Workbench::default().parse(source)
}

/// Validate a model and return every finding.
pub fn validate(model: &Model) -> ValidationReport {
    validate::validate(model)
}

/// Write a model as source text with the default layout.
pub fn serialize(model: &Model) -> String {
    Writer::default().write(model)
}
